//! Conversation UI components for chat interface

pub mod commands;
pub mod composer;
pub mod format;
pub mod history;
pub mod manager;
pub mod reply;
pub mod store;

pub use manager::{ConversationAction, ConversationManager};
