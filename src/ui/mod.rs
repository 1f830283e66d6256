pub mod conversation;
pub mod header;
pub mod quick_actions;
pub mod rooms;
