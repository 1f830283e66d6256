use thiserror::Error;

/// Domain errors surfaced to the user as notices or CLI failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KukanError {
    #[error("unknown room `{0}` (expected Bedroom, Livingroom, Kitchen, Bathroom or Basement)")]
    UnknownRoom(String),

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
