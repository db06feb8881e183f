/// Errors raised while naming script objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// The name is not a script identifier.
    #[error("invalid variable name {0:?}")]
    InvalidName(String),

    /// The object only exists at a fixed index.
    #[error("{item} index {index} out of range (only {expected} exists)")]
    InvalidIndex {
        item: &'static str,
        index: i32,
        expected: i32,
    },

    /// User tools cannot shadow the system tools.
    #[error("tool name {0:?} is reserved for a system tool")]
    ReservedToolName(String),
}

pub type Result<T> = std::result::Result<T, ScriptError>;
