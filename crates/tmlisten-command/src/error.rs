use tmlisten_frame::{FrameError, Header};

use crate::response::ErrorCode;

/// Errors raised while building an outgoing message.
///
/// These are programming errors: the message being built is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The command belongs to another header family.
    #[error("{command:?} is a {affinity} command and cannot be sent under {header}")]
    HeaderMismatch {
        header: Header,
        affinity: Header,
        command: String,
    },

    /// IDs are only meaningful for script commands.
    #[error("an ID cannot be used under {0}")]
    IdNotAllowed(Header),

    /// The ID would be split differently by the reply parser.
    #[error("script ID {0:?} must be non-empty and contain no ',' or line breaks")]
    InvalidId(String),

    /// The ID must come first and only once.
    #[error("the ID must be the first element of a message")]
    MisplacedId,

    /// `ScriptExit` under a header that has no script to exit.
    #[error("{terminator} cannot terminate a {header} message")]
    TerminatorNotAllowed {
        header: Header,
        terminator: &'static str,
    },

    #[error("message is already terminated")]
    AlreadyTerminated,

    #[error("message has no terminator")]
    Unterminated,

    #[error("a {0} message needs exactly one subcommand")]
    MissingSubcommand(Header),

    #[error("a {0} message carries only one subcommand")]
    ExtraSubcommand(Header),

    /// No overload of the function accepts the given argument kinds.
    #[error("no overload of {function} accepts ({given})")]
    BadArgument {
        function: &'static str,
        given: String,
    },

    #[error("unknown function {0:?}")]
    UnknownFunction(String),
}

/// Errors raised while decoding a controller reply.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The frame is well formed but its body is not a valid reply.
    #[error("invalid reply: {0}")]
    InvalidData(String),

    #[error("unknown error code {0:?}")]
    UnknownErrorCode(String),
}

impl DecodeError {
    /// The protocol error code that describes this fault.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DecodeError::Frame(FrameError::BadCheckSum { .. }) => ErrorCode::BadCheckSum,
            DecodeError::Frame(FrameError::BadHeader(_)) => ErrorCode::BadHeader,
            _ => ErrorCode::InvalidData,
        }
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;
