use std::fmt;
use std::io;

use tmlisten_command::{CommandError, DecodeError};
use tmlisten_frame::FrameError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        FrameError::BadHeader(_)
        | FrameError::BadCheckSum { .. }
        | FrameError::InvalidData(_)
        | FrameError::FrameTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn command_error(context: &str, err: CommandError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}

pub fn decode_error(context: &str, err: DecodeError) -> CliError {
    match err {
        DecodeError::Frame(err) => frame_error(context, err),
        other => CliError::new(
            DATA_INVALID,
            format!("{context}: {other} (code {})", other.error_code().wire_code()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_exit_codes() {
        let timeout = io::Error::new(io::ErrorKind::TimedOut, "slow");
        assert_eq!(io_error("read", timeout).code, TIMEOUT);

        let checksum = FrameError::BadCheckSum {
            expected: 0x08,
            actual: 0x09,
        };
        assert_eq!(frame_error("decode", checksum).code, DATA_INVALID);
        assert_eq!(
            frame_error("read", FrameError::ConnectionClosed).code,
            FAILURE
        );
        assert_eq!(
            command_error("build", CommandError::Unterminated).code,
            USAGE
        );

        let err = decode_error("decode", DecodeError::UnknownErrorCode("07".into()));
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("code 04"), "{}", err.message);
    }
}
