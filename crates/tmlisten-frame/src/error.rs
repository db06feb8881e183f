/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The header token is not one of the protocol headers (matching is case-sensitive).
    #[error("unrecognized header token {0:?}")]
    BadHeader(String),

    /// The transmitted checksum does not match the one computed over the frame.
    #[error("checksum mismatch (computed {expected:02X}, received {actual:02X})")]
    BadCheckSum { expected: u8, actual: u8 },

    /// The frame is structurally malformed.
    #[error("invalid frame data: {0}")]
    InvalidData(String),

    /// The frame exceeds the configured maximum size.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
