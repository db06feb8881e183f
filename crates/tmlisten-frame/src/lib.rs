//! Framing for the listen-node external scripting protocol.
//!
//! Every message on the wire is ASCII text of the form:
//!
//! ```text
//! $HEADER,LENGTH,BODY,*CS\r\n
//! ```
//!
//! - `HEADER` is one of `TMSTA`, `TMSCT` or `CPERR`
//! - `LENGTH` is the byte length of `BODY`
//! - `CS` is the XOR of every byte between `$` and `*`, as two uppercase hex digits
//!
//! Bodies may contain embedded `\r\n` (multi-line scripts), so frames are
//! delimited by the length field rather than by the line terminator.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod error;
pub mod header;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::ListenCodec;
pub use codec::{
    checksum, checksum_hex, decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_FRAME,
    DEFAULT_PORT,
};
pub use error::{FrameError, Result};
pub use header::{Header, CPERR, TMSCT, TMSTA};
pub use reader::FrameReader;
pub use writer::FrameWriter;
