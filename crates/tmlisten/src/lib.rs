//! Typed message generation for the robot listen-node external scripting
//! protocol.
//!
//! Messages travel as `$HEADER,LEN,BODY,*CS\r\n` frames. Building them by
//! string concatenation invites wrong lengths, wrong checksums and commands
//! sent under the wrong header; this crate builds them from typed values
//! instead.
//!
//! # Crate Structure
//!
//! - [`frame`]: header tags, length/checksum framing, blocking reader/writer
//! - [`script`]: typed values, expressions, variables and controller objects
//! - [`command`]: function catalog, message grammar and reply model

/// Re-export frame types.
pub mod frame {
    pub use tmlisten_frame::*;
}

/// Re-export script types.
pub mod script {
    pub use tmlisten_script::*;
}

/// Re-export command types.
pub mod command {
    pub use tmlisten_command::*;
}
