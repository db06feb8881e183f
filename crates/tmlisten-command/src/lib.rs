//! Command grammar and reply model for the listen-node protocol.
//!
//! This crate sits between the typed script layer (`tmlisten-script`) and
//! the framing layer (`tmlisten-frame`):
//!
//! - [`catalog`]: motion functions and subcommands with their overloads
//! - [`grammar`]: the message builder and the rules it enforces
//! - [`response`]: typed controller replies and error codes
//! - [`handle`]: the collaborator interface used by a dispatch loop

pub mod catalog;
pub mod error;
pub mod grammar;
pub mod handle;
pub mod response;

pub use catalog::{Catalog, FunctionSpec};
pub use error::{CommandError, DecodeError, Result};
pub use grammar::{Command, End, Id, MessageBuilder, ScriptExit, Segment, State};
pub use handle::{
    dispatch, dummy_command_list, empty_command_list, ListenerHandle, MessageStatus, Outgoing,
};
pub use response::{
    parse_incoming, ErrorCode, ErrorReply, Response, ScriptResultReply, StatusReply,
};
