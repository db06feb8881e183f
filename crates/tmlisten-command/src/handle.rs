//! Interface to the dispatch loop that owns the connection.
//!
//! The loop asks a [`ListenerHandle`] for the next command each cycle and
//! routes decoded replies back to it with [`dispatch`].

use tmlisten_frame::Frame;

use crate::grammar::{End, Id, MessageBuilder};
use crate::response::{ErrorCode, Response, ScriptResultReply, StatusReply};

/// Whether the controller answered the previously sent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    Responded,
    NotYetResponded,
}

/// What to send this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Frame(Frame),
    /// Nothing to send; the loop skips transmission.
    Defer,
}

impl Outgoing {
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Outgoing::Frame(frame) => Some(frame),
            Outgoing::Defer => None,
        }
    }

    pub fn is_defer(&self) -> bool {
        matches!(self, Outgoing::Defer)
    }
}

impl From<Frame> for Outgoing {
    fn from(frame: Frame) -> Self {
        Outgoing::Frame(frame)
    }
}

/// Send nothing this cycle.
pub fn empty_command_list() -> Outgoing {
    Outgoing::Defer
}

/// A script message carrying only an ID, used to keep the exchange alive.
pub fn dummy_command_list(id: impl Into<String>) -> crate::Result<Outgoing> {
    let frame = MessageBuilder::script()
        .append(Id::new(id))?
        .append(End)?
        .build()?;
    Ok(frame.into())
}

/// Application side of a listen-node session.
pub trait ListenerHandle {
    /// Produce the next message, given whether the last one was answered.
    fn generate_command(&mut self, previous: MessageStatus) -> Outgoing;

    fn on_status_reply(&mut self, _reply: &StatusReply) {}

    fn on_script_result(&mut self, _reply: &ScriptResultReply) {}

    fn on_error(&mut self, _code: ErrorCode) {}
}

/// Route a decoded reply to the matching callback.
pub fn dispatch<H: ListenerHandle + ?Sized>(handle: &mut H, response: &Response) {
    match response {
        Response::Status(reply) => handle.on_status_reply(reply),
        Response::ScriptResult(reply) => handle.on_script_result(reply),
        Response::Error(reply) => {
            tracing::warn!(code = %reply.code, "controller reported an error");
            handle.on_error(reply.code);
        }
    }
}
