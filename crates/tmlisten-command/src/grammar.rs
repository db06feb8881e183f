//! Message grammar.
//!
//! A message is assembled from segments: an optional ID, commands and a
//! terminator. [`MessageBuilder`] walks the states
//! `Empty -> HasId -> Accumulating -> Terminated` and rejects any segment
//! that is illegal for the message header or the current state.
//!
//! ```
//! use tmlisten_command::catalog::CHANGE_BASE;
//! use tmlisten_command::{End, Id, MessageBuilder};
//! use tmlisten_script::args;
//!
//! let frame = MessageBuilder::script()
//!     .append(Id::new("1"))?
//!     .append(CHANGE_BASE.call(args!["RobotBase"])?)?
//!     .append(End)?
//!     .build()?;
//! assert_eq!(frame.to_wire(), "$TMSCT,25,1,ChangeBase(\"RobotBase\"),*08\r\n");
//! # Ok::<(), tmlisten_command::CommandError>(())
//! ```

use std::fmt;

use tmlisten_frame::{Frame, Header, TMSCT, TMSTA};
use tmlisten_script::{Expression, Statement};

use crate::error::{CommandError, Result};

/// Line separator inside a script body.
pub const LINE_SEPARATOR: &str = "\r\n";

/// One rendered command with its header affinity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    affinity: Header,
    text: String,
}

impl Command {
    /// A command from pre-rendered text.
    pub fn raw(affinity: Header, text: impl Into<String>) -> Self {
        Self {
            affinity,
            text: text.into(),
        }
    }

    pub fn affinity(&self) -> Header {
        self.affinity
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<Statement> for Command {
    fn from(statement: Statement) -> Self {
        Self::raw(TMSCT, statement.into_string())
    }
}

impl<T> From<Expression<T>> for Command {
    fn from(expr: Expression<T>) -> Self {
        Self::raw(TMSCT, expr.render())
    }
}

/// Message identifier for script commands.
///
/// The controller echoes the ID as the first field of its reply, so it may
/// not be empty or contain `,`, `\r` or `\n`; [`MessageBuilder::append`]
/// rejects such IDs with [`CommandError::InvalidId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id(pub String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Terminator closing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct End;

/// Terminator that also ends the running external script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptExit;

/// Anything that can be appended to a [`MessageBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Id(String),
    Command(Command),
    End,
    ScriptExit,
}

impl From<Id> for Segment {
    fn from(id: Id) -> Self {
        Segment::Id(id.0)
    }
}

impl From<Command> for Segment {
    fn from(command: Command) -> Self {
        Segment::Command(command)
    }
}

impl From<Statement> for Segment {
    fn from(statement: Statement) -> Self {
        Segment::Command(statement.into())
    }
}

impl<T> From<Expression<T>> for Segment {
    fn from(expr: Expression<T>) -> Self {
        Segment::Command(expr.into())
    }
}

impl From<End> for Segment {
    fn from(_: End) -> Self {
        Segment::End
    }
}

impl From<ScriptExit> for Segment {
    fn from(_: ScriptExit) -> Self {
        Segment::ScriptExit
    }
}

/// Builder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Empty,
    HasId,
    Accumulating,
    Terminated,
}

/// An in-progress message.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    header: Header,
    id: Option<String>,
    lines: Vec<String>,
    state: State,
}

impl MessageBuilder {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            id: None,
            lines: Vec::new(),
            state: State::Empty,
        }
    }

    /// A `TMSCT` message.
    pub fn script() -> Self {
        Self::new(TMSCT)
    }

    /// A `TMSTA` message.
    pub fn status() -> Self {
        Self::new(TMSTA)
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Append the next segment.
    ///
    /// On error the builder is left unchanged.
    pub fn append(&mut self, segment: impl Into<Segment>) -> Result<&mut Self> {
        if self.state == State::Terminated {
            return Err(CommandError::AlreadyTerminated);
        }

        let is_script = self.header == TMSCT;
        match segment.into() {
            Segment::Id(id) => {
                if !is_script {
                    return Err(CommandError::IdNotAllowed(self.header));
                }
                if id.is_empty() || id.contains([',', '\r', '\n']) {
                    return Err(CommandError::InvalidId(id));
                }
                if self.state != State::Empty {
                    return Err(CommandError::MisplacedId);
                }
                self.id = Some(id);
                self.state = State::HasId;
            }
            Segment::Command(command) => {
                if command.affinity() != self.header {
                    return Err(CommandError::HeaderMismatch {
                        header: self.header,
                        affinity: command.affinity(),
                        command: command.text,
                    });
                }
                if !is_script && !self.lines.is_empty() {
                    return Err(CommandError::ExtraSubcommand(self.header));
                }
                self.lines.push(command.text);
                self.state = State::Accumulating;
            }
            Segment::End => {
                if !is_script && self.lines.is_empty() {
                    return Err(CommandError::MissingSubcommand(self.header));
                }
                self.state = State::Terminated;
            }
            Segment::ScriptExit => {
                if !is_script {
                    return Err(CommandError::TerminatorNotAllowed {
                        header: self.header,
                        terminator: "ScriptExit",
                    });
                }
                self.lines.push("ScriptExit()".to_string());
                self.state = State::Terminated;
            }
        }
        Ok(self)
    }

    /// Serialize a terminated message.
    pub fn build(&self) -> Result<Frame> {
        if self.state != State::Terminated {
            return Err(CommandError::Unterminated);
        }

        let body = match self.header {
            Header::ScriptCommand => script_body(self.id.as_deref(), &self.lines),
            _ => self.lines.concat(),
        };
        let frame = Frame::new(self.header, body);
        tracing::debug!(
            header = %frame.header(),
            length = frame.length(),
            lines = self.lines.len(),
            "built message"
        );
        Ok(frame)
    }
}

/// `id,line1\r\nline2`, or just the lines when there is no ID.
fn script_body(id: Option<&str>, lines: &[String]) -> String {
    let joined = lines.join(LINE_SEPARATOR);
    match id {
        Some(id) => format!("{id},{joined}"),
        None => joined,
    }
}

#[cfg(test)]
mod tests {
    use tmlisten_script::{args, expr, Variable};

    use super::*;
    use crate::catalog::{CHANGE_BASE, CHANGE_LOAD, CHANGE_TCP, PTP, QUEUE_TAG, QUEUE_TAG_DONE};

    #[test]
    fn script_message_with_id() {
        let frame = MessageBuilder::script()
            .append(Id::new("1"))
            .unwrap()
            .append(CHANGE_BASE.call(args!["RobotBase"]).unwrap())
            .unwrap()
            .append(End)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(frame.to_wire(), "$TMSCT,25,1,ChangeBase(\"RobotBase\"),*08\r\n");
    }

    #[test]
    fn status_message() {
        let mut builder = MessageBuilder::status();
        builder
            .append(QUEUE_TAG_DONE.call(args![88]).unwrap())
            .unwrap()
            .append(End)
            .unwrap();
        assert_eq!(builder.build().unwrap().to_wire(), "$TMSTA,5,01,88,*6B\r\n");
    }

    #[test]
    fn multi_line_message() {
        let mut builder = MessageBuilder::script();
        builder.append(Id::new("2")).unwrap();
        builder.append(CHANGE_BASE.call(args!["RobotBase"]).unwrap()).unwrap();
        builder.append(CHANGE_TCP.call(args!["NOTOOL"]).unwrap()).unwrap();
        builder.append(CHANGE_LOAD.call(args![10.1]).unwrap()).unwrap();
        builder.append(End).unwrap();

        let frame = builder.build().unwrap();
        assert_eq!(frame.length(), 64);
        assert_eq!(frame.checksum(), 0x68);
    }

    #[test]
    fn declarations_and_motion() {
        let target1 = Variable::<[f32; 6]>::new("targetP1").unwrap();
        let target2 = Variable::<[f32; 6]>::new("targetP2").unwrap();

        let mut builder = MessageBuilder::script();
        builder
            .append(Id::new("2"))
            .unwrap()
            .append(target1.declare([205.0f32, -35.0, 125.0, 0.0, 90.0, 0.0]))
            .unwrap()
            .append(PTP.call(args!["JPP", &target1, 10, 200, 0, false]).unwrap())
            .unwrap()
            .append(QUEUE_TAG.call(args![1]).unwrap())
            .unwrap()
            .append(target2.declare([90.0f32, -35.0, 125.0, 0.0, 90.0, 0.0]))
            .unwrap()
            .append(PTP.call(args!["JPP", &target2, 10, 200, 10, false]).unwrap())
            .unwrap()
            .append(QUEUE_TAG.call(args![2]).unwrap())
            .unwrap()
            .append(End)
            .unwrap();

        assert_eq!(
            builder.build().unwrap().to_wire(),
            "$TMSCT,176,2,float[] targetP1={205,-35,125,0,90,0}\r\n\
             PTP(\"JPP\",targetP1,10,200,0,false)\r\n\
             QueueTag(1)\r\n\
             float[] targetP2={90,-35,125,0,90,0}\r\n\
             PTP(\"JPP\",targetP2,10,200,10,false)\r\n\
             QueueTag(2),*54\r\n"
        );
    }

    #[test]
    fn expressions_and_script_exit() {
        let var_i = Variable::<i32>::new("var_i").unwrap();
        let mut builder = MessageBuilder::script();
        builder
            .append(Id::new("7"))
            .unwrap()
            .append(var_i.declare(100))
            .unwrap()
            .append(expr::assign(&var_i, 1000))
            .unwrap()
            .append(expr::post_inc(&var_i))
            .unwrap()
            .append(ScriptExit)
            .unwrap();

        let frame = builder.build().unwrap();
        assert_eq!(
            frame.body(),
            "7,int var_i=100\r\n(var_i=1000)\r\n(var_i++)\r\nScriptExit()"
        );
    }

    #[test]
    fn queue_tag_with_script_exit() {
        let mut builder = MessageBuilder::script();
        builder
            .append(Id::new("7"))
            .unwrap()
            .append(QUEUE_TAG.call(args![1, 1]).unwrap())
            .unwrap()
            .append(ScriptExit)
            .unwrap();
        let frame = builder.build().unwrap();
        assert_eq!(frame.length(), 29);
        assert_eq!(frame.checksum(), 0x46);
    }

    #[test]
    fn header_affinity_is_enforced() {
        let mut builder = MessageBuilder::status();
        let err = builder
            .append(QUEUE_TAG.call(args![1, 1]).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::HeaderMismatch {
                header: TMSTA,
                affinity: TMSCT,
                command: "QueueTag(1,1)".into(),
            }
        );
        assert_eq!(builder.state(), State::Empty);

        let mut builder = MessageBuilder::script();
        assert!(matches!(
            builder.append(QUEUE_TAG_DONE.call(args![1]).unwrap()),
            Err(CommandError::HeaderMismatch { .. })
        ));
    }

    #[test]
    fn nothing_follows_a_terminator() {
        let mut builder = MessageBuilder::script();
        builder
            .append(Id::new("1"))
            .unwrap()
            .append(QUEUE_TAG.call(args![1, 1]).unwrap())
            .unwrap()
            .append(End)
            .unwrap();

        let tag = QUEUE_TAG.call(args![2]).unwrap();
        assert_eq!(builder.append(tag).unwrap_err(), CommandError::AlreadyTerminated);
        assert_eq!(builder.append(End).unwrap_err(), CommandError::AlreadyTerminated);
        assert_eq!(
            builder.append(ScriptExit).unwrap_err(),
            CommandError::AlreadyTerminated
        );
        assert_eq!(
            builder.append(Id::new("2")).unwrap_err(),
            CommandError::AlreadyTerminated
        );
    }

    #[test]
    fn id_rules() {
        let mut status = MessageBuilder::status();
        assert_eq!(
            status.append(Id::new("1")).unwrap_err(),
            CommandError::IdNotAllowed(TMSTA)
        );

        let mut script = MessageBuilder::script();
        script.append(Id::new("1")).unwrap();
        assert_eq!(script.append(Id::new("2")).unwrap_err(), CommandError::MisplacedId);

        let mut script = MessageBuilder::script();
        script.append(QUEUE_TAG.call(args![1]).unwrap()).unwrap();
        assert_eq!(script.append(Id::new("1")).unwrap_err(), CommandError::MisplacedId);
    }

    #[test]
    fn ids_that_would_split_the_body_are_rejected() {
        for id in ["", "1,2", "1\r\n2", "7\n"] {
            let mut script = MessageBuilder::script();
            assert_eq!(
                script.append(Id::new(id)).unwrap_err(),
                CommandError::InvalidId(id.to_string())
            );
            assert_eq!(script.state(), State::Empty);
        }

        let mut script = MessageBuilder::script();
        script.append(Id::new("job-7")).unwrap().append(End).unwrap();
        assert_eq!(script.build().unwrap().body(), "job-7,");
    }

    #[test]
    fn status_messages_carry_one_subcommand() {
        let mut builder = MessageBuilder::status();
        assert_eq!(
            builder.append(End).unwrap_err(),
            CommandError::MissingSubcommand(TMSTA)
        );
        builder.append(QUEUE_TAG_DONE.call(args![1]).unwrap()).unwrap();
        assert_eq!(
            builder
                .append(QUEUE_TAG_DONE.call(args![2]).unwrap())
                .unwrap_err(),
            CommandError::ExtraSubcommand(TMSTA)
        );
        assert_eq!(
            builder.append(ScriptExit).unwrap_err(),
            CommandError::TerminatorNotAllowed {
                header: TMSTA,
                terminator: "ScriptExit",
            }
        );
    }

    #[test]
    fn unterminated_messages_do_not_build() {
        let mut builder = MessageBuilder::script();
        assert_eq!(builder.build().unwrap_err(), CommandError::Unterminated);
        builder.append(QUEUE_TAG.call(args![1]).unwrap()).unwrap();
        assert_eq!(builder.build().unwrap_err(), CommandError::Unterminated);
        assert_eq!(builder.state(), State::Accumulating);
    }

    #[test]
    fn script_without_id() {
        let mut builder = MessageBuilder::script();
        builder
            .append(CHANGE_BASE.call(args!["RobotBase"]).unwrap())
            .unwrap()
            .append(End)
            .unwrap();
        let frame = builder.build().unwrap();
        assert_eq!(frame.length(), 23);
        assert_eq!(frame.checksum(), 0x13);
    }

    #[test]
    fn raw_commands() {
        let mut builder = MessageBuilder::script();
        builder
            .append(Id::new("3"))
            .unwrap()
            .append(Command::raw(TMSCT, "Pause()"))
            .unwrap()
            .append(End)
            .unwrap();
        assert_eq!(builder.build().unwrap().body(), "3,Pause()");
    }
}
