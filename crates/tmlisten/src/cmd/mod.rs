use clap::{Args, Subcommand, ValueEnum};
use tmlisten_command::{grammar, End, Id, MessageBuilder, ScriptExit};
use tmlisten_frame::{Frame, Header};

use crate::exit::{command_error, CliResult};
use crate::output::OutputFormat;

pub mod checksum;
pub mod decode;
pub mod frame;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the checksum of a frame prefix.
    Checksum(ChecksumArgs),
    /// Frame raw script lines into a message.
    Frame(FrameArgs),
    /// Decode a controller reply.
    Decode(DecodeArgs),
    /// Send one message to a listen node and print the reply.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Checksum(args) => checksum::run(args, format),
        Command::Frame(args) => frame::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HeaderArg {
    Tmsct,
    Tmsta,
}

impl From<HeaderArg> for Header {
    fn from(arg: HeaderArg) -> Self {
        match arg {
            HeaderArg::Tmsct => Header::ScriptCommand,
            HeaderArg::Tmsta => Header::StatusQuery,
        }
    }
}

/// Message content shared by `frame` and `send`.
#[derive(Args, Debug)]
pub struct MessageArgs {
    /// Message header.
    #[arg(long, value_enum, ignore_case = true, default_value = "tmsct")]
    pub header: HeaderArg,
    /// Script ID placed before the lines.
    #[arg(long)]
    pub id: Option<String>,
    /// Finish with ScriptExit() instead of a plain end.
    #[arg(long)]
    pub exit: bool,
    /// Script lines or a status subcommand, sent verbatim (`\r` and `\n` escapes allowed).
    #[arg(value_name = "LINE")]
    pub lines: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// Frame prefix, e.g. `$TMSTA,5,01,88,` (the leading `$` is optional).
    pub text: String,
}

#[derive(Args, Debug)]
pub struct FrameArgs {
    #[command(flatten)]
    pub message: MessageArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Wire frame; a missing trailing CRLF is added.
    pub frame: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Listen node address (`host[:port]`, port 5890 by default).
    pub addr: String,
    /// Connect and reply timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
    #[command(flatten)]
    pub message: MessageArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Expand literal `\r` and `\n` escapes typed on the command line.
pub fn unescape(text: &str) -> String {
    text.replace("\\r", "\r").replace("\\n", "\n")
}

pub fn build_message(args: &MessageArgs) -> CliResult<Frame> {
    let header = Header::from(args.header);
    let mut builder = MessageBuilder::new(header);
    if let Some(id) = &args.id {
        builder
            .append(Id::new(id.as_str()))
            .map_err(|err| command_error("invalid message", err))?;
    }
    for line in &args.lines {
        builder
            .append(grammar::Command::raw(header, unescape(line)))
            .map_err(|err| command_error("invalid message", err))?;
    }
    let terminated = if args.exit {
        builder.append(ScriptExit)
    } else {
        builder.append(End)
    };
    terminated.map_err(|err| command_error("invalid message", err))?;
    builder
        .build()
        .map_err(|err| command_error("invalid message", err))
}
