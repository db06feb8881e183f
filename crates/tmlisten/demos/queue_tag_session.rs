//! Scripted listen-node session against a simulated controller on loopback.
//!
//! Run with:
//!   cargo run -p tmlisten --example queue-tag-session
//!
//! The session sends a motion script tagged with a queue tag, polls the tag
//! through a status query and finally exits the script.

use std::error::Error;
use std::net::{TcpListener, TcpStream};
use std::thread;

use tmlisten::command::catalog::{PTP, QUEUE_TAG, QUEUE_TAG_DONE};
use tmlisten::command::{
    dispatch, End, Id, ListenerHandle, MessageBuilder, MessageStatus, Outgoing,
    Response, ScriptExit, ScriptResultReply, StatusReply,
};
use tmlisten::frame::{Frame, FrameReader, FrameWriter, Header};
use tmlisten::script::{args, Variable};

#[derive(Default)]
struct Session {
    step: u32,
}

impl Session {
    fn next_message(&mut self) -> Result<Outgoing, Box<dyn Error>> {
        self.step += 1;
        let frame = match self.step {
            1 => {
                let target = Variable::<[f32; 6]>::new("targetP1")?;
                MessageBuilder::script()
                    .append(Id::new("1"))?
                    .append(target.declare([205.0f32, -35.0, 125.0, 0.0, 90.0, 0.0]))?
                    .append(PTP.call(args!["JPP", &target, 10, 200, 0, false])?)?
                    .append(QUEUE_TAG.call(args![1])?)?
                    .append(End)?
                    .build()?
            }
            2 => MessageBuilder::status()
                .append(QUEUE_TAG_DONE.call(args![1])?)?
                .append(End)?
                .build()?,
            3 => MessageBuilder::script()
                .append(Id::new("2"))?
                .append(ScriptExit)?
                .build()?,
            _ => return Ok(Outgoing::Defer),
        };
        Ok(frame.into())
    }
}

impl ListenerHandle for Session {
    fn generate_command(&mut self, previous: MessageStatus) -> Outgoing {
        if previous == MessageStatus::NotYetResponded && self.step > 0 {
            return Outgoing::Defer;
        }
        self.next_message().unwrap_or_else(|err| {
            eprintln!("cannot build message: {err}");
            Outgoing::Defer
        })
    }

    fn on_status_reply(&mut self, reply: &StatusReply) {
        eprintln!("status {:02}: {}", reply.subcommand, reply.data.join(","));
    }

    fn on_script_result(&mut self, reply: &ScriptResultReply) {
        eprintln!("script {} finished, success={}", reply.id, reply.success);
    }
}

/// Answers every script with `OK` and every queue tag query with `true`.
fn controller(stream: TcpStream) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut reader = FrameReader::new(stream.try_clone()?);
    let mut writer = FrameWriter::new(stream);
    loop {
        let request = match reader.read_frame() {
            Ok(frame) => frame,
            Err(_) => return Ok(()),
        };
        eprintln!("controller received {}", request.to_wire().trim_end());
        let reply = match request.header() {
            Header::ScriptCommand => {
                let id = request.body().split(',').next().unwrap_or_default();
                Frame::new(Header::ScriptCommand, format!("{id},OK"))
            }
            _ => Frame::new(Header::StatusQuery, format!("{},true", request.body())),
        };
        writer.write_frame(&reply)?;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let node = thread::spawn(move || -> Result<(), Box<dyn Error + Send + Sync>> {
        let (stream, _) = listener.accept()?;
        controller(stream)
    });

    let stream = TcpStream::connect(addr)?;
    let mut reader = FrameReader::new(stream.try_clone()?);
    let mut writer = FrameWriter::new(stream);

    let mut session = Session::default();
    loop {
        let frame = match session.generate_command(MessageStatus::Responded) {
            Outgoing::Frame(frame) => frame,
            Outgoing::Defer => break,
        };
        writer.write_frame(&frame)?;

        let response = Response::from_frame(&reader.read_frame()?)?;
        dispatch(&mut session, &response);
    }

    drop(writer);
    drop(reader);
    if let Err(err) = node.join().map_err(|_| "controller thread panicked")? {
        eprintln!("controller stopped: {err}");
    }
    Ok(())
}
