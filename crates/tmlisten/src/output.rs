use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tmlisten_command::Response;
use tmlisten_frame::Frame;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ChecksumOutput<'a> {
    input: &'a str,
    checksum: String,
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    header: &'static str,
    length: i64,
    body: &'a str,
    checksum: String,
    wire: String,
}

#[derive(Serialize)]
struct ResponseOutput<'a> {
    header: &'static str,
    #[serde(flatten)]
    response: &'a Response,
}

pub fn print_checksum(input: &str, checksum: u8, format: OutputFormat) {
    let hex = format!("{checksum:02X}");
    match format {
        OutputFormat::Json => print_json(&ChecksumOutput {
            input,
            checksum: hex,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["INPUT", "CHECKSUM"]);
            table.add_row(vec![escape(input), hex]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => println!("{hex}"),
    }
}

pub fn print_frame(frame: &Frame, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&FrameOutput {
            header: frame.header().token(),
            length: frame.length(),
            body: frame.body(),
            checksum: format!("{:02X}", frame.checksum()),
            wire: frame.to_wire(),
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["HEADER", "LENGTH", "CHECKSUM", "BODY"]);
            table.add_row(vec![
                frame.header().to_string(),
                frame.length().to_string(),
                format!("{:02X}", frame.checksum()),
                escape(frame.body()),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "header={} length={} checksum={:02X} body={}",
                frame.header(),
                frame.length(),
                frame.checksum(),
                escape(frame.body())
            );
        }
        OutputFormat::Raw => print_raw(frame.to_wire().as_bytes()),
    }
}

pub fn print_response(response: &Response, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ResponseOutput {
            header: response.header().token(),
            response,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            table.add_row(vec!["header".to_string(), response.header().to_string()]);
            for (field, value) in response_fields(response) {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let fields: Vec<String> = response_fields(response)
                .into_iter()
                .map(|(field, value)| format!("{field}={value}"))
                .collect();
            println!("{} {}", response.header(), fields.join(" "));
        }
        OutputFormat::Raw => print_raw(response.to_frame().to_wire().as_bytes()),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn response_fields(response: &Response) -> Vec<(&'static str, String)> {
    match response {
        Response::Status(reply) => vec![
            ("kind", "status".to_string()),
            ("subcommand", format!("{:02}", reply.subcommand)),
            ("data", reply.data.join(",")),
        ],
        Response::ScriptResult(reply) => {
            let lines: Vec<String> = reply.abnormal_lines.iter().map(i32::to_string).collect();
            vec![
                ("kind", "script_result".to_string()),
                ("id", reply.id.clone()),
                ("success", reply.success.to_string()),
                ("abnormal_lines", lines.join(";")),
            ]
        }
        Response::Error(reply) => vec![
            ("kind", "error".to_string()),
            ("code", reply.code.wire_code().to_string()),
            ("description", reply.code.to_string()),
        ],
    }
}

/// Show embedded line breaks as escapes so a body fits on one line.
fn escape(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}
