//! Controller replies.

use std::fmt;

use serde::{Deserialize, Serialize};
use tmlisten_frame::{Frame, Header};

use crate::error::DecodeError;
use crate::grammar::LINE_SEPARATOR;

/// Error codes carried by `CPERR` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NoError = 0x00,
    BadArgument = 0x01,
    BadCheckSum = 0x02,
    BadHeader = 0x03,
    InvalidData = 0x04,
    NotInListenNode = 0xF1,
}

impl ErrorCode {
    /// The two-character wire code.
    pub const fn wire_code(self) -> &'static str {
        match self {
            ErrorCode::NoError => "00",
            ErrorCode::BadArgument => "01",
            ErrorCode::BadCheckSum => "02",
            ErrorCode::BadHeader => "03",
            ErrorCode::InvalidData => "04",
            ErrorCode::NotInListenNode => "F1",
        }
    }

    /// Parse a wire code. `F1` is the only non-decimal code.
    pub fn from_wire(code: &str) -> Option<Self> {
        if code == "F1" {
            return Some(ErrorCode::NotInListenNode);
        }
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match code.parse::<u8>().ok()? {
            0 => Some(ErrorCode::NoError),
            1 => Some(ErrorCode::BadArgument),
            2 => Some(ErrorCode::BadCheckSum),
            3 => Some(ErrorCode::BadHeader),
            4 => Some(ErrorCode::InvalidData),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::NoError => "no error",
            ErrorCode::BadArgument => "bad argument",
            ErrorCode::BadCheckSum => "bad checksum",
            ErrorCode::BadHeader => "bad header",
            ErrorCode::InvalidData => "invalid data",
            ErrorCode::NotInListenNode => "not in listen node",
        };
        f.write_str(text)
    }
}

/// Reply to a `TMSTA` subcommand. Fields are kept as text; their meaning
/// depends on the subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub subcommand: u8,
    pub data: Vec<String>,
}

/// Result of a `TMSCT` script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResultReply {
    pub id: String,
    pub success: bool,
    /// Line numbers the controller reported, in order.
    pub abnormal_lines: Vec<i32>,
}

/// Error reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub code: ErrorCode,
}

/// Any reply frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Status(StatusReply),
    ScriptResult(ScriptResultReply),
    Error(ErrorReply),
}

impl Response {
    /// Interpret a decoded frame as a reply.
    pub fn from_frame(frame: &Frame) -> Result<Self, DecodeError> {
        match frame.header() {
            Header::StatusQuery => parse_status(frame.body()).map(Response::Status),
            Header::ScriptCommand => parse_script_result(frame.body()).map(Response::ScriptResult),
            Header::Error => {
                let code = ErrorCode::from_wire(frame.body())
                    .ok_or_else(|| DecodeError::UnknownErrorCode(frame.body().to_string()))?;
                Ok(Response::Error(ErrorReply { code }))
            }
        }
    }

    /// Encode the reply back into a frame.
    pub fn to_frame(&self) -> Frame {
        match self {
            Response::Status(reply) => {
                let mut body = format!("{:02}", reply.subcommand);
                for field in &reply.data {
                    body.push(',');
                    body.push_str(field);
                }
                Frame::new(Header::StatusQuery, body)
            }
            Response::ScriptResult(reply) => {
                let mut body = format!(
                    "{},{}",
                    reply.id,
                    if reply.success { OK } else { ERROR }
                );
                for line in &reply.abnormal_lines {
                    body.push(';');
                    body.push_str(&line.to_string());
                }
                Frame::new(Header::ScriptCommand, body)
            }
            Response::Error(reply) => Frame::new(Header::Error, reply.code.wire_code()),
        }
    }

    pub fn header(&self) -> Header {
        match self {
            Response::Status(_) => Header::StatusQuery,
            Response::ScriptResult(_) => Header::ScriptCommand,
            Response::Error(_) => Header::Error,
        }
    }
}

const OK: &str = "OK";
const ERROR: &str = "ERROR";

fn invalid(message: impl Into<String>) -> DecodeError {
    DecodeError::InvalidData(message.into())
}

fn parse_status(body: &str) -> Result<StatusReply, DecodeError> {
    let mut fields = body.split(',');
    let code = fields.next().unwrap_or_default();
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("subcommand code {code:?} is not two digits")));
    }
    let subcommand = code
        .parse()
        .map_err(|_| invalid(format!("subcommand code {code:?}")))?;

    Ok(StatusReply {
        subcommand,
        data: fields.map(str::to_string).collect(),
    })
}

fn parse_script_result(body: &str) -> Result<ScriptResultReply, DecodeError> {
    let (id, result) = body
        .split_once(',')
        .ok_or_else(|| invalid("script result has no id"))?;
    if id.is_empty() || id.contains(LINE_SEPARATOR) {
        return Err(invalid(format!("script result id {id:?}")));
    }

    let mut parts = result.split(';');
    let success = match parts.next() {
        Some(OK) => true,
        Some(ERROR) => false,
        other => {
            return Err(invalid(format!(
                "expected OK or ERROR, got {:?}",
                other.unwrap_or_default()
            )))
        }
    };
    let abnormal_lines = parts
        .map(|line| {
            line.parse::<i32>()
                .map_err(|_| invalid(format!("line number {line:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScriptResultReply {
        id: id.to_string(),
        success,
        abnormal_lines,
    })
}

/// Decode one complete wire frame into a reply.
///
/// Faults are returned, never swallowed; [`DecodeError::error_code`]
/// classifies them.
pub fn parse_incoming(bytes: &[u8]) -> Result<Response, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|err| invalid(err.to_string()))?;
    let frame = Frame::parse(text)?;
    let response = Response::from_frame(&frame);
    match &response {
        Ok(reply) => tracing::debug!(header = %frame.header(), ?reply, "decoded reply"),
        Err(err) => tracing::warn!(header = %frame.header(), body = frame.body(), %err, "unclassified reply"),
    }
    response
}

#[cfg(test)]
mod tests {
    use tmlisten_frame::FrameError;

    use super::*;

    #[test]
    fn status_replies() {
        let reply = parse_incoming(b"$TMSTA,10,01,08,true,*6D\r\n").unwrap();
        assert_eq!(
            reply,
            Response::Status(StatusReply {
                subcommand: 1,
                data: vec!["08".into(), "true".into()],
            })
        );

        let reply = parse_incoming(b"$TMSTA,9,00,false,,*37\r\n").unwrap();
        assert_eq!(
            reply,
            Response::Status(StatusReply {
                subcommand: 0,
                data: vec!["false".into(), String::new()],
            })
        );

        let reply = parse_incoming(b"$TMSTA,2,00,*41\r\n").unwrap();
        assert_eq!(
            reply,
            Response::Status(StatusReply {
                subcommand: 0,
                data: vec![],
            })
        );
    }

    #[test]
    fn script_results() {
        let ok = parse_incoming(b"$TMSCT,4,1,OK,*5C\r\n").unwrap();
        assert_eq!(
            ok,
            Response::ScriptResult(ScriptResultReply {
                id: "1".into(),
                success: true,
                abnormal_lines: vec![],
            })
        );

        let warned = parse_incoming(b"$TMSCT,8,2,OK;2;3,*52\r\n").unwrap();
        assert_eq!(
            warned,
            Response::ScriptResult(ScriptResultReply {
                id: "2".into(),
                success: true,
                abnormal_lines: vec![2, 3],
            })
        );

        let failed = parse_incoming(b"$TMSCT,13,3,ERROR;1;2;3,*3F\r\n").unwrap();
        assert_eq!(
            failed,
            Response::ScriptResult(ScriptResultReply {
                id: "3".into(),
                success: false,
                abnormal_lines: vec![1, 2, 3],
            })
        );

        let reply = parse_incoming(b"$TMSCT,5,10,OK,*6D\r\n").unwrap();
        assert!(matches!(reply, Response::ScriptResult(r) if r.id == "10" && r.success));
    }

    #[test]
    fn error_replies() {
        let cases: [(&[u8], ErrorCode); 5] = [
            (b"$CPERR,2,01,*49\r\n", ErrorCode::BadArgument),
            (b"$CPERR,2,02,*4A\r\n", ErrorCode::BadCheckSum),
            (b"$CPERR,2,03,*4B\r\n", ErrorCode::BadHeader),
            (b"$CPERR,2,04,*4C\r\n", ErrorCode::InvalidData),
            (b"$CPERR,2,F1,*3F\r\n", ErrorCode::NotInListenNode),
        ];
        for (wire, code) in cases {
            assert_eq!(
                parse_incoming(wire).unwrap(),
                Response::Error(ErrorReply { code })
            );
        }
    }

    #[test]
    fn unknown_error_code_is_a_decode_failure() {
        let frame = Frame::new(Header::Error, "09");
        let err = parse_incoming(frame.to_wire().as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownErrorCode(ref code) if code == "09"));
        assert_eq!(err.error_code(), ErrorCode::InvalidData);

        assert_eq!(ErrorCode::from_wire("f1"), None);
        assert_eq!(ErrorCode::from_wire("1"), None);
        assert_eq!(ErrorCode::from_wire("+1"), None);
    }

    #[test]
    fn framing_faults_are_classified() {
        let err = parse_incoming(b"$TMSTA,5,01,88,*00\r\n").unwrap_err();
        assert!(matches!(err, DecodeError::Frame(FrameError::BadCheckSum { .. })));
        assert_eq!(err.error_code(), ErrorCode::BadCheckSum);

        let err = parse_incoming(b"$TMsct,25,1,ChangeBase(\"RobotBase\"),*28\r\n").unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::BadHeader);

        let err = parse_incoming(b"$TMSCT,-100,1,ChangeBase(\"RobotBase\"),*13\r\n").unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidData);

        let err = parse_incoming(b"$TMSTA,4,XXXX,*47\r\n").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidData(_)));
        assert_eq!(err.error_code(), ErrorCode::InvalidData);

        let err = parse_incoming(&[b'$', 0xFF, b'\r', b'\n']).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidData);
    }

    #[test]
    fn malformed_script_results() {
        for body in ["OK", "1,MAYBE", "1,ERROR;x", ",OK", "1,OK;"] {
            let frame = Frame::new(Header::ScriptCommand, body);
            let err = Response::from_frame(&frame).unwrap_err();
            assert!(matches!(err, DecodeError::InvalidData(_)), "{body}");
        }
    }

    #[test]
    fn replies_round_trip() {
        let wires: [&[u8]; 8] = [
            b"$TMSTA,10,01,08,true,*6D\r\n",
            b"$TMSTA,15,00,true,Listen1,*79\r\n",
            b"$TMSTA,10,01,88,none,*79\r\n",
            b"$TMSTA,9,00,false,,*37\r\n",
            b"$TMSCT,9,4,ERROR;1,*02\r\n",
            b"$TMSCT,8,2,OK;2;3,*52\r\n",
            b"$CPERR,2,F1,*3F\r\n",
            b"$CPERR,2,00,*48\r\n",
        ];
        for wire in wires {
            let reply = parse_incoming(wire).unwrap();
            assert_eq!(reply.to_frame().to_wire().as_bytes(), wire);
            assert_eq!(reply.header(), reply.to_frame().header());
        }
    }

    #[test]
    fn serializes_with_kind_tags() {
        let reply = Response::Error(ErrorReply {
            code: ErrorCode::NotInListenNode,
        });
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "error", "code": "not_in_listen_node" })
        );

        let reply = Response::ScriptResult(ScriptResultReply {
            id: "1".into(),
            success: true,
            abnormal_lines: vec![],
        });
        let text = serde_json::to_string(&reply).unwrap();
        assert!(text.contains("\"kind\":\"script_result\""));
        let back: Response = serde_json::from_str(&text).unwrap();
        assert_eq!(back, reply);
    }
}
