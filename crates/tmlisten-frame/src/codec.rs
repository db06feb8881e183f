use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::header::Header;

/// Leading byte of every frame.
pub const START: u8 = b'$';

/// Marks the checksum field.
pub const CHECKSUM_MARKER: u8 = b'*';

/// Frame terminator.
pub const TERMINATOR: &[u8; 2] = b"\r\n";

/// Bytes following the body: `,*CS\r\n`.
pub const TRAILER_SIZE: usize = 6;

/// Default maximum frame size: 64 KiB.
pub const DEFAULT_MAX_FRAME: usize = 64 * 1024;

/// TCP port the controller's listen node accepts connections on.
pub const DEFAULT_PORT: u16 = 5890;

/// XOR checksum over a frame prefix.
///
/// The input is everything from the leading `$` (skipped if present) up to and
/// including the comma before `*`. The computation is purely byte-oriented:
/// header tokens are not validated here.
pub fn checksum(data: &[u8]) -> u8 {
    let data = data.strip_prefix(b"$").unwrap_or(data);
    data.iter().fold(0, |acc, byte| acc ^ byte)
}

/// [`checksum`] rendered as two uppercase hex digits.
pub fn checksum_hex(text: &str) -> String {
    format!("{:02X}", checksum(text.as_bytes()))
}

/// One complete wire unit.
///
/// Immutable once constructed. The checksum always matches the header,
/// length field and body it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    header: Header,
    length: i64,
    body: String,
    checksum: u8,
}

impl Frame {
    /// Create a frame whose length field is the byte length of `body`.
    pub fn new(header: Header, body: impl Into<String>) -> Self {
        let body = body.into();
        let length = body.len() as i64;
        Self::with_length(header, length, body)
    }

    /// Create a frame with an externally supplied length field.
    ///
    /// The length is written as given, even when negative or inconsistent
    /// with the body; the checksum covers it like any other byte.
    pub fn with_length(header: Header, length: i64, body: impl Into<String>) -> Self {
        let body = body.into();
        let checksum = checksum(checksum_input(header, length, &body).as_bytes());
        Self {
            header,
            length,
            body,
            checksum,
        }
    }

    /// Parse exactly one complete frame from `text`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut buf = BytesMut::from(text.as_bytes());
        match decode_frame(&mut buf, usize::MAX)? {
            Some(frame) if buf.is_empty() => Ok(frame),
            Some(_) => Err(FrameError::invalid(format!(
                "{} trailing bytes after frame",
                buf.len()
            ))),
            None => Err(FrameError::invalid("incomplete frame")),
        }
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// The length field as transmitted.
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Comma-separated fields of the body.
    pub fn fields(&self) -> std::str::Split<'_, char> {
        self.body.split(',')
    }

    /// The full `$HEADER,LEN,BODY,*CS\r\n` text.
    pub fn to_wire(&self) -> String {
        format!(
            "${},{},{},*{:02X}\r\n",
            self.header, self.length, self.body, self.checksum
        )
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        // `$` + header + `,` + length digits + `,` + body + trailer
        1 + self.header.token().len() + 1 + self.length.to_string().len() + 1
            + self.body.len()
            + TRAILER_SIZE
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for Frame {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn checksum_input(header: Header, length: i64, body: &str) -> String {
    format!("{header},{length},{body},")
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───┬────────┬───┬────────┬───┬──────┬───┬───┬──────┬──────┐
/// │ $ │ HEADER │ , │ LENGTH │ , │ BODY │ , │ * │ CS   │ \r\n │
/// │   │ 5B     │   │ dec    │   │ LEN  │   │   │ 2 hex│      │
/// └───┴────────┴───┴────────┴───┴──────┴───┴───┴──────┴──────┘
/// ```
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) {
    dst.reserve(frame.wire_size());
    dst.put_u8(START);
    dst.put_slice(frame.header.token().as_bytes());
    dst.put_u8(b',');
    dst.put_slice(frame.length.to_string().as_bytes());
    dst.put_u8(b',');
    dst.put_slice(frame.body.as_bytes());
    dst.put_u8(b',');
    dst.put_u8(CHECKSUM_MARKER);
    dst.put_slice(format!("{:02X}", frame.checksum).as_bytes());
    dst.put_slice(TERMINATOR);
    tracing::debug!(header = %frame.header, length = frame.length, "encoded frame");
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. On error, the
/// offending bytes are consumed as well, so the next call starts at the
/// next `$`.
pub fn decode_frame(src: &mut BytesMut, max_frame: usize) -> Result<Option<Frame>> {
    if src.is_empty() {
        return Ok(None);
    }

    if src[0] != START {
        let found = src[0];
        discard_to_next_start(src);
        return Err(FrameError::invalid(format!(
            "expected '$' at frame start, found 0x{found:02X}"
        )));
    }

    let Some(header_end) = find_comma(src, 1) else {
        return pending(src, max_frame);
    };
    let header = match std::str::from_utf8(&src[1..header_end])
        .ok()
        .and_then(Header::from_token)
    {
        Some(header) => header,
        None => {
            let token = String::from_utf8_lossy(&src[1..header_end]).into_owned();
            discard_to_next_start(src);
            return Err(FrameError::BadHeader(token));
        }
    };

    let Some(length_end) = find_comma(src, header_end + 1) else {
        return pending(src, max_frame);
    };
    let length = match parse_length(&src[header_end + 1..length_end]) {
        Ok(length) => length,
        Err(err) => {
            discard_to_next_start(src);
            return Err(err);
        }
    };

    let body_start = length_end + 1;
    let Some(total) = body_start
        .checked_add(length)
        .and_then(|end| end.checked_add(TRAILER_SIZE))
    else {
        discard_to_next_start(src);
        return Err(FrameError::invalid("length field overflows"));
    };
    if total > max_frame {
        discard_to_next_start(src);
        return Err(FrameError::FrameTooLarge {
            size: total,
            max: max_frame,
        });
    }
    if src.len() < total {
        return Ok(None); // Need more data
    }

    let body_end = body_start + length;
    let trailer = &src[body_end..total];
    if trailer[0] != b',' || trailer[1] != CHECKSUM_MARKER || &trailer[4..] != TERMINATOR {
        src.advance(total);
        return Err(FrameError::invalid(
            "malformed trailer (length field does not match body)",
        ));
    }
    let Some(actual) = parse_hex_byte(trailer[2], trailer[3]) else {
        src.advance(total);
        return Err(FrameError::invalid("checksum field is not two hex digits"));
    };

    let expected = checksum(&src[1..=body_end]);
    if expected != actual {
        tracing::warn!(%header, expected, actual, "frame checksum mismatch");
        src.advance(total);
        return Err(FrameError::BadCheckSum { expected, actual });
    }

    let body = match std::str::from_utf8(&src[body_start..body_end]) {
        Ok(body) => body.to_string(),
        Err(_) => {
            src.advance(total);
            return Err(FrameError::invalid("body is not valid UTF-8"));
        }
    };
    src.advance(total);

    tracing::debug!(%header, length, "decoded frame");
    Ok(Some(Frame {
        header,
        length: length as i64,
        body,
        checksum: actual,
    }))
}

fn find_comma(src: &[u8], from: usize) -> Option<usize> {
    src[from..]
        .iter()
        .position(|&b| b == b',')
        .map(|pos| from + pos)
}

/// An incomplete prefix already longer than `max_frame` can never become a
/// frame; drop it so decoding resumes at the next `$`.
fn pending(src: &mut BytesMut, max_frame: usize) -> Result<Option<Frame>> {
    let size = src.len();
    if size > max_frame {
        discard_to_next_start(src);
        return Err(FrameError::FrameTooLarge {
            size,
            max: max_frame,
        });
    }
    Ok(None)
}

fn parse_length(field: &[u8]) -> Result<usize> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::invalid(format!(
            "length field {:?} is not a non-negative decimal",
            String::from_utf8_lossy(field)
        )));
    }
    field.iter().try_fold(0usize, |acc, &digit| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(usize::from(digit - b'0')))
            .ok_or_else(|| FrameError::invalid("length field overflows"))
    })
}

/// Two uppercase hex digits, as the encoder writes them.
fn parse_hex_byte(high: u8, low: u8) -> Option<u8> {
    let digit = |b: u8| match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    };
    Some(digit(high)? << 4 | digit(low)?)
}

fn discard_to_next_start(src: &mut BytesMut) {
    let skip = src[1..]
        .iter()
        .position(|&b| b == START)
        .map_or(src.len(), |pos| pos + 1);
    src.advance(skip);
}

/// Configuration for the frame reader and writer.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum frame size in bytes. Default: 64 KiB.
    pub max_frame_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
