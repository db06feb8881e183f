use std::io::{ErrorKind, Write};
use std::net::TcpStream;

use bytes::BytesMut;

use crate::codec::{encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::header::Header;

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// Writes complete frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Frame a body under `header` and write it.
    pub fn send(&mut self, header: Header, body: &str) -> Result<()> {
        self.write_frame(&Frame::new(header, body))
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let size = frame.wire_size();
        if size > self.config.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size,
                max: self.config.max_frame_size,
            });
        }

        self.buf.clear();
        encode_frame(frame, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum frame size for subsequent encoding.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameWriter<TcpStream> {
    /// Create a frame writer for a listen-node connection and apply the write timeout from config.
    pub fn with_config_tcp(inner: TcpStream, config: FrameConfig) -> Result<Self> {
        inner.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{decode_frame, DEFAULT_MAX_FRAME};

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.send(Header::StatusQuery, "01,88").unwrap();

        let written = writer.into_inner().into_inner();
        assert_eq!(written, b"$TMSTA,5,01,88,*6B\r\n");
    }

    #[test]
    fn write_multiple_frames() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer
            .send(Header::ScriptCommand, "1,ChangeBase(\"RobotBase\")")
            .unwrap();
        writer.send(Header::StatusQuery, "00").unwrap();

        let mut wire = BytesMut::from(writer.into_inner().into_inner().as_slice());
        let f1 = decode_frame(&mut wire, DEFAULT_MAX_FRAME).unwrap().unwrap();
        let f2 = decode_frame(&mut wire, DEFAULT_MAX_FRAME).unwrap().unwrap();
        assert_eq!(f1.checksum(), 0x08);
        assert_eq!(f2.to_wire(), "$TMSTA,2,00,*41\r\n");
        assert!(wire.is_empty());
    }

    #[test]
    fn rejects_oversized_frame() {
        let cfg = FrameConfig {
            max_frame_size: 12,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);
        let err = writer.send(Header::StatusQuery, "01,88").unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { size: 20, max: 12 }));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    struct ShortWriter {
        written: Vec<u8>,
        interrupted: bool,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            let n = buf.len().min(3);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_and_interrupted_writes_complete() {
        let mut writer = FrameWriter::new(ShortWriter {
            written: Vec::new(),
            interrupted: false,
        });
        writer.send(Header::Error, "F1").unwrap();
        assert_eq!(writer.get_ref().written, b"$CPERR,2,F1,*3F\r\n");
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn zero_write_reports_closed() {
        let mut writer = FrameWriter::new(ClosedWriter);
        let err = writer.send(Header::StatusQuery, "00").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }
}
