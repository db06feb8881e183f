//! `tokio_util::codec` adapter for framed listen-node connections.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, encode_frame, Frame, FrameConfig};
use crate::error::FrameError;

/// Codec for use with `tokio_util::codec::Framed`.
#[derive(Debug, Clone, Default)]
pub struct ListenCodec {
    config: FrameConfig,
}

impl ListenCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Decoder for ListenCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        decode_frame(src, self.config.max_frame_size)
    }
}

impl Encoder<Frame> for ListenCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        <Self as Encoder<&Frame>>::encode(self, &item, dst)
    }
}

impl Encoder<&Frame> for ListenCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        let size = item.wire_size();
        if size > self.config.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size,
                max: self.config.max_frame_size,
            });
        }
        encode_frame(item, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;

    #[test]
    fn decodes_across_partial_buffers() {
        let mut codec = ListenCodec::new();
        let mut buf = BytesMut::from(&b"$TMSCT,4,1,"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"OK,*5C\r\n");
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.header(), Header::ScriptCommand);
        assert_eq!(frame.body(), "1,OK");
        assert!(buf.is_empty());
    }

    #[test]
    fn encodes_owned_and_borrowed_frames() {
        let mut codec = ListenCodec::new();
        let frame = Frame::new(Header::StatusQuery, "01,88");
        let mut buf = BytesMut::new();

        codec.encode(&frame, &mut buf).unwrap();
        codec.encode(frame, &mut buf).unwrap();
        assert_eq!(&buf[..], b"$TMSTA,5,01,88,*6B\r\n$TMSTA,5,01,88,*6B\r\n");
    }

    #[test]
    fn enforces_max_frame_size() {
        let mut codec = ListenCodec::with_config(FrameConfig {
            max_frame_size: 8,
            ..FrameConfig::default()
        });
        let mut buf = BytesMut::new();
        let err = codec
            .encode(Frame::new(Header::StatusQuery, "00"), &mut buf)
            .unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { .. }));
    }
}
