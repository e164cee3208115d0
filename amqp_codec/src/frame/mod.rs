use amqp_wire::constants::{
    FRAME_BODY, FRAME_END, FRAME_HEADER, FRAME_HEADER_SIZE, FRAME_HEARTBEAT, FRAME_METHOD,
};
use amqp_wire::types::{AmqpChannelId, LongUint, Octect, ShortUint};
use amqp_wire::{Decoder, Encoder};

use crate::error::{Error, Result};
use crate::method::{decode_method, encode_method, Method, MethodRegistry};

mod protocol_header;
pub use protocol_header::ProtocolHeader;

//////////////////////////////////////////////////////////////////////

#[derive(Debug, PartialEq, Eq, Default)]
pub struct FrameHeader {
    pub frame_type: Octect, // 1: method, 2: content-header, 3: content-body, 8: heartbeat
    pub channel: ShortUint,
    pub payload_size: LongUint,
}

impl FrameHeader {
    fn read(dec: &mut Decoder) -> Result<Self> {
        Ok(Self {
            frame_type: dec.get_octet()?,
            channel: dec.get_short()?,
            payload_size: dec.get_long()?,
        })
    }

    fn write(&self, buf: &mut Vec<u8>) {
        let mut enc = Encoder::new(buf);
        enc.put_octet(self.frame_type);
        enc.put_short(self.channel);
        enc.put_long(self.payload_size);
    }
}

/// One decoded transport unit.
///
/// Content header/body payloads pass through opaque: interpreting them is a
/// separate layer's concern, but they must still be framed off the stream.
#[derive(Debug)]
pub enum Frame {
    Method(Method),
    Heartbeat,
    ContentHeader(Vec<u8>),
    ContentBody(Vec<u8>),
}

impl Frame {
    pub fn frame_type(&self) -> Octect {
        match self {
            Frame::Method(_) => FRAME_METHOD,
            Frame::Heartbeat => FRAME_HEARTBEAT,
            Frame::ContentHeader(_) => FRAME_HEADER,
            Frame::ContentBody(_) => FRAME_BODY,
        }
    }

    /// Decode the first frame in `buf`.
    ///
    /// Returns `Ok(None)` while the buffer does not yet hold a complete
    /// frame, so a reader can accumulate bytes and retry. On success returns
    /// the number of bytes consumed, the channel id and the frame.
    pub fn decode(
        registry: &MethodRegistry,
        buf: &[u8],
    ) -> Result<Option<(usize, AmqpChannelId, Frame)>> {
        if buf.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }
        let FrameHeader {
            frame_type,
            channel,
            payload_size,
        } = FrameHeader::read(&mut Decoder::new(buf))?;

        // full frame is header + payload + terminator octet
        let total_size = FRAME_HEADER_SIZE + payload_size as usize + 1;
        if buf.len() < total_size {
            return Ok(None);
        }
        let terminator = buf[total_size - 1];
        if terminator != FRAME_END {
            return Err(Error::Frame(format!(
                "expected terminator 0x{:02X}, got 0x{:02X}",
                FRAME_END, terminator
            )));
        }

        let payload = &buf[FRAME_HEADER_SIZE..total_size - 1];
        let frame = match frame_type {
            FRAME_METHOD => Frame::Method(decode_method(registry, channel, payload)?),
            FRAME_HEARTBEAT => {
                if !payload.is_empty() {
                    return Err(Error::Frame(format!(
                        "heartbeat with {}-byte payload",
                        payload.len()
                    )));
                }
                Frame::Heartbeat
            }
            FRAME_HEADER => Frame::ContentHeader(payload.to_vec()),
            FRAME_BODY => Frame::ContentBody(payload.to_vec()),
            unknown => return Err(Error::Frame(format!("unknown frame type {}", unknown))),
        };
        Ok(Some((total_size, channel, frame)))
    }

    /// Append the full wire form (header, payload, terminator) to `buf`;
    /// returns the number of bytes written. Method frames carry their own
    /// channel; heartbeats always travel on channel 0.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<usize> {
        let start = buf.len();
        match self {
            Frame::Method(method) => {
                let payload = encode_method(method)?;
                FrameHeader {
                    frame_type: FRAME_METHOD,
                    channel: method.channel(),
                    payload_size: payload.len() as u32,
                }
                .write(buf);
                buf.extend_from_slice(&payload);
                buf.push(FRAME_END);
            }
            Frame::Heartbeat => {
                FrameHeader {
                    frame_type: FRAME_HEARTBEAT,
                    channel: 0,
                    payload_size: 0,
                }
                .write(buf);
                buf.push(FRAME_END);
            }
            Frame::ContentHeader(_) | Frame::ContentBody(_) => {
                return Err(Error::Internal(
                    "content frames are not encoded by this crate".to_string(),
                ));
            }
        }
        Ok(buf.len() - start)
    }
}
