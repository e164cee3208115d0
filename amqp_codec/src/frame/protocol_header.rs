use crate::error::{Error, Result};
use amqp_wire::types::Octect;

/// 8-byte connection preamble: `b"AMQP"`, a zero protocol id, then the
/// protocol version. Sent once before any frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolHeader {
    id: Octect,
    major: Octect,
    minor: Octect,
    revision: Octect,
}

impl Default for ProtocolHeader {
    fn default() -> Self {
        Self {
            id: 0,
            major: 0,
            minor: 9,
            revision: 1,
        }
    }
}

impl ProtocolHeader {
    pub const SIZE: usize = 8;

    pub fn version(&self) -> (Octect, Octect, Octect) {
        (self.major, self.minor, self.revision)
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        [
            b'A', b'M', b'Q', b'P', self.id, self.major, self.minor, self.revision,
        ]
    }

    pub fn from_bytes(buf: &[u8; Self::SIZE]) -> Result<Self> {
        if &buf[..4] != b"AMQP" {
            return Err(Error::Frame(format!(
                "bad protocol preamble {:02X?}",
                &buf[..4]
            )));
        }
        Ok(Self {
            id: buf[4],
            major: buf[5],
            minor: buf[6],
            revision: buf[7],
        })
    }
}
