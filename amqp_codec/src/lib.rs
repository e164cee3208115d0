//! AMQP 0-9-1 method-frame codec.
//!
//! Translates between in-memory method values and the exact byte sequences
//! exchanged with a broker: a static definition registry, centralized
//! pack/unpack, and per-channel synchronous-call tracking. Transport I/O,
//! connection negotiation and content frames are the caller's concern.
mod error;
mod frame;
mod method;
mod sync;

pub use error::{Error, Result};
pub use frame::{Frame, FrameHeader, ProtocolHeader};
pub use method::{
    decode_method, encode_method, payload_size, Arg, FieldSpec, FieldType, Method, MethodDef,
    MethodHeader, MethodRegistry,
};
pub use sync::{PendingSynchronousCall, ReceiveOutcome, SyncTracker};
