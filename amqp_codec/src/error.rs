use std::fmt;

use amqp_wire::constants::{
    COMMAND_INVALID, FRAME_ERROR, INTERNAL_ERROR, SYNTAX_ERROR, UNEXPECTED_FRAME,
};
use amqp_wire::types::{AmqpClassId, AmqpMethodId, AmqpReplyCode};

/// Protocol-level failures, each tied to the reply-code class a peer would
/// report before tearing the connection down. None of these are recoverable
/// at this layer.
#[derive(Debug)]
pub enum Error {
    /// Malformed frame: bad terminator or unknown frame type.
    Frame(String),
    /// Payload bytes that do not parse as the declared field list.
    Syntax(String),
    /// (class-id, method-id) absent from the registry.
    UnknownMethod {
        class_id: AmqpClassId,
        method_id: AmqpMethodId,
    },
    /// Violation of the one-outstanding-synchronous-call-per-channel rule.
    SyncViolation(String),
    /// Invariant breakage inside the codec itself, or misuse of its API.
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn reply_code(&self) -> AmqpReplyCode {
        match self {
            Error::Frame(_) => FRAME_ERROR,
            Error::Syntax(_) => SYNTAX_ERROR,
            Error::UnknownMethod { .. } => COMMAND_INVALID,
            Error::SyncViolation(_) => UNEXPECTED_FRAME,
            Error::Internal(_) => INTERNAL_ERROR,
        }
    }
}

impl From<amqp_wire::Error> for Error {
    fn from(err: amqp_wire::Error) -> Self {
        Error::Syntax(err.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Frame(msg) => write!(f, "frame error: {}", msg),
            Error::Syntax(msg) => write!(f, "syntax error: {}", msg),
            Error::UnknownMethod {
                class_id,
                method_id,
            } => write!(f, "unknown method ({}, {})", class_id, method_id),
            Error::SyncViolation(msg) => write!(f, "synchronization violation: {}", msg),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
