//! AMQP 0-9-1 wire types and the field-level codec.
//!
//! Everything here is value-level: no I/O, no method catalog. The
//! method-frame layer lives in the `amqp_codec` crate.
mod decode;
mod encode;
mod error;
pub mod constants;
pub mod types;
pub use decode::Decoder;
pub use encode::{field_table_size, field_value_size, longstr_size, shortstr_size, Encoder};
pub use error::{Error, Result};
