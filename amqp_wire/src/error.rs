use std::fmt;

/// Decode-level failures. The method-frame layer maps these onto the
/// protocol reply-code classes.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Ran out of input while reading a fixed-width value.
    Eof,
    /// A declared length exceeds the remaining buffer.
    Truncated { need: usize, have: usize },
    /// Field-table value tag outside the known grammar.
    UnknownTag(u8),
    /// Field-table keys must be non-empty short strings.
    EmptyKey,
    Message(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Eof => f.write_str("unexpected end of input"),
            Error::Truncated { need, have } => {
                write!(f, "declared length {} exceeds remaining {} bytes", need, have)
            }
            Error::UnknownTag(tag) => write!(f, "unknown field-value tag 0x{:02X}", tag),
            Error::EmptyKey => f.write_str("empty field-table key"),
            Error::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}
