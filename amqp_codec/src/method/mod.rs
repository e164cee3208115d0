use std::fmt;

use amqp_wire::types::{
    AmqpChannelId, FieldTable, LongLongUint, LongStr, LongUint, Octect, ShortStr, ShortUint,
    TimeStamp,
};

use crate::error::{Error, Result};

mod catalog;
mod codec;
mod registry;

pub use codec::{decode_method, encode_method, payload_size};
pub use registry::MethodRegistry;

//////////////////////////////////////////////////////////
/// (class-id, method-id) pair identifying one protocol method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodHeader {
    class_id: ShortUint,
    method_id: ShortUint,
}

impl MethodHeader {
    pub const fn new(class_id: ShortUint, method_id: ShortUint) -> Self {
        Self {
            class_id,
            method_id,
        }
    }

    pub fn class_id(&self) -> ShortUint {
        self.class_id
    }

    pub fn method_id(&self) -> ShortUint {
        self.method_id
    }
}

impl fmt::Display for MethodHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.class_id, self.method_id)
    }
}

//////////////////////////////////////////////////////////
/// Wire type of one declared method field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Octet,
    Short,
    Long,
    LongLong,
    ShortStr,
    LongStr,
    Bit,
    Table,
    Timestamp,
}

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

//////////////////////////////////////////////////////////
/// One immutable catalog entry: identity, declared fields in wire order and
/// the closed set of valid responses (empty for asynchronous methods and
/// for responses themselves).
#[derive(Debug)]
pub struct MethodDef {
    name: &'static str,
    header: MethodHeader,
    fields: &'static [FieldSpec],
    responses: &'static [MethodHeader],
}

impl MethodDef {
    /// Protocol name, e.g. `"exchange.delete"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn header(&self) -> &MethodHeader {
        &self.header
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// A synchronous method awaits one of `responses()` before another
    /// synchronous method may be sent on the same channel.
    pub fn synchronous(&self) -> bool {
        !self.responses.is_empty()
    }

    pub fn responses(&self) -> &'static [MethodHeader] {
        self.responses
    }

    pub fn accepts_response(&self, header: &MethodHeader) -> bool {
        self.responses.contains(header)
    }
}

//////////////////////////////////////////////////////////
/// Concrete value for one declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Octet(Octect),
    Short(ShortUint),
    Long(LongUint),
    LongLong(LongLongUint),
    ShortStr(ShortStr),
    LongStr(LongStr),
    Bit(bool),
    Table(FieldTable),
    Timestamp(TimeStamp),
}

impl Arg {
    pub fn field_type(&self) -> FieldType {
        match self {
            Arg::Octet(_) => FieldType::Octet,
            Arg::Short(_) => FieldType::Short,
            Arg::Long(_) => FieldType::Long,
            Arg::LongLong(_) => FieldType::LongLong,
            Arg::ShortStr(_) => FieldType::ShortStr,
            Arg::LongStr(_) => FieldType::LongStr,
            Arg::Bit(_) => FieldType::Bit,
            Arg::Table(_) => FieldType::Table,
            Arg::Timestamp(_) => FieldType::Timestamp,
        }
    }

    pub fn as_bit(&self) -> Option<bool> {
        match self {
            Arg::Bit(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<ShortUint> {
        match self {
            Arg::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_shortstr(&self) -> Option<&ShortStr> {
        match self {
            Arg::ShortStr(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&FieldTable> {
        match self {
            Arg::Table(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bit(v)
    }
}
impl From<u8> for Arg {
    fn from(v: u8) -> Self {
        Arg::Octet(v)
    }
}
impl From<u16> for Arg {
    fn from(v: u16) -> Self {
        Arg::Short(v)
    }
}
impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        Arg::Long(v)
    }
}
impl From<u64> for Arg {
    fn from(v: u64) -> Self {
        Arg::LongLong(v)
    }
}
impl From<ShortStr> for Arg {
    fn from(v: ShortStr) -> Self {
        Arg::ShortStr(v)
    }
}
impl From<LongStr> for Arg {
    fn from(v: LongStr) -> Self {
        Arg::LongStr(v)
    }
}
impl From<FieldTable> for Arg {
    fn from(v: FieldTable) -> Self {
        Arg::Table(v)
    }
}

//////////////////////////////////////////////////////////
/// One method call value: a catalog entry plus a concrete argument per
/// declared field, bound to its owning channel. Immutable once built.
#[derive(Debug)]
pub struct Method {
    def: &'static MethodDef,
    channel: AmqpChannelId,
    args: Vec<Arg>,
}

impl Method {
    /// Arguments are checked against the declared field list up front, so a
    /// constructed `Method` always packs cleanly.
    pub fn new(def: &'static MethodDef, channel: AmqpChannelId, args: Vec<Arg>) -> Result<Self> {
        if args.len() != def.fields().len() {
            return Err(Error::Internal(format!(
                "{} declares {} fields, got {} arguments",
                def.name(),
                def.fields().len(),
                args.len()
            )));
        }
        for (spec, arg) in def.fields().iter().zip(args.iter()) {
            if spec.ty != arg.field_type() {
                return Err(Error::Internal(format!(
                    "{} field '{}' is {:?}, got {:?}",
                    def.name(),
                    spec.name,
                    spec.ty,
                    arg.field_type()
                )));
            }
        }
        Ok(Self { def, channel, args })
    }

    pub fn def(&self) -> &'static MethodDef {
        self.def
    }

    pub fn header(&self) -> &MethodHeader {
        self.def.header()
    }

    pub fn channel(&self) -> AmqpChannelId {
        self.channel
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Argument by declared field name.
    pub fn arg(&self, name: &str) -> Option<&Arg> {
        self.def
            .fields()
            .iter()
            .position(|f| f.name == name)
            .map(|i| &self.args[i])
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on channel {}", self.def.name(), self.channel)
    }
}
