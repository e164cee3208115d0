//! AMQP 0-9-1 types for RabbitMQ
//! https://github.com/rabbitmq/rabbitmq-codegen/blob/main/amqp-rabbitmq-0.9.1.json
use std::{borrow::Borrow, fmt, num::TryFromIntError, ops::Deref};

use indexmap::IndexMap;

pub type Bit = bool; // bits are packed in octects on the wire
pub type Octect = u8;
pub type Boolean = bool; // 0 = FALSE, else TRUE
pub type ShortShortUint = u8;
pub type ShortShortInt = i8;
pub type ShortUint = u16;
pub type ShortInt = i16;
pub type LongUint = u32;
pub type LongInt = i32;
pub type LongLongUint = u64;
pub type LongLongInt = i64;
pub type TimeStamp = u64;
pub type Float = f32;
pub type Double = f64;

/////////////////////////////////////////////////////////////////////////////
/// String of at most 255 bytes, length-prefixed with one octet on the wire.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Default)]
pub struct ShortStr(String);

impl fmt::Display for ShortStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.deref())
    }
}
impl From<ShortStr> for String {
    fn from(s: ShortStr) -> Self {
        s.0
    }
}
impl Deref for ShortStr {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl Borrow<str> for ShortStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl ShortStr {
    /// Length already validated by the one-octet wire prefix.
    pub(crate) fn from_wire(s: String) -> Self {
        Self(s)
    }
}

impl TryFrom<String> for ShortStr {
    type Error = TryFromIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        u8::try_from(s.len())?;
        Ok(Self(s))
    }
}
impl TryFrom<&str> for ShortStr {
    type Error = TryFromIntError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.to_string().try_into()
    }
}

/////////////////////////////////////////////////////////////////////////////
/// String length-prefixed with a long-uint on the wire.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Default)]
pub struct LongStr(String);

impl fmt::Display for LongStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.deref())
    }
}
impl Deref for LongStr {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl LongStr {
    /// Length already validated by the long-uint wire prefix.
    pub(crate) fn from_wire(s: String) -> Self {
        Self(s)
    }
}

impl TryFrom<String> for LongStr {
    type Error = TryFromIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        u32::try_from(s.len())?;
        Ok(Self(s))
    }
}
impl TryFrom<&str> for LongStr {
    type Error = TryFromIntError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.to_string().try_into()
    }
}
impl From<LongStr> for String {
    fn from(s: LongStr) -> Self {
        s.0
    }
}

/////////////////////////////////////////////////////////////////////////////
/// According to https://www.rabbitmq.com/amqp-0-9-1-errata.html
/// Decimals encoding: "They are encoded as an octet representing the number of places followed by a long signed integer",
/// but the grammar contradicts that and says: "decimal-value = scale long-uint".
/// We treat the decimal value as signed integer.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct DecimalValue(pub Octect, pub LongInt);

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({}, {})", self.0, self.1)
    }
}

/////////////////////////////////////////////////////////////////////////////
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct ByteArray(Vec<u8>);

impl ByteArray {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}
impl TryFrom<Vec<u8>> for ByteArray {
    type Error = TryFromIntError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        u32::try_from(bytes.len())?;
        Ok(Self(bytes))
    }
}
impl From<ByteArray> for Vec<u8> {
    fn from(arr: ByteArray) -> Self {
        arr.0
    }
}
impl fmt::Display for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/////////////////////////////////////////////////////////////////////////////
/// Sequence of tagged field values, length-prefixed in bytes on the wire.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct FieldArray(Vec<FieldValue>);

impl FieldArray {
    pub fn iter(&self) -> std::slice::Iter<'_, FieldValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<Vec<FieldValue>> for FieldArray {
    fn from(values: Vec<FieldValue>) -> Self {
        Self(values)
    }
}
impl From<FieldArray> for Vec<FieldValue> {
    fn from(arr: FieldArray) -> Self {
        arr.0
    }
}
impl fmt::Display for FieldArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        let mut first = true;
        for v in self.0.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
            first = false;
        }
        write!(f, " ]")
    }
}

/////////////////////////////////////////////////////////////////////////////
// Follow Rabbit definitions below
// Ref: // https://www.rabbitmq.com/amqp-0-9-1-errata.html#section_3
//----------------------------------------------------------------------------
// 0-9   0-9-1   Qpid/Rabbit  Type               Remarks
// ---------------------------------------------------------------------------
//         t       t            Boolean
//         b       b            Signed 8-bit
//         B       B            Unsigned 8-bit
//         U       s            Signed 16-bit      (A1)
//         u       u            Unsigned 16-bit
//   I     I       I            Signed 32-bit
//         i       i            Unsigned 32-bit
//         L       l            Signed 64-bit      (B)
//         l                    Unsigned 64-bit
//         f       f            32-bit float
//         d       d            64-bit float
//   D     D       D            Decimal
//         s                    Short string       (A2)
//   S     S       S            Long string
//         A       A            Array              (C)
//   T     T       T            Timestamp (u64)
//   F     F       F            Nested Table
//   V     V       V            Void
//                 x            Byte array         (D)
#[derive(PartialEq, Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum FieldValue {
    t(Boolean),
    b(ShortShortInt),
    B(ShortShortUint),
    // U(ShortInt),     // not exist in RabbitMQ
    s(ShortInt), // used in RabbitMQ equivalent to 'U' in 0-9-1 spec
    u(ShortUint),
    I(LongInt),
    i(LongUint),
    // L(LongLongInt),  // not exist in RabbitMQ
    l(LongLongInt), // RabbitMQ is signed, 0-9-1 spec is unsigned
    f(Float),
    d(Double),
    D(DecimalValue),
    // s(ShortStr),     // not exist in RabbitMQ
    S(LongStr),
    A(FieldArray),
    T(TimeStamp),
    F(FieldTable),
    V,
    x(ByteArray), // RabbitMQ only
}

impl FieldValue {
    /// One-octet type tag preceding the value on the wire.
    pub fn tag(&self) -> Octect {
        match self {
            FieldValue::t(_) => b't',
            FieldValue::b(_) => b'b',
            FieldValue::B(_) => b'B',
            FieldValue::s(_) => b's',
            FieldValue::u(_) => b'u',
            FieldValue::I(_) => b'I',
            FieldValue::i(_) => b'i',
            FieldValue::l(_) => b'l',
            FieldValue::f(_) => b'f',
            FieldValue::d(_) => b'd',
            FieldValue::D(_) => b'D',
            FieldValue::S(_) => b'S',
            FieldValue::A(_) => b'A',
            FieldValue::T(_) => b'T',
            FieldValue::F(_) => b'F',
            FieldValue::V => b'V',
            FieldValue::x(_) => b'x',
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::t(v)
    }
}
impl TryFrom<FieldValue> for bool {
    type Error = crate::Error;

    fn try_from(v: FieldValue) -> Result<Self, Self::Error> {
        match v {
            FieldValue::t(v) => Ok(v),
            _ => Err(crate::Error::Message("not a bool".to_string())),
        }
    }
}
impl From<FieldTable> for FieldValue {
    fn from(v: FieldTable) -> Self {
        FieldValue::F(v)
    }
}
impl TryFrom<FieldValue> for FieldTable {
    type Error = crate::Error;

    fn try_from(v: FieldValue) -> Result<Self, Self::Error> {
        match v {
            FieldValue::F(v) => Ok(v),
            _ => Err(crate::Error::Message("not a FieldTable".to_string())),
        }
    }
}
impl From<LongStr> for FieldValue {
    fn from(v: LongStr) -> Self {
        FieldValue::S(v)
    }
}
impl TryFrom<FieldValue> for LongStr {
    type Error = crate::Error;

    fn try_from(v: FieldValue) -> Result<Self, Self::Error> {
        match v {
            FieldValue::S(v) => Ok(v),
            _ => Err(crate::Error::Message("not a LongStr".to_string())),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::t(v) => write!(f, "{}", v),
            FieldValue::b(v) => write!(f, "{}", v),
            FieldValue::B(v) => write!(f, "{}", v),
            FieldValue::s(v) => write!(f, "{}", v),
            FieldValue::u(v) => write!(f, "{}", v),
            FieldValue::I(v) => write!(f, "{}", v),
            FieldValue::i(v) => write!(f, "{}", v),
            FieldValue::l(v) => write!(f, "{}", v),
            FieldValue::f(v) => write!(f, "{}", v),
            FieldValue::d(v) => write!(f, "{}", v),
            FieldValue::D(v) => write!(f, "{}", v),
            FieldValue::S(v) => write!(f, "{}", v),
            FieldValue::A(v) => write!(f, "{}", v),
            FieldValue::T(v) => write!(f, "{}", v),
            FieldValue::F(v) => write!(f, "{}", v),
            FieldValue::V => write!(f, "()"),
            FieldValue::x(v) => write!(f, "{}", v),
        }
    }
}

pub type FieldName = ShortStr;

/// Field table preserving insertion order. Order is part of the wire
/// contract: packing then unpacking yields keys in the original order.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct FieldTable(IndexMap<FieldName, FieldValue>);

impl FieldTable {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, k: FieldName, v: FieldValue) -> Option<FieldValue> {
        self.0.insert(k, v)
    }

    pub fn remove(&mut self, k: &str) -> Option<FieldValue> {
        // keep relative order of the remaining entries
        self.0.shift_remove(k)
    }

    pub fn get(&self, k: &str) -> Option<&FieldValue> {
        self.0.get(k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FieldValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldName> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl fmt::Display for FieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        let mut first = true;
        for (k, v) in self.0.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
            first = false;
        }
        write!(f, " }}")
    }
}

/////////////////////////////////////////////////////////////////////////////
// AMQP domains
pub type AmqpChannelId = ShortUint;
pub type AmqpClassId = ShortUint;
pub type AmqpMethodId = ShortUint;

pub type AmqpConsumerTag = ShortStr;
pub type AmqpDeliveryTag = LongLongUint;
pub type AmqpExchangeName = ShortStr;
pub type AmqpMessageCount = LongUint;
pub type AmqpPath = ShortStr;
pub type AmqpPeerProperties = FieldTable;
pub type AmqpQueueName = ShortStr;
pub type AmqpReplyCode = ShortUint;
pub type AmqpReplyText = ShortStr;
pub type AmqpSecurityToken = LongStr;
pub type AmqpTable = FieldTable;
pub type AmqpTimeStamp = TimeStamp;
