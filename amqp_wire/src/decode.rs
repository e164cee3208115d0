use crate::error::{Error, Result};
use crate::types::{
    Bit, ByteArray, DecimalValue, FieldArray, FieldTable, FieldValue, LongStr, Octect, ShortStr,
    TimeStamp,
};

/// Cursor-style field unpacker over a borrowed buffer.
///
/// Never reads past the end of the input: a declared length larger than the
/// remaining bytes surfaces as [`Error::Truncated`].
pub struct Decoder<'a> {
    input: &'a [u8],
    cursor: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Decoder { input, cursor: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.input.len() < n {
            return Err(Error::Truncated {
                need: n,
                have: self.input.len(),
            });
        }
        let (head, tail) = self.input.split_at(n);
        self.input = tail;
        self.cursor += n;
        Ok(head)
    }

    fn take_fixed(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n).map_err(|_| Error::Eof)
    }

    pub fn get_octet(&mut self) -> Result<Octect> {
        Ok(self.take_fixed(1)?[0])
    }

    pub fn get_bool(&mut self) -> Result<bool> {
        Ok(self.get_octet()? > 0)
    }

    pub fn get_short(&mut self) -> Result<u16> {
        let b = self.take_fixed(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn get_long(&mut self) -> Result<u32> {
        let b = self.take_fixed(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn get_longlong(&mut self) -> Result<u64> {
        let b = self.take_fixed(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn get_timestamp(&mut self) -> Result<TimeStamp> {
        self.get_longlong()
    }

    fn get_i8(&mut self) -> Result<i8> {
        Ok(self.take_fixed(1)?[0] as i8)
    }

    fn get_i16(&mut self) -> Result<i16> {
        let b = self.take_fixed(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    fn get_i32(&mut self) -> Result<i32> {
        let b = self.take_fixed(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn get_i64(&mut self) -> Result<i64> {
        let b = self.take_fixed(8)?;
        Ok(i64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn get_f32(&mut self) -> Result<f32> {
        let b = self.take_fixed(4)?;
        Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn get_f64(&mut self) -> Result<f64> {
        let b = self.take_fixed(8)?;
        Ok(f64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn get_str(&mut self, len: usize) -> Result<String> {
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| Error::Message(format!("len = {}, content = {:02X?}", len, bytes)))
    }

    pub fn get_shortstr(&mut self) -> Result<ShortStr> {
        let len = self.get_octet()? as usize;
        Ok(ShortStr::from_wire(self.get_str(len)?))
    }

    pub fn get_longstr(&mut self) -> Result<LongStr> {
        let len = self.get_long()? as usize;
        Ok(LongStr::from_wire(self.get_str(len)?))
    }

    /// Unpack a maximal run of `n` consecutive bit fields, low bit first.
    pub fn get_bits(&mut self, n: usize) -> Result<Vec<Bit>> {
        let octets = self.take_fixed((n + 7) / 8)?;
        Ok((0..n).map(|i| octets[i / 8] >> (i % 8) & 1 == 1).collect())
    }

    pub fn get_field_value(&mut self) -> Result<FieldValue> {
        let tag = self.get_octet()?;
        let value = match tag {
            b't' => FieldValue::t(self.get_bool()?),
            b'b' => FieldValue::b(self.get_i8()?),
            b'B' => FieldValue::B(self.get_octet()?),
            b's' => FieldValue::s(self.get_i16()?),
            b'u' => FieldValue::u(self.get_short()?),
            b'I' => FieldValue::I(self.get_i32()?),
            b'i' => FieldValue::i(self.get_long()?),
            b'l' => FieldValue::l(self.get_i64()?),
            b'f' => FieldValue::f(self.get_f32()?),
            b'd' => FieldValue::d(self.get_f64()?),
            b'D' => FieldValue::D(DecimalValue(self.get_octet()?, self.get_i32()?)),
            b'S' => FieldValue::S(self.get_longstr()?),
            b'A' => FieldValue::A(self.get_field_array()?),
            b'T' => FieldValue::T(self.get_timestamp()?),
            b'F' => FieldValue::F(self.get_field_table()?),
            b'V' => FieldValue::V,
            b'x' => {
                let len = self.get_long()? as usize;
                let bytes = self.take(len)?;
                FieldValue::x(ByteArray::try_from(bytes.to_vec()).expect("length fits long-uint"))
            }
            _ => return Err(Error::UnknownTag(tag)),
        };
        Ok(value)
    }

    fn get_field_array(&mut self) -> Result<FieldArray> {
        let body_len = self.get_long()? as usize;
        let mut body = Decoder::new(self.take(body_len)?);
        let mut values = Vec::new();
        while !body.is_empty() {
            values.push(body.get_field_value()?);
        }
        Ok(values.into())
    }

    /// Entries are rebuilt until the declared body length is consumed; an
    /// entry straddling the boundary is a decode error, never an early stop.
    pub fn get_field_table(&mut self) -> Result<FieldTable> {
        let body_len = self.get_long()? as usize;
        let mut body = Decoder::new(self.take(body_len)?);
        let mut table = FieldTable::new();
        while !body.is_empty() {
            let key = body.get_shortstr()?;
            if key.is_empty() {
                return Err(Error::EmptyKey);
            }
            let value = body.get_field_value()?;
            table.insert(key, value);
        }
        Ok(table)
    }
}

/////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoder;
    use crate::error::Error;

    #[test]
    fn test_bits_roundtrip() {
        let bits = vec![true, false, true];
        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_bits(&bits);
        assert_eq!(bits, Decoder::new(&buf).get_bits(3).unwrap());
    }

    #[test]
    fn test_shortstr_boundaries() {
        for s in [String::new(), "x".repeat(255)] {
            let v: ShortStr = s.try_into().unwrap();
            let mut buf = Vec::new();
            Encoder::new(&mut buf).put_shortstr(&v);
            assert_eq!(v, Decoder::new(&buf).get_shortstr().unwrap());
        }
    }

    #[test]
    fn test_truncated_shortstr() {
        // declared length 4, only 2 bytes follow
        let err = Decoder::new(&[0x04, b'l', b'o']).get_shortstr().unwrap_err();
        assert_eq!(Error::Truncated { need: 4, have: 2 }, err);
    }

    #[test]
    fn test_truncated_longstr_never_reads_past_end() {
        let buf = [0xFF, 0xFF, 0xFF, 0xFF, b'x'];
        let err = Decoder::new(&buf).get_longstr().unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }

    #[test]
    fn test_integer_extremes_roundtrip() {
        let mut buf = Vec::new();
        let mut enc = Encoder::new(&mut buf);
        enc.put_octet(u8::MAX);
        enc.put_short(u16::MAX);
        enc.put_long(u32::MAX);
        enc.put_longlong(u64::MAX);
        enc.put_octet(0);
        enc.put_short(0);
        enc.put_long(0);
        enc.put_longlong(0);

        let mut dec = Decoder::new(&buf);
        assert_eq!(u8::MAX, dec.get_octet().unwrap());
        assert_eq!(u16::MAX, dec.get_short().unwrap());
        assert_eq!(u32::MAX, dec.get_long().unwrap());
        assert_eq!(u64::MAX, dec.get_longlong().unwrap());
        assert_eq!(0, dec.get_octet().unwrap());
        assert_eq!(0, dec.get_short().unwrap());
        assert_eq!(0, dec.get_long().unwrap());
        assert_eq!(0, dec.get_longlong().unwrap());
        assert!(dec.is_empty());
    }

    #[test]
    fn test_table_roundtrip_keeps_order() {
        let mut table = FieldTable::new();
        table.insert("z".try_into().unwrap(), FieldValue::t(true));
        table.insert("a".try_into().unwrap(), FieldValue::I(-7));
        table.insert("m".try_into().unwrap(), FieldValue::S("mid".try_into().unwrap()));

        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_field_table(&table);

        let decoded = Decoder::new(&buf).get_field_table().unwrap();
        assert_eq!(table, decoded);
        let keys: Vec<&str> = decoded.keys().map(|k| k.as_str()).collect();
        assert_eq!(vec!["z", "a", "m"], keys);
    }

    #[test]
    fn test_nested_table_roundtrip() {
        let mut inner = FieldTable::new();
        inner.insert("depth".try_into().unwrap(), FieldValue::u(2));
        let mut mid = FieldTable::new();
        mid.insert("inner".try_into().unwrap(), FieldValue::F(inner));
        let mut outer = FieldTable::new();
        outer.insert("mid".try_into().unwrap(), FieldValue::F(mid));
        outer.insert("flag".try_into().unwrap(), FieldValue::t(false));

        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_field_table(&outer);
        assert_eq!(outer, Decoder::new(&buf).get_field_table().unwrap());
    }

    #[test]
    fn test_empty_table() {
        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_field_table(&FieldTable::new());
        assert_eq!(vec![0, 0, 0, 0], buf);
        let decoded = Decoder::new(&buf).get_field_table().unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_corrupt_table_length_is_an_error() {
        let mut table = FieldTable::new();
        table.insert("key".try_into().unwrap(), FieldValue::u(1));
        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_field_table(&table);

        // shrink the declared body length so the last entry straddles it
        buf[3] -= 1;
        assert!(Decoder::new(&buf).get_field_table().is_err());
    }

    #[test]
    fn test_empty_table_key_rejected() {
        let buf = [0x00, 0x00, 0x00, 0x02, 0x00, b'V'];
        assert_eq!(
            Error::EmptyKey,
            Decoder::new(&buf).get_field_table().unwrap_err()
        );
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let buf = [0x00, 0x00, 0x00, 0x04, 0x01, b'k', b'Z', 0x00];
        assert_eq!(
            Error::UnknownTag(b'Z'),
            Decoder::new(&buf).get_field_table().unwrap_err()
        );
    }

    #[test]
    fn test_full_value_grammar_roundtrip() {
        let mut table = FieldTable::new();
        table.insert("t".try_into().unwrap(), FieldValue::t(true));
        table.insert("b".try_into().unwrap(), FieldValue::b(i8::MIN));
        table.insert("B".try_into().unwrap(), FieldValue::B(u8::MAX));
        table.insert("s".try_into().unwrap(), FieldValue::s(i16::MIN));
        table.insert("u".try_into().unwrap(), FieldValue::u(u16::MAX));
        table.insert("I".try_into().unwrap(), FieldValue::I(i32::MIN));
        table.insert("i".try_into().unwrap(), FieldValue::i(u32::MAX));
        table.insert("l".try_into().unwrap(), FieldValue::l(i64::MIN));
        table.insert("f".try_into().unwrap(), FieldValue::f(1.5));
        table.insert("d".try_into().unwrap(), FieldValue::d(-2.25));
        table.insert("D".try_into().unwrap(), FieldValue::D(DecimalValue(2, -100)));
        table.insert("S".try_into().unwrap(), FieldValue::S("long".try_into().unwrap()));
        table.insert(
            "A".try_into().unwrap(),
            FieldValue::A(vec![FieldValue::u(1), FieldValue::V].into()),
        );
        table.insert("T".try_into().unwrap(), FieldValue::T(1_600_000_000));
        table.insert("F".try_into().unwrap(), FieldValue::F(FieldTable::new()));
        table.insert("V".try_into().unwrap(), FieldValue::V);
        table.insert(
            "x".try_into().unwrap(),
            FieldValue::x(vec![0xDE, 0xAD].try_into().unwrap()),
        );

        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_field_table(&table);
        assert_eq!(table, Decoder::new(&buf).get_field_table().unwrap());
    }
}
