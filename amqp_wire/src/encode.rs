use bytes::BufMut;

use crate::types::{Bit, FieldTable, FieldValue, LongStr, Octect, ShortStr};

/// Cursor-style field packer over any [`BufMut`] target.
///
/// Values are validated at construction time (`ShortStr`, `LongStr` enforce
/// their length prefixes), so packing itself cannot fail.
pub struct Encoder<'a, W: BufMut> {
    out: &'a mut W,
}

impl<'a, W: BufMut> Encoder<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    pub fn put_octet(&mut self, v: Octect) {
        self.out.put_u8(v);
    }

    pub fn put_short(&mut self, v: u16) {
        self.out.put_u16(v);
    }

    pub fn put_long(&mut self, v: u32) {
        self.out.put_u32(v);
    }

    pub fn put_longlong(&mut self, v: u64) {
        self.out.put_u64(v);
    }

    pub fn put_timestamp(&mut self, v: u64) {
        self.out.put_u64(v);
    }

    pub fn put_shortstr(&mut self, v: &ShortStr) {
        self.out.put_u8(v.len() as u8);
        self.out.put(v.as_bytes());
    }

    pub fn put_longstr(&mut self, v: &LongStr) {
        self.out.put_u32(v.len() as u32);
        self.out.put(v.as_bytes());
    }

    /// Pack a maximal run of consecutive bit fields, low bit first.
    /// Every 8 bits start a new octet.
    pub fn put_bits(&mut self, bits: &[Bit]) {
        for chunk in bits.chunks(8) {
            let mut octet = 0u8;
            for (i, bit) in chunk.iter().enumerate() {
                if *bit {
                    octet |= 1 << i;
                }
            }
            self.out.put_u8(octet);
        }
    }

    /// Type-tag octet followed by the value body.
    pub fn put_field_value(&mut self, v: &FieldValue) {
        self.out.put_u8(v.tag());
        match v {
            FieldValue::t(v) => self.out.put_u8(*v as u8),
            FieldValue::b(v) => self.out.put_i8(*v),
            FieldValue::B(v) => self.out.put_u8(*v),
            FieldValue::s(v) => self.out.put_i16(*v),
            FieldValue::u(v) => self.out.put_u16(*v),
            FieldValue::I(v) => self.out.put_i32(*v),
            FieldValue::i(v) => self.out.put_u32(*v),
            FieldValue::l(v) => self.out.put_i64(*v),
            FieldValue::f(v) => self.out.put_f32(*v),
            FieldValue::d(v) => self.out.put_f64(*v),
            FieldValue::D(v) => {
                self.out.put_u8(v.0);
                self.out.put_i32(v.1);
            }
            FieldValue::S(v) => self.put_longstr(v),
            FieldValue::A(arr) => {
                let body: usize = arr.iter().map(field_value_size).sum();
                self.out.put_u32(body as u32);
                for elem in arr.iter() {
                    self.put_field_value(elem);
                }
            }
            FieldValue::T(v) => self.out.put_u64(*v),
            FieldValue::F(table) => self.put_field_table(table),
            FieldValue::V => {}
            FieldValue::x(bytes) => {
                self.out.put_u32(bytes.as_slice().len() as u32);
                self.out.put(bytes.as_slice());
            }
        }
    }

    /// Long-uint body length, then entries in insertion order.
    pub fn put_field_table(&mut self, table: &FieldTable) {
        self.out.put_u32(field_table_body_size(table) as u32);
        for (key, value) in table.iter() {
            self.put_shortstr(key);
            self.put_field_value(value);
        }
    }
}

/////////////////////////////////////////////////////////////////////////////
// Exact encoded sizes, used by the method codec's payload-size invariant.

pub fn shortstr_size(v: &ShortStr) -> usize {
    1 + v.len()
}

pub fn longstr_size(v: &LongStr) -> usize {
    4 + v.len()
}

/// Size of the tagged value: one tag octet plus the body.
pub fn field_value_size(v: &FieldValue) -> usize {
    1 + match v {
        FieldValue::t(_) | FieldValue::b(_) | FieldValue::B(_) => 1,
        FieldValue::s(_) | FieldValue::u(_) => 2,
        FieldValue::I(_) | FieldValue::i(_) | FieldValue::f(_) => 4,
        FieldValue::l(_) | FieldValue::d(_) | FieldValue::T(_) => 8,
        FieldValue::D(_) => 5,
        FieldValue::S(v) => longstr_size(v),
        FieldValue::A(arr) => 4 + arr.iter().map(field_value_size).sum::<usize>(),
        FieldValue::F(table) => field_table_size(table),
        FieldValue::V => 0,
        FieldValue::x(bytes) => 4 + bytes.as_slice().len(),
    }
}

fn field_table_body_size(table: &FieldTable) -> usize {
    table
        .iter()
        .map(|(k, v)| shortstr_size(k) + field_value_size(v))
        .sum()
}

pub fn field_table_size(table: &FieldTable) -> usize {
    4 + field_table_body_size(table)
}

/////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;

    #[test]
    fn test_bit_packing_low_bit_first() {
        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_bits(&[true, false, true]);
        assert_eq!(vec![0b0000_0101], buf);
    }

    #[test]
    fn test_ninth_bit_starts_new_octet() {
        let mut bits = vec![true; 8];
        bits.push(true);
        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_bits(&bits);
        assert_eq!(vec![0xFF, 0x01], buf);
    }

    #[test]
    fn test_shortstr_wire_form() {
        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_shortstr(&"logs".try_into().unwrap());
        assert_eq!(vec![0x04, b'l', b'o', b'g', b's'], buf);
    }

    #[test]
    fn test_table_length_prefix_and_order() {
        let mut table = FieldTable::new();
        table.insert("A".try_into().unwrap(), FieldValue::t(true));
        table.insert("B".try_into().unwrap(), FieldValue::u(9));

        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_field_table(&table);

        let expected = vec![
            0x00, 0x00, 0x00, 9, // body length
            0x01, b'A', b't', 0x01, // A -> true
            0x01, b'B', b'u', 0x00, 0x09, // B -> 9
        ];
        assert_eq!(expected, buf);
        assert_eq!(buf.len(), field_table_size(&table));
    }

    #[test]
    fn test_sizes_match_written_bytes() {
        let mut inner = FieldTable::new();
        inner.insert("k".try_into().unwrap(), FieldValue::S("v".try_into().unwrap()));
        let mut table = FieldTable::new();
        table.insert("nested".try_into().unwrap(), FieldValue::F(inner));
        table.insert(
            "arr".try_into().unwrap(),
            FieldValue::A(vec![FieldValue::V, FieldValue::l(-1)].into()),
        );

        let value = FieldValue::F(table);
        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_field_value(&value);
        assert_eq!(buf.len(), field_value_size(&value));
    }
}
