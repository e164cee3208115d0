use amqp_codec::{
    decode_method, encode_method, payload_size, Arg, FieldType, Method, MethodRegistry,
};
use amqp_wire::types::{FieldTable, FieldValue};

mod common;

/// Boundary value for one field, varied by position so neighbouring fields
/// never share the same value.
fn sample_arg(ty: FieldType, seed: usize) -> Arg {
    let even = seed % 2 == 0;
    match ty {
        FieldType::Octet => Arg::Octet(if even { 0 } else { u8::MAX }),
        FieldType::Short => Arg::Short(if even { 0 } else { u16::MAX }),
        FieldType::Long => Arg::Long(if even { 0 } else { u32::MAX }),
        FieldType::LongLong => Arg::LongLong(if even { 0 } else { u64::MAX }),
        FieldType::ShortStr => {
            let s = if even { String::new() } else { "x".repeat(255) };
            Arg::ShortStr(s.try_into().unwrap())
        }
        FieldType::LongStr => {
            let s = if even { String::new() } else { "y".repeat(300) };
            Arg::LongStr(s.try_into().unwrap())
        }
        FieldType::Bit => Arg::Bit(!even),
        FieldType::Table => Arg::Table(if even { FieldTable::new() } else { nested_table() }),
        FieldType::Timestamp => Arg::Timestamp(if even { 0 } else { 1_600_000_000 }),
    }
}

fn nested_table() -> FieldTable {
    let mut inner = FieldTable::new();
    inner.insert("depth".try_into().unwrap(), FieldValue::u(2));
    let mut table = FieldTable::new();
    table.insert("inner".try_into().unwrap(), FieldValue::F(inner));
    table.insert("flag".try_into().unwrap(), FieldValue::t(true));
    table
}

#[test]
fn test_every_definition_roundtrips() {
    common::setup_logging();
    let registry = MethodRegistry::new();
    assert!(!registry.is_empty());

    for def in registry.iter() {
        for seed in 0..2 {
            let args: Vec<Arg> = def
                .fields()
                .iter()
                .enumerate()
                .map(|(i, field)| sample_arg(field.ty, seed + i))
                .collect();
            let method = Method::new(def, 9, args).unwrap();

            let payload = encode_method(&method).unwrap();
            assert_eq!(
                payload.len(),
                payload_size(&method),
                "size invariant for {}",
                def.name()
            );

            let decoded = decode_method(&registry, 9, &payload).unwrap();
            assert_eq!(def.header(), decoded.header());
            assert_eq!(9, decoded.channel());
            assert_eq!(method.args(), decoded.args(), "roundtrip for {}", def.name());
        }
    }
}

#[test]
fn test_unknown_identity_yields_no_partial_method() {
    common::setup_logging();
    let registry = MethodRegistry::new();

    // leading shorts name a method absent from the catalog; the rest of the
    // payload is a well-formed connection.open body
    let mut payload = vec![0x00, 0x07, 0x00, 0x07];
    payload.extend_from_slice(&[0x01, b'/', 0x00, 0x00]);

    let err = decode_method(&registry, 0, &payload).unwrap_err();
    assert_eq!(503, err.reply_code());
}
