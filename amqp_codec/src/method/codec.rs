//! Centralized pack/unpack for every catalog entry.
//!
//! A method payload is the two class/method-id shorts followed by the
//! declared fields. Runs of consecutive bit fields share octets, low bit
//! first; a non-bit field terminates the run and a ninth bit starts a new
//! octet.
use amqp_wire::types::AmqpChannelId;
use amqp_wire::{field_table_size, longstr_size, shortstr_size, Decoder, Encoder};

use super::{Arg, FieldType, Method, MethodRegistry};
use crate::error::{Error, Result};

/// Exact number of bytes [`encode_method`] will produce, including the
/// 4-byte class/method-id prefix.
pub fn payload_size(method: &Method) -> usize {
    let mut size = 4;
    let mut bit_run = 0usize;
    for arg in method.args() {
        if let Arg::Bit(_) = arg {
            bit_run += 1;
            continue;
        }
        size += (bit_run + 7) / 8;
        bit_run = 0;
        size += match arg {
            Arg::Octet(_) => 1,
            Arg::Short(_) => 2,
            Arg::Long(_) => 4,
            Arg::LongLong(_) | Arg::Timestamp(_) => 8,
            Arg::ShortStr(v) => shortstr_size(v),
            Arg::LongStr(v) => longstr_size(v),
            Arg::Table(v) => field_table_size(v),
            Arg::Bit(_) => unreachable!("bit handled above"),
        };
    }
    size + (bit_run + 7) / 8
}

/// Pack a method into its frame payload.
pub fn encode_method(method: &Method) -> Result<Vec<u8>> {
    let size = payload_size(method);
    let mut buf = Vec::with_capacity(size);
    let mut enc = Encoder::new(&mut buf);
    enc.put_short(method.header().class_id());
    enc.put_short(method.header().method_id());

    let mut bit_run = Vec::new();
    for arg in method.args() {
        if let Arg::Bit(bit) = arg {
            bit_run.push(*bit);
            continue;
        }
        if !bit_run.is_empty() {
            enc.put_bits(&bit_run);
            bit_run.clear();
        }
        match arg {
            Arg::Octet(v) => enc.put_octet(*v),
            Arg::Short(v) => enc.put_short(*v),
            Arg::Long(v) => enc.put_long(*v),
            Arg::LongLong(v) => enc.put_longlong(*v),
            Arg::ShortStr(v) => enc.put_shortstr(v),
            Arg::LongStr(v) => enc.put_longstr(v),
            Arg::Table(v) => enc.put_field_table(v),
            Arg::Timestamp(v) => enc.put_timestamp(*v),
            Arg::Bit(_) => unreachable!("bit handled above"),
        }
    }
    if !bit_run.is_empty() {
        enc.put_bits(&bit_run);
    }

    // the size invariant is load-bearing: the frame header's payload-size
    // field is derived from it
    debug_assert_eq!(size, buf.len(), "payload size invariant for {}", method);
    if buf.len() != size {
        return Err(Error::Internal(format!(
            "{}: computed payload size {}, wrote {} bytes",
            method,
            size,
            buf.len()
        )));
    }
    Ok(buf)
}

/// Unpack a frame payload already isolated by the frame header into a
/// [`Method`] bound to the frame's channel.
pub fn decode_method(
    registry: &MethodRegistry,
    channel: AmqpChannelId,
    payload: &[u8],
) -> Result<Method> {
    let mut dec = Decoder::new(payload);
    let class_id = dec.get_short()?;
    let method_id = dec.get_short()?;
    let def = registry.lookup(class_id, method_id)?;

    let fields = def.fields();
    let mut args = Vec::with_capacity(fields.len());
    let mut i = 0;
    while i < fields.len() {
        if fields[i].ty == FieldType::Bit {
            let run = fields[i..]
                .iter()
                .take_while(|f| f.ty == FieldType::Bit)
                .count();
            args.extend(dec.get_bits(run)?.into_iter().map(Arg::Bit));
            i += run;
            continue;
        }
        args.push(match fields[i].ty {
            FieldType::Octet => Arg::Octet(dec.get_octet()?),
            FieldType::Short => Arg::Short(dec.get_short()?),
            FieldType::Long => Arg::Long(dec.get_long()?),
            FieldType::LongLong => Arg::LongLong(dec.get_longlong()?),
            FieldType::ShortStr => Arg::ShortStr(dec.get_shortstr()?),
            FieldType::LongStr => Arg::LongStr(dec.get_longstr()?),
            FieldType::Table => Arg::Table(dec.get_field_table()?),
            FieldType::Timestamp => Arg::Timestamp(dec.get_timestamp()?),
            FieldType::Bit => unreachable!("bit handled above"),
        });
        i += 1;
    }
    if !dec.is_empty() {
        return Err(Error::Syntax(format!(
            "{} trailing bytes after {}",
            dec.remaining(),
            def.name()
        )));
    }
    Method::new(def, channel, args)
}
