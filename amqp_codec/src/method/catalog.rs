//! Static method catalog, one entry per protocol method.
//!
//! Declarative data only: pack/unpack for every entry is centralized in
//! `method::codec`. Field lists follow the 0-9-1 method grammar in wire
//! order; an empty `responds` list marks an asynchronous method or a
//! response.
use super::{FieldSpec, FieldType, MethodDef, MethodHeader};

// macro keeps the table readable: one line of identity, responses, fields
macro_rules! catalog {
    ($(
        $name:literal = ($cid:literal, $mid:literal),
            responds [$(($rcid:literal, $rmid:literal)),*],
            fields [$($fname:literal : $ftype:ident),*]
    );+ $(;)?) => {
        pub(super) static DEFS: &[MethodDef] = &[
            $(MethodDef {
                name: $name,
                header: MethodHeader::new($cid, $mid),
                fields: &[$(FieldSpec { name: $fname, ty: FieldType::$ftype }),*],
                responses: &[$(MethodHeader::new($rcid, $rmid)),*],
            }),+
        ];
    };
}

catalog! {
    // == Connection ==
    "connection.start" = (10, 10),
        responds [(10, 11)],
        fields ["version_major": Octet, "version_minor": Octet,
                "server_properties": Table, "mechanisms": LongStr, "locales": LongStr];
    "connection.start-ok" = (10, 11),
        responds [],
        fields ["client_properties": Table, "mechanism": ShortStr,
                "response": LongStr, "locale": ShortStr];
    "connection.secure" = (10, 20),
        responds [(10, 21)],
        fields ["challenge": LongStr];
    "connection.secure-ok" = (10, 21),
        responds [],
        fields ["response": LongStr];
    "connection.tune" = (10, 30),
        responds [(10, 31)],
        fields ["channel_max": Short, "frame_max": Long, "heartbeat": Short];
    "connection.tune-ok" = (10, 31),
        responds [],
        fields ["channel_max": Short, "frame_max": Long, "heartbeat": Short];
    "connection.open" = (10, 40),
        responds [(10, 41)],
        fields ["virtual_host": ShortStr, "reserved_1": ShortStr, "reserved_2": Bit];
    "connection.open-ok" = (10, 41),
        responds [],
        fields ["reserved_1": ShortStr];
    "connection.close" = (10, 50),
        responds [(10, 51)],
        fields ["reply_code": Short, "reply_text": ShortStr,
                "class_id": Short, "method_id": Short];
    "connection.close-ok" = (10, 51),
        responds [],
        fields [];
    "connection.blocked" = (10, 60),
        responds [],
        fields ["reason": ShortStr];
    "connection.unblocked" = (10, 61),
        responds [],
        fields [];

    // == Channel ==
    "channel.open" = (20, 10),
        responds [(20, 11)],
        fields ["reserved_1": ShortStr];
    "channel.open-ok" = (20, 11),
        responds [],
        fields ["reserved_1": LongStr];
    "channel.flow" = (20, 20),
        responds [(20, 21)],
        fields ["active": Bit];
    "channel.flow-ok" = (20, 21),
        responds [],
        fields ["active": Bit];
    "channel.close" = (20, 40),
        responds [(20, 41)],
        fields ["reply_code": Short, "reply_text": ShortStr,
                "class_id": Short, "method_id": Short];
    "channel.close-ok" = (20, 41),
        responds [],
        fields [];

    // == Exchange ==
    "exchange.declare" = (40, 10),
        responds [(40, 11)],
        fields ["reserved_1": Short, "exchange": ShortStr, "type": ShortStr,
                "passive": Bit, "durable": Bit, "auto_delete": Bit,
                "internal": Bit, "no_wait": Bit, "arguments": Table];
    "exchange.declare-ok" = (40, 11),
        responds [],
        fields [];
    "exchange.delete" = (40, 20),
        responds [(40, 21)],
        fields ["reserved_1": Short, "exchange": ShortStr,
                "if_unused": Bit, "no_wait": Bit];
    "exchange.delete-ok" = (40, 21),
        responds [],
        fields [];
    "exchange.bind" = (40, 30),
        responds [(40, 31)],
        fields ["reserved_1": Short, "destination": ShortStr, "source": ShortStr,
                "routing_key": ShortStr, "no_wait": Bit, "arguments": Table];
    "exchange.bind-ok" = (40, 31),
        responds [],
        fields [];
    "exchange.unbind" = (40, 40),
        responds [(40, 51)],
        fields ["reserved_1": Short, "destination": ShortStr, "source": ShortStr,
                "routing_key": ShortStr, "no_wait": Bit, "arguments": Table];
    "exchange.unbind-ok" = (40, 51),
        responds [],
        fields [];

    // == Queue ==
    "queue.declare" = (50, 10),
        responds [(50, 11)],
        fields ["reserved_1": Short, "queue": ShortStr, "passive": Bit,
                "durable": Bit, "exclusive": Bit, "auto_delete": Bit,
                "no_wait": Bit, "arguments": Table];
    "queue.declare-ok" = (50, 11),
        responds [],
        fields ["queue": ShortStr, "message_count": Long, "consumer_count": Long];
    "queue.bind" = (50, 20),
        responds [(50, 21)],
        fields ["reserved_1": Short, "queue": ShortStr, "exchange": ShortStr,
                "routing_key": ShortStr, "no_wait": Bit, "arguments": Table];
    "queue.bind-ok" = (50, 21),
        responds [],
        fields [];
    "queue.purge" = (50, 30),
        responds [(50, 31)],
        fields ["reserved_1": Short, "queue": ShortStr, "no_wait": Bit];
    "queue.purge-ok" = (50, 31),
        responds [],
        fields ["message_count": Long];
    "queue.delete" = (50, 40),
        responds [(50, 41)],
        fields ["reserved_1": Short, "queue": ShortStr, "if_unused": Bit,
                "if_empty": Bit, "no_wait": Bit];
    "queue.delete-ok" = (50, 41),
        responds [],
        fields ["message_count": Long];
    "queue.unbind" = (50, 50),
        responds [(50, 51)],
        fields ["reserved_1": Short, "queue": ShortStr, "exchange": ShortStr,
                "routing_key": ShortStr, "arguments": Table];
    "queue.unbind-ok" = (50, 51),
        responds [],
        fields [];

    // == Basic ==
    "basic.qos" = (60, 10),
        responds [(60, 11)],
        fields ["prefetch_size": Long, "prefetch_count": Short, "global": Bit];
    "basic.qos-ok" = (60, 11),
        responds [],
        fields [];
    "basic.consume" = (60, 20),
        responds [(60, 21)],
        fields ["reserved_1": Short, "queue": ShortStr, "consumer_tag": ShortStr,
                "no_local": Bit, "no_ack": Bit, "exclusive": Bit,
                "no_wait": Bit, "arguments": Table];
    "basic.consume-ok" = (60, 21),
        responds [],
        fields ["consumer_tag": ShortStr];
    "basic.cancel" = (60, 30),
        responds [(60, 31)],
        fields ["consumer_tag": ShortStr, "no_wait": Bit];
    "basic.cancel-ok" = (60, 31),
        responds [],
        fields ["consumer_tag": ShortStr];
    "basic.publish" = (60, 40),
        responds [],
        fields ["reserved_1": Short, "exchange": ShortStr,
                "routing_key": ShortStr, "mandatory": Bit, "immediate": Bit];
    "basic.return" = (60, 50),
        responds [],
        fields ["reply_code": Short, "reply_text": ShortStr,
                "exchange": ShortStr, "routing_key": ShortStr];
    "basic.deliver" = (60, 60),
        responds [],
        fields ["consumer_tag": ShortStr, "delivery_tag": LongLong,
                "redelivered": Bit, "exchange": ShortStr, "routing_key": ShortStr];
    // the one catalog entry with two valid responses
    "basic.get" = (60, 70),
        responds [(60, 71), (60, 72)],
        fields ["reserved_1": Short, "queue": ShortStr, "no_ack": Bit];
    "basic.get-ok" = (60, 71),
        responds [],
        fields ["delivery_tag": LongLong, "redelivered": Bit, "exchange": ShortStr,
                "routing_key": ShortStr, "message_count": Long];
    "basic.get-empty" = (60, 72),
        responds [],
        fields ["reserved_1": ShortStr];
    "basic.ack" = (60, 80),
        responds [],
        fields ["delivery_tag": LongLong, "multiple": Bit];
    "basic.reject" = (60, 90),
        responds [],
        fields ["delivery_tag": LongLong, "requeue": Bit];
    "basic.recover-async" = (60, 100),
        responds [],
        fields ["requeue": Bit];
    "basic.recover" = (60, 110),
        responds [(60, 111)],
        fields ["requeue": Bit];
    "basic.recover-ok" = (60, 111),
        responds [],
        fields [];
    "basic.nack" = (60, 120),
        responds [],
        fields ["delivery_tag": LongLong, "multiple": Bit, "requeue": Bit];

    // == Confirm ==
    "confirm.select" = (85, 10),
        responds [(85, 11)],
        fields ["nowait": Bit];
    "confirm.select-ok" = (85, 11),
        responds [],
        fields [];

    // == Transaction ==
    "tx.select" = (90, 10),
        responds [(90, 11)],
        fields [];
    "tx.select-ok" = (90, 11),
        responds [],
        fields [];
    "tx.commit" = (90, 20),
        responds [(90, 21)],
        fields [];
    "tx.commit-ok" = (90, 21),
        responds [],
        fields [];
    "tx.rollback" = (90, 30),
        responds [(90, 31)],
        fields [];
    "tx.rollback-ok" = (90, 31),
        responds [],
        fields [];
}
