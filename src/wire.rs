//! Bit-exact wire encoding for the market-data delta stream.
//!
//! Layout mirrors a packed, little-endian C struct: a fixed 28-byte header followed by a
//! type-specific body, no implicit padding beyond what each layout states explicitly. Every
//! `encode_*` function returns exactly `message_length` bytes.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::types::{InstrumentId, Price, Quantity, Side};

pub const HEADER_LEN: u32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum MessageType {
    Heartbeat = 1,
    PriceLevelUpdate = 2,
    PriceLevelDelete = 3,
    Trade = 4,
    SnapshotBegin = 5,
    SnapshotEntry = 6,
    SnapshotEnd = 7,
    BookClear = 8,
}

impl MessageType {
    pub fn from_u16(v: u16) -> Option<MessageType> {
        Some(match v {
            1 => MessageType::Heartbeat,
            2 => MessageType::PriceLevelUpdate,
            3 => MessageType::PriceLevelDelete,
            4 => MessageType::Trade,
            5 => MessageType::SnapshotBegin,
            6 => MessageType::SnapshotEntry,
            7 => MessageType::SnapshotEnd,
            8 => MessageType::BookClear,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UpdateAction {
    New = 1,
    Change = 2,
    Delete = 3,
}

fn wire_side(side: Side) -> u8 {
    match side {
        Side::Buy => 1,
        Side::Sell => 2,
    }
}

fn side_from_wire(v: u8) -> Side {
    if v == 1 { Side::Buy } else { Side::Sell }
}

/// The common 28-byte header every message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub sequence_number: u64,
    pub message_length: u32,
    pub message_type: u16,
    pub timestamp_ns: u64,
    pub instrument_id: u32,
}

impl MessageHeader {
    fn write(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.sequence_number);
        buf.put_u32_le(self.message_length);
        buf.put_u16_le(self.message_type);
        buf.put_u64_le(self.timestamp_ns);
        buf.put_u32_le(self.instrument_id);
        buf.put_u16_le(0); // padding to 28 bytes
    }

    pub fn read(buf: &mut Bytes) -> Option<MessageHeader> {
        if buf.remaining() < HEADER_LEN as usize {
            return None;
        }
        let sequence_number = buf.get_u64_le();
        let message_length = buf.get_u32_le();
        let message_type = buf.get_u16_le();
        let timestamp_ns = buf.get_u64_le();
        let instrument_id = buf.get_u32_le();
        buf.advance(2); // padding
        Some(MessageHeader {
            sequence_number,
            message_length,
            message_type,
            timestamp_ns,
            instrument_id,
        })
    }
}

fn header(
    seq: u64,
    body_len: u32,
    ty: MessageType,
    timestamp_ns: u64,
    instrument: InstrumentId,
) -> MessageHeader {
    MessageHeader {
        sequence_number: seq,
        message_length: HEADER_LEN + body_len,
        message_type: ty as u16,
        timestamp_ns,
        instrument_id: instrument.0,
    }
}

pub fn encode_heartbeat(seq: u64, timestamp_ns: u64, instrument: InstrumentId) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN as usize);
    header(seq, 0, MessageType::Heartbeat, timestamp_ns, instrument).write(&mut buf);
    buf.freeze()
}

#[allow(clippy::too_many_arguments)]
pub fn encode_price_level_update(
    seq: u64,
    timestamp_ns: u64,
    instrument: InstrumentId,
    price: Price,
    quantity: u64,
    side: Side,
    action: UpdateAction,
) -> Bytes {
    let body_len = 8 + 8 + 1 + 1 + 6;
    let mut buf = BytesMut::with_capacity((HEADER_LEN + body_len) as usize);
    header(
        seq,
        body_len,
        MessageType::PriceLevelUpdate,
        timestamp_ns,
        instrument,
    )
    .write(&mut buf);
    buf.put_u64_le(price.0 as u64);
    buf.put_u64_le(quantity);
    buf.put_u8(wire_side(side));
    buf.put_u8(action as u8);
    buf.put_bytes(0, 6);
    buf.freeze()
}

pub fn encode_price_level_delete(
    seq: u64,
    timestamp_ns: u64,
    instrument: InstrumentId,
    price: Price,
    side: Side,
) -> Bytes {
    let body_len = 8 + 1 + 7;
    let mut buf = BytesMut::with_capacity((HEADER_LEN + body_len) as usize);
    header(
        seq,
        body_len,
        MessageType::PriceLevelDelete,
        timestamp_ns,
        instrument,
    )
    .write(&mut buf);
    buf.put_u64_le(price.0 as u64);
    buf.put_u8(wire_side(side));
    buf.put_bytes(0, 7);
    buf.freeze()
}

#[allow(clippy::too_many_arguments)]
pub fn encode_trade(
    seq: u64,
    timestamp_ns: u64,
    instrument: InstrumentId,
    trade_id: u64,
    price: Price,
    quantity: Quantity,
    aggressor_side: Side,
) -> Bytes {
    let body_len = 8 + 8 + 8 + 1 + 7;
    let mut buf = BytesMut::with_capacity((HEADER_LEN + body_len) as usize);
    header(seq, body_len, MessageType::Trade, timestamp_ns, instrument).write(&mut buf);
    buf.put_u64_le(trade_id);
    buf.put_u64_le(price.0 as u64);
    buf.put_u64_le(quantity.0 as u64);
    buf.put_u8(wire_side(aggressor_side));
    buf.put_bytes(0, 7);
    buf.freeze()
}

pub fn encode_snapshot_begin(
    seq: u64,
    timestamp_ns: u64,
    instrument: InstrumentId,
    total_entries: u32,
) -> Bytes {
    let body_len = 4 + 4;
    let mut buf = BytesMut::with_capacity((HEADER_LEN + body_len) as usize);
    header(
        seq,
        body_len,
        MessageType::SnapshotBegin,
        timestamp_ns,
        instrument,
    )
    .write(&mut buf);
    buf.put_u32_le(total_entries);
    buf.put_bytes(0, 4);
    buf.freeze()
}

/// Encodes a single snapshot entry body (without its header) — used both to build the
/// on-wire message and to feed the running SNAPSHOT_END checksum in emission order.
pub fn encode_snapshot_entry_body(price: Price, quantity: u64, side: Side) -> [u8; 17] {
    let mut body = [0u8; 17];
    body[0..8].copy_from_slice(&(price.0 as u64).to_le_bytes());
    body[8..16].copy_from_slice(&quantity.to_le_bytes());
    body[16] = wire_side(side);
    body
}

pub fn encode_snapshot_entry(
    seq: u64,
    timestamp_ns: u64,
    instrument: InstrumentId,
    price: Price,
    quantity: u64,
    side: Side,
) -> Bytes {
    let body = encode_snapshot_entry_body(price, quantity, side);
    let body_len = body.len() as u32 + 7; // 17 used bytes + 7 reserved = 24
    let mut buf = BytesMut::with_capacity((HEADER_LEN + body_len) as usize);
    header(
        seq,
        body_len,
        MessageType::SnapshotEntry,
        timestamp_ns,
        instrument,
    )
    .write(&mut buf);
    buf.put_slice(&body);
    buf.put_bytes(0, 7);
    buf.freeze()
}

pub fn encode_snapshot_end(
    seq: u64,
    timestamp_ns: u64,
    instrument: InstrumentId,
    checksum: u32,
) -> Bytes {
    let body_len = 4 + 4;
    let mut buf = BytesMut::with_capacity((HEADER_LEN + body_len) as usize);
    header(
        seq,
        body_len,
        MessageType::SnapshotEnd,
        timestamp_ns,
        instrument,
    )
    .write(&mut buf);
    buf.put_u32_le(checksum);
    buf.put_bytes(0, 4);
    buf.freeze()
}

pub fn encode_book_clear(
    seq: u64,
    timestamp_ns: u64,
    instrument: InstrumentId,
    reason_code: u32,
) -> Bytes {
    let body_len = 4 + 4;
    let mut buf = BytesMut::with_capacity((HEADER_LEN + body_len) as usize);
    header(
        seq,
        body_len,
        MessageType::BookClear,
        timestamp_ns,
        instrument,
    )
    .write(&mut buf);
    buf.put_u32_le(reason_code);
    buf.put_bytes(0, 4);
    buf.freeze()
}

/// Decoded price-level-update body, for tests and downstream replay tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevelUpdateBody {
    pub price: u64,
    pub quantity: u64,
    pub side: Side,
    pub action: u8,
}

pub fn decode_price_level_update(mut buf: Bytes) -> Option<(MessageHeader, PriceLevelUpdateBody)> {
    let hdr = MessageHeader::read(&mut buf)?;
    if buf.remaining() < 16 {
        return None;
    }
    let price = buf.get_u64_le();
    let quantity = buf.get_u64_le();
    let side = side_from_wire(buf.get_u8());
    let action = buf.get_u8();
    Some((
        hdr,
        PriceLevelUpdateBody {
            price,
            quantity,
            side,
            action,
        },
    ))
}
