use crate::error::{Error, Result};
use crate::itch::messages::{Body, Message, MessageKind, Side};

/// Raw-to-decimal price scale: 32-bit fixed point, 4 implied decimals.
const PRICE_SCALE: f64 = 10_000.0;

/// Cursor decoder over a complete in-memory capture.
///
/// Each record is a one-byte kind tag followed by that kind's fixed body
/// length. An unknown tag or a body running past the end of the buffer is
/// fatal; the caller must not resume past either.
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Decode the next record, or `None` at a clean end of stream.
    pub fn next(&mut self) -> Result<Option<Message>> {
        if self.pos >= self.buf.len() {
            return Ok(None);
        }
        let tag = self.buf[self.pos];
        let kind = MessageKind::from_tag(tag).ok_or(Error::UnknownKind(tag))?;
        let wanted = kind.body_len();
        let have = self.buf.len() - self.pos - 1;
        if have < wanted {
            return Err(Error::Truncated { kind: tag, wanted, have });
        }
        let body = &self.buf[self.pos + 1..self.pos + 1 + wanted];
        self.pos += 1 + wanted;

        let locate = be_uint(&body[0..2]) as u16;
        let tracking = be_uint(&body[2..4]) as u16;
        let timestamp_ns = be_uint(&body[4..10]);
        let body = decode_body(kind, body)?;

        Ok(Some(Message {
            kind,
            locate,
            tracking,
            timestamp_ns,
            body,
        }))
    }
}

fn decode_body(kind: MessageKind, body: &[u8]) -> Result<Body> {
    Ok(match kind {
        MessageKind::StockDirectory => Body::StockDirectory {
            stock: read_symbol(&body[10..18])?,
        },
        MessageKind::AddOrder => Body::AddOrder {
            order_ref: be_uint(&body[10..18]),
            side: read_side(body[18])?,
            shares: be_uint(&body[19..23]) as u32,
            stock: read_symbol(&body[23..31])?,
            price: read_price4(&body[31..35]),
            mpid: None,
        },
        MessageKind::AddOrderMpid => Body::AddOrder {
            order_ref: be_uint(&body[10..18]),
            side: read_side(body[18])?,
            shares: be_uint(&body[19..23]) as u32,
            stock: read_symbol(&body[23..31])?,
            price: read_price4(&body[31..35]),
            mpid: Some(read_text(&body[35..39])?),
        },
        MessageKind::OrderExecuted => Body::OrderExecuted {
            order_ref: be_uint(&body[10..18]),
            shares: be_uint(&body[18..22]) as u32,
            match_no: be_uint(&body[22..30]),
        },
        MessageKind::OrderExecutedWithPrice => Body::OrderExecutedWithPrice {
            order_ref: be_uint(&body[10..18]),
            shares: be_uint(&body[18..22]) as u32,
            match_no: be_uint(&body[22..30]),
            printable: body[30] == b'Y',
            price: read_price4(&body[31..35]),
        },
        MessageKind::OrderCancel => Body::OrderCancel {
            order_ref: be_uint(&body[10..18]),
            shares: be_uint(&body[18..22]) as u32,
        },
        MessageKind::OrderDelete => Body::OrderDelete {
            order_ref: be_uint(&body[10..18]),
        },
        MessageKind::OrderReplace => Body::OrderReplace {
            orig_ref: be_uint(&body[10..18]),
            new_ref: be_uint(&body[18..26]),
            shares: be_uint(&body[26..30]) as u32,
            price: read_price4(&body[30..34]),
        },
        MessageKind::NonCrossTrade => Body::NonCrossTrade {
            order_ref: be_uint(&body[10..18]),
            side: read_side(body[18])?,
            shares: be_uint(&body[19..23]) as u32,
            stock: read_symbol(&body[23..31])?,
            price: read_price4(&body[31..35]),
            match_no: be_uint(&body[35..43]),
        },
        MessageKind::CrossTrade => Body::CrossTrade {
            shares: be_uint(&body[10..18]),
            stock: read_symbol(&body[18..26])?,
            price: read_price4(&body[26..30]),
            match_no: be_uint(&body[30..38]),
            cross_type: body[38],
        },
        MessageKind::BrokenTrade => Body::BrokenTrade {
            match_no: be_uint(&body[10..18]),
        },
        _ => Body::Ignored,
    })
}

/// Big-endian unsigned read of up to 8 bytes, any width (the wire uses 2, 4,
/// 6, and 8 byte integers).
fn be_uint(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

fn read_price4(bytes: &[u8]) -> f64 {
    be_uint(bytes) as f64 / PRICE_SCALE
}

fn read_side(byte: u8) -> Result<Side> {
    Side::from_indicator(byte).ok_or(Error::Corrupt("buy/sell indicator"))
}

fn read_text(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|_| Error::Corrupt("non-ascii text field"))?;
    Ok(text.trim_end_matches(' ').to_string())
}

fn read_symbol(bytes: &[u8]) -> Result<String> {
    read_text(bytes)
}
