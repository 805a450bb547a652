//! Compact binary codec for slice tables.
//!
//! Layout: one count byte, then per entry (in table iteration order):
//!
//! ```text
//! u8   key length            (0..=255)
//! [u8] key bytes             (UTF-8)
//! u8   bounds.x
//! u8   bounds.y
//! u16  packed, little-endian:
//!        bits 0..=4   bounds.w
//!        bits 5..=10  bounds.h
//!        bit  14      pivot byte follows
//!        bit  15      center byte follows
//! u8?  center: left 0..=1, top 2..=3, width 4..=5, height 6..=7 (2 bits each)
//! u8?  pivot:  |x| 0..=2, |y| 3..=5, bit 6 = y negative, bit 7 = x negative
//! ```
//!
//! Out-of-range fields are masked down to their bit width on encode. That
//! silent truncation is the persisted-state contract: existing table files
//! were written this way, and decoders rely on it bit-for-bit. It is not
//! validated, logged, or reported.

use crate::error::{Result, SliceKitError};
use crate::model::{Point, Rect, Slice};
use crate::table::SliceTable;

/// Maximum entries a table may hold and still fit the one-byte count.
pub const MAX_TABLE_LEN: usize = 255;
/// Maximum encoded key length in UTF-8 bytes.
pub const MAX_KEY_LEN: usize = 255;

const BOUNDS_W_MASK: u16 = 0x1F;
const BOUNDS_H_MASK: u16 = 0x3F;
const BOUNDS_H_SHIFT: u16 = 5;
const FLAG_PIVOT: u16 = 0x4000;
const FLAG_CENTER: u16 = 0x8000;

const CENTER_MASK: u8 = 0x3;
const CENTER_TOP_SHIFT: u8 = 2;
const CENTER_W_SHIFT: u8 = 4;
const CENTER_H_SHIFT: u8 = 6;

const PIVOT_MAG_MASK: u8 = 0x7;
const PIVOT_Y_SHIFT: u8 = 3;
const PIVOT_Y_NEG: u8 = 0x40;
const PIVOT_X_NEG: u8 = 0x80;

/// Encodes `table` into the compact byte layout.
///
/// Fails with [`SliceKitError::CapacityExceeded`] above 255 entries and
/// [`SliceKitError::KeyTooLong`] for names over 255 UTF-8 bytes. Numeric
/// fields are never validated; the masks above silently truncate them.
pub fn encode_table(table: &SliceTable) -> Result<Vec<u8>> {
    let count = table.len();
    if count > MAX_TABLE_LEN {
        return Err(SliceKitError::CapacityExceeded { count });
    }
    let mut out = Vec::with_capacity(1 + count * 16);
    out.push(count as u8);
    for (key, slice) in table.iter() {
        let utf8 = key.as_bytes();
        if utf8.len() > MAX_KEY_LEN {
            return Err(SliceKitError::KeyTooLong {
                key: key.clone(),
                len: utf8.len(),
            });
        }
        out.push(utf8.len() as u8);
        out.extend_from_slice(utf8);
        out.push(slice.bounds.x as u8);
        out.push(slice.bounds.y as u8);

        let has_center = slice.is_nine_patch();
        let has_pivot = slice.pivot != Point::ZERO;
        let mut packed = (slice.bounds.w as u16 & BOUNDS_W_MASK)
            | ((slice.bounds.h as u16 & BOUNDS_H_MASK) << BOUNDS_H_SHIFT);
        if has_pivot {
            packed |= FLAG_PIVOT;
        }
        if has_center {
            packed |= FLAG_CENTER;
        }
        out.extend_from_slice(&packed.to_le_bytes());

        if has_center {
            out.push(pack_center(slice.center));
        }
        if has_pivot {
            out.push(pack_pivot(slice.pivot));
        }
    }
    Ok(out)
}

/// Decodes a compact byte sequence back into a table.
///
/// `center`/`pivot` are populated only when their flag bits were set;
/// otherwise they stay at zero defaults. Fails with
/// [`SliceKitError::TruncatedInput`] when the input ends mid-field. Key
/// bytes are decoded as lossy UTF-8: a table load never fails on name
/// bytes, matching the runtime readers of the format.
pub fn decode_table(bytes: &[u8]) -> Result<SliceTable> {
    let mut reader = Reader::new(bytes);
    let count = reader.u8()?;
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let key_len = reader.u8()? as usize;
        let key = String::from_utf8_lossy(reader.take(key_len)?).into_owned();

        let x = reader.u8()? as i32;
        let y = reader.u8()? as i32;
        let packed = reader.u16_le()?;
        let w = (packed & BOUNDS_W_MASK) as i32;
        let h = ((packed >> BOUNDS_H_SHIFT) & BOUNDS_H_MASK) as i32;

        let mut slice = Slice::new(Rect::new(x, y, w, h));
        if packed & FLAG_CENTER != 0 {
            slice.center = unpack_center(reader.u8()?);
        }
        if packed & FLAG_PIVOT != 0 {
            slice.pivot = unpack_pivot(reader.u8()?);
        }
        records.push((key, slice));
    }
    Ok(SliceTable::from_records(records))
}

fn pack_center(center: Rect) -> u8 {
    (center.x as u8 & CENTER_MASK)
        | ((center.y as u8 & CENTER_MASK) << CENTER_TOP_SHIFT)
        | ((center.w as u8 & CENTER_MASK) << CENTER_W_SHIFT)
        | ((center.h as u8 & CENTER_MASK) << CENTER_H_SHIFT)
}

fn unpack_center(byte: u8) -> Rect {
    Rect::new(
        (byte & CENTER_MASK) as i32,
        ((byte >> CENTER_TOP_SHIFT) & CENTER_MASK) as i32,
        ((byte >> CENTER_W_SHIFT) & CENTER_MASK) as i32,
        ((byte >> CENTER_H_SHIFT) & CENTER_MASK) as i32,
    )
}

fn pack_pivot(pivot: Point) -> u8 {
    let mut byte = (pivot.x.unsigned_abs() as u8 & PIVOT_MAG_MASK)
        | ((pivot.y.unsigned_abs() as u8 & PIVOT_MAG_MASK) << PIVOT_Y_SHIFT);
    if pivot.x < 0 {
        byte |= PIVOT_X_NEG;
    }
    if pivot.y < 0 {
        byte |= PIVOT_Y_NEG;
    }
    byte
}

fn unpack_pivot(byte: u8) -> Point {
    let mut x = (byte & PIVOT_MAG_MASK) as i32;
    let mut y = ((byte >> PIVOT_Y_SHIFT) & PIVOT_MAG_MASK) as i32;
    if byte & PIVOT_X_NEG != 0 {
        x = -x;
    }
    if byte & PIVOT_Y_NEG != 0 {
        y = -y;
    }
    Point::new(x, y)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.buf.len() - self.pos;
        if remaining < n {
            return Err(SliceKitError::TruncatedInput {
                needed: n - remaining,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}
