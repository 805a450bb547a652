//! Descriptive slice-sheet format (consumed, never produced).
//!
//! The sheet is the editor-side JSON export: `meta.slices` is an array of
//! named slices, each with one or more keyframes carrying `bounds` and
//! optional `center`/`pivot`. Unknown fields are ignored; the format has
//! none of the compact codec's range limits.

use serde::Deserialize;

use crate::error::Result;
use crate::model::{Point, Rect, Slice};
use crate::table::SliceTable;

/// Scale marker prefix in a slice's `data` string.
const SCALE_2X_MARKER: &str = "@2x";
/// Byte offset of the has-space flag character in a `data` string.
const HAS_SPACE_OFFSET: usize = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct SheetFile {
    pub meta: SheetMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetMeta {
    #[serde(default)]
    pub slices: Vec<SheetSlice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetSlice {
    pub name: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub keys: Vec<SheetKey>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SheetKey {
    #[serde(default)]
    pub frame: u32,
    pub bounds: SheetRect,
    #[serde(default)]
    pub center: Option<SheetRect>,
    #[serde(default)]
    pub pivot: Option<SheetPoint>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SheetRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SheetPoint {
    pub x: i32,
    pub y: i32,
}

impl From<SheetRect> for Rect {
    fn from(r: SheetRect) -> Self {
        Rect::new(r.x, r.y, r.w, r.h)
    }
}

impl From<SheetPoint> for Point {
    fn from(p: SheetPoint) -> Self {
        Point::new(p.x, p.y)
    }
}

/// Parses a sheet JSON document into a table.
///
/// Keyframes are applied in order and each one overwrites the slice's
/// record, so the last keyframe wins; a name repeated across slices also
/// resolves last-write-wins.
pub fn parse_sheet(json: &str) -> Result<SliceTable> {
    let sheet: SheetFile = serde_json::from_str(json)?;
    let mut records = Vec::new();
    for def in &sheet.meta.slices {
        let (scale, has_space) = def
            .data
            .as_deref()
            .map(parse_slice_data)
            .unwrap_or((1, false));
        for key in &def.keys {
            let mut slice = Slice::new(key.bounds.into());
            if let Some(center) = key.center {
                slice.center = center.into();
            }
            if let Some(pivot) = key.pivot {
                slice.pivot = pivot.into();
            }
            slice.scale = scale;
            slice.has_space = has_space;
            records.push((def.name.clone(), slice));
        }
    }
    Ok(SliceTable::from_records(records))
}

/// Parses a slice's `data` metadata string into `(scale, has_space)`.
///
/// A literal `@2x` prefix marks a double-resolution asset; anything else
/// leaves scale at 1. The has-space flag is the character at byte offset 3
/// being `'1'` (e.g. `"@2x1"`).
pub fn parse_slice_data(data: &str) -> (i32, bool) {
    let scale = if data.starts_with(SCALE_2X_MARKER) { 2 } else { 1 };
    let has_space = data.as_bytes().get(HAS_SPACE_OFFSET) == Some(&b'1');
    (scale, has_space)
}
