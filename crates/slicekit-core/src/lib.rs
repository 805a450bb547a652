//! Core library for sprite-atlas slice tables and nine-patch rendering.
//!
//! - Model: named slices (bounds, optional nine-patch center inset, pivot)
//! - Codec: compact binary table format with strict bit-field layout
//! - Compositor: 3×3 nine-patch planning under Stretch/Repeat policies
//! - Rendering: nearest-neighbor blits with luminance-silhouette tinting
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use slicekit_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let atlas = ImageReader::open("assets.png")?.decode()?.to_rgba8();
//! let table = SliceTable::from_compact(&std::fs::read("assets.bin")?)?;
//! let mut canvas = image::RgbaImage::new(64, 64);
//! draw_slice(
//!     &mut canvas, &atlas, &table, "event_back",
//!     RectF::new(0.0, 0.0, 64.0, 64.0),
//!     1, PatchMode::Stretch, None,
//! );
//! # Ok(()) }
//! ```

pub mod codec;
pub mod compositing;
pub mod draw;
pub mod error;
pub mod model;
pub mod ninepatch;
pub mod source;
pub mod table;

pub use codec::*;
pub use compositing::*;
pub use draw::*;
pub use error::*;
pub use model::*;
pub use ninepatch::*;
pub use table::*;

/// Convenience prelude for common types and functions.
/// Importing `slicekit_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::codec::{decode_table, encode_table};
    pub use crate::compositing::{blit_rgba, load_atlas, render_plan, tint_pixel};
    pub use crate::draw::{draw_slice, draw_slice_at};
    pub use crate::error::{Result, SliceKitError};
    pub use crate::model::{Point, PointF, Rect, RectF, Slice, TableStats};
    pub use crate::ninepatch::{PatchMode, PatchOp, PatchPlan, plan_patches};
    pub use crate::table::SliceTable;
}
