//! High-level slice drawing.
//!
//! Looks a slice up by name and routes it: plain regions get one blit,
//! nine-patch regions go through the compositor. Unknown names are a
//! silent no-op (`None`), matching how icon renderers treat missing
//! assets. Every drawing call returns the destination rectangle it
//! covered — callers use it for layout even when a fully transparent tint
//! suppressed the pixels themselves.

use image::{Rgba, RgbaImage};
use tracing::trace;

use crate::compositing::{blit_rgba, render_plan};
use crate::model::{PointF, RectF};
use crate::ninepatch::{PatchMode, plan_patches};
use crate::table::SliceTable;

/// Draws the named slice into `dest`, stretching or nine-patching as the
/// record dictates. Returns the covered rectangle, or `None` for an
/// unknown name.
#[allow(clippy::too_many_arguments)]
pub fn draw_slice(
    canvas: &mut RgbaImage,
    atlas: &RgbaImage,
    table: &SliceTable,
    name: &str,
    dest: RectF,
    scale: i32,
    mode: PatchMode,
    tint: Option<Rgba<u8>>,
) -> Option<RectF> {
    let Some(slice) = table.get(name) else {
        trace!(name, "unknown slice, skipping draw");
        return None;
    };
    if tint.is_some_and(|t| t[3] == 0) {
        return Some(dest);
    }
    if slice.is_nine_patch() {
        if let Ok(plan) = plan_patches(slice, dest, scale, mode, tint) {
            render_plan(atlas, canvas, &plan);
        }
    } else {
        blit_rgba(atlas, canvas, slice.bounds.to_f32(), dest, tint);
    }
    Some(dest)
}

/// Draws the named slice at its natural size (× `scale`), anchored so the
/// record's pivot lands on `dest`. Returns the covered rectangle, or
/// `None` for an unknown name.
pub fn draw_slice_at(
    canvas: &mut RgbaImage,
    atlas: &RgbaImage,
    table: &SliceTable,
    name: &str,
    dest: PointF,
    scale: i32,
    tint: Option<Rgba<u8>>,
) -> Option<RectF> {
    let Some(slice) = table.get(name) else {
        trace!(name, "unknown slice, skipping draw");
        return None;
    };
    let scale = scale.max(1);
    let dest_rect = RectF::new(
        dest.x - (slice.pivot.x * scale) as f32,
        dest.y - (slice.pivot.y * scale) as f32,
        (slice.bounds.w * scale) as f32,
        (slice.bounds.h * scale) as f32,
    );
    if tint.is_some_and(|t| t[3] == 0) {
        return Some(dest_rect);
    }
    blit_rgba(atlas, canvas, slice.bounds.to_f32(), dest_rect, tint);
    Some(dest_rect)
}
