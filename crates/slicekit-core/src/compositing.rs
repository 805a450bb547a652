//! Pixel compositing onto RGBA canvases.
//!
//! Nearest-neighbor blits of an atlas sub-rectangle onto a destination
//! rectangle, with optional tint recoloring and source-over blending.
//! The tint is a silhouette transform, not an overlay: each source pixel
//! collapses to its luminance, the tint color is scaled by that luminance,
//! and the tint alpha is scaled by the source alpha.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::model::RectF;
use crate::ninepatch::PatchPlan;

/// Reads and decodes an atlas image into RGBA.
pub fn load_atlas(path: impl AsRef<Path>) -> Result<RgbaImage> {
    Ok(image::ImageReader::open(path)?.decode()?.to_rgba8())
}

/// Rec. 709 luminance weights used by the tint transform.
pub const LUMA_R: f32 = 0.2126;
pub const LUMA_G: f32 = 0.7152;
pub const LUMA_B: f32 = 0.0722;

/// Opaque white: the identity tint. Supplying it draws untinted.
pub const TINT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Recolors one source pixel into the tinted silhouette.
pub fn tint_pixel(px: Rgba<u8>, tint: Rgba<u8>) -> Rgba<u8> {
    let luma =
        (LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32) / 255.0;
    let channel = |c: u8| (c as f32 * luma).round().clamp(0.0, 255.0) as u8;
    let alpha = (tint[3] as f32 * px[3] as f32 / 255.0).round() as u8;
    Rgba([channel(tint[0]), channel(tint[1]), channel(tint[2]), alpha])
}

/// Blits `src_rect` of `src` onto `dst_rect` of `canvas`.
///
/// Samples nearest-neighbor when the rectangles differ in size, clamps to
/// the canvas edges, and blends source-over. `tint` of `None` or opaque
/// white copies pixels unchanged; a zero-alpha tint writes nothing (the
/// blend drops fully transparent pixels).
pub fn blit_rgba(
    src: &RgbaImage,
    canvas: &mut RgbaImage,
    src_rect: RectF,
    dst_rect: RectF,
    tint: Option<Rgba<u8>>,
) {
    if src_rect.is_empty() || dst_rect.is_empty() {
        return;
    }
    let tint = tint.filter(|t| *t != TINT_WHITE);
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 {
        return;
    }

    let x0 = (dst_rect.x.floor() as i64).max(0);
    let y0 = (dst_rect.y.floor() as i64).max(0);
    let x1 = (dst_rect.right().ceil() as i64).min(cw as i64);
    let y1 = (dst_rect.bottom().ceil() as i64).min(ch as i64);

    // Source sampling window, clamped to both the cell and the image.
    let sx_min = (src_rect.x.floor() as i64).clamp(0, sw as i64 - 1);
    let sx_max = ((src_rect.right().ceil() as i64) - 1).clamp(0, sw as i64 - 1);
    let sy_min = (src_rect.y.floor() as i64).clamp(0, sh as i64 - 1);
    let sy_max = ((src_rect.bottom().ceil() as i64) - 1).clamp(0, sh as i64 - 1);

    for dy in y0..y1 {
        let v = (dy as f32 + 0.5 - dst_rect.y) / dst_rect.h;
        let sy = ((src_rect.y + v * src_rect.h).floor() as i64).clamp(sy_min, sy_max);
        for dx in x0..x1 {
            let u = (dx as f32 + 0.5 - dst_rect.x) / dst_rect.w;
            let sx = ((src_rect.x + u * src_rect.w).floor() as i64).clamp(sx_min, sx_max);
            let mut px = *src.get_pixel(sx as u32, sy as u32);
            if let Some(t) = tint {
                px = tint_pixel(px, t);
            }
            blend_pixel(canvas, dx as u32, dy as u32, px);
        }
    }
}

/// Applies a compositor plan to `canvas`, op by op, in order.
pub fn render_plan(src: &RgbaImage, canvas: &mut RgbaImage, plan: &PatchPlan) {
    let tint = plan.tint.map(Rgba);
    for op in &plan.ops {
        blit_rgba(src, canvas, op.src, op.dst, tint);
    }
}

/// Source-over blend of a straight-alpha pixel onto the canvas.
fn blend_pixel(canvas: &mut RgbaImage, x: u32, y: u32, src: Rgba<u8>) {
    let sa = src[3];
    if sa == 0 {
        return;
    }
    if sa == 255 {
        canvas.put_pixel(x, y, src);
        return;
    }
    let dst = *canvas.get_pixel(x, y);
    let sa = sa as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: u8, d: u8| {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    canvas.put_pixel(
        x,
        y,
        Rgba([
            mix(src[0], dst[0]),
            mix(src[1], dst[1]),
            mix(src[2], dst[2]),
            (out_a * 255.0).round() as u8,
        ]),
    );
}
