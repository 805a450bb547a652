//! Nine-patch compositor.
//!
//! Partitions a nine-patch slice into a 3×3 grid of source cells and maps
//! each cell onto an arbitrary destination rectangle, producing an ordered
//! list of (source rect, destination rect) draw operations. Pure geometry:
//! no pixels are touched here (see `compositing` for that), no state is
//! held, and valid geometry never fails — destinations smaller than the
//! fixed borders degrade by shrinking the corners instead of erroring.

use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SliceKitError};
use crate::model::{RectF, Slice};

/// Fill policy for the variable cells of the grid.
///
/// Corners are fixed-size by construction, so the policy only observably
/// changes edges and the center; it is honored uniformly for all nine
/// cells regardless.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchMode {
    /// Scale each cell to fill its destination (non-uniform scale allowed).
    Stretch,
    /// Tile each cell at its natural size, clipping the trailing tile.
    Repeat,
}

impl FromStr for PatchMode {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stretch" => Ok(Self::Stretch),
            "repeat" => Ok(Self::Repeat),
            _ => Err(()),
        }
    }
}

/// One draw operation: copy `src` (atlas space) onto `dst` (destination
/// space). Under `Repeat` the trailing tile of a cell is clipped in source
/// space, so `src` extents may be fractional.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PatchOp {
    pub src: RectF,
    pub dst: RectF,
}

/// Ordered draw operations plus the overall rectangle they cover.
///
/// `bounds` is always the full destination rectangle, even when `ops` is
/// empty (transparent tint, degenerate geometry): callers rely on it for
/// layout and hit-testing independently of whether anything was drawn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchPlan {
    pub ops: Vec<PatchOp>,
    pub bounds: RectF,
    /// Tint to apply while compositing, RGBA. `None` draws untinted.
    pub tint: Option<[u8; 4]>,
}

/// Plans the nine-patch composite of `slice` onto `dest`.
///
/// `scale` is the global asset scale and is clamped to a minimum of 1.
/// Fails only with [`SliceKitError::NotNinePatch`] when `slice` has an
/// empty center inset — simple slices take the single-blit path instead.
/// A tint with zero alpha yields an empty operation list but the normal
/// `bounds`.
pub fn plan_patches(
    slice: &Slice,
    dest: RectF,
    scale: i32,
    mode: PatchMode,
    tint: Option<Rgba<u8>>,
) -> Result<PatchPlan> {
    if !slice.is_nine_patch() {
        return Err(SliceKitError::NotNinePatch);
    }
    let tint = tint.map(|t| t.0);
    if let Some(t) = tint {
        if t[3] == 0 {
            return Ok(PatchPlan {
                ops: Vec::new(),
                bounds: dest,
                tint,
            });
        }
    }
    let ops = grid_ops(slice, dest, scale, mode);
    Ok(PatchPlan {
        ops,
        bounds: dest,
        tint,
    })
}

/// Splits one destination axis into (near corner, interior, far corner)
/// spans. Corners take their source size × scale and the interior takes
/// the rest; when that would leave a negative interior, the corners shrink
/// uniformly so they sum exactly to the destination extent and the
/// interior collapses to zero. Every span stays non-negative.
fn axis_spans(fixed_near: i32, fixed_far: i32, dest_extent: f32, scale: i32) -> (f32, f32, f32) {
    let near = (fixed_near * scale) as f32;
    let far = (fixed_far * scale) as f32;
    let interior = dest_extent - near - far;
    if interior < 0.0 {
        let k = dest_extent / (fixed_near + fixed_far).max(1) as f32;
        let near = (fixed_near as f32 * k).round_ties_even().max(0.0);
        let far = (dest_extent - near).max(0.0);
        return (near, 0.0, far);
    }
    (near, interior, far)
}

/// Emits the per-cell draw operations. Infallible for any geometry.
fn grid_ops(slice: &Slice, dest: RectF, scale: i32, mode: PatchMode) -> Vec<PatchOp> {
    let scale = scale.max(1);

    // Source cut-lines: the center inset is relative to the bounds origin.
    let sx0 = slice.bounds.x;
    let sx3 = slice.bounds.right();
    let sy0 = slice.bounds.y;
    let sy3 = slice.bounds.bottom();

    let sx1 = sx0 + slice.center.x;
    let sx2 = sx0 + slice.center.right();
    let sy1 = sy0 + slice.center.y;
    let sy2 = sy0 + slice.center.bottom();

    let sw_left = sx1 - sx0;
    let sw_right = sx3 - sx2;
    let sh_top = sy1 - sy0;
    let sh_bottom = sy3 - sy2;

    let (dw_left, dw_center, dw_right) = axis_spans(sw_left, sw_right, dest.w, scale);
    let (dh_top, dh_center, dh_bottom) = axis_spans(sh_top, sh_bottom, dest.h, scale);

    let src_xs = [sx0, sx1, sx2, sx3];
    let src_ys = [sy0, sy1, sy2, sy3];
    let dst_xs = [
        dest.x,
        dest.x + dw_left,
        dest.x + dw_left + dw_center,
        dest.x + dw_left + dw_center + dw_right,
    ];
    let dst_ys = [
        dest.y,
        dest.y + dh_top,
        dest.y + dh_top + dh_center,
        dest.y + dh_top + dh_center + dh_bottom,
    ];

    let mut ops = Vec::with_capacity(9);
    for row in 0..3 {
        for col in 0..3 {
            let s_left = src_xs[col];
            let s_top = src_ys[row];
            let s_w = src_xs[col + 1] - s_left;
            let s_h = src_ys[row + 1] - s_top;
            if s_w <= 0 || s_h <= 0 {
                continue;
            }

            let d_left = dst_xs[col];
            let d_top = dst_ys[row];
            let d_right = dst_xs[col + 1];
            let d_bottom = dst_ys[row + 1];
            let d_w = d_right - d_left;
            let d_h = d_bottom - d_top;
            if d_w <= 0.0 || d_h <= 0.0 {
                continue;
            }

            match mode {
                PatchMode::Stretch => {
                    ops.push(PatchOp {
                        src: RectF::new(s_left as f32, s_top as f32, s_w as f32, s_h as f32),
                        dst: RectF::new(d_left, d_top, d_w, d_h),
                    });
                }
                PatchMode::Repeat => {
                    // Tile at natural size × scale, left-to-right then
                    // top-to-bottom; the trailing tile clips in source
                    // space so its destination stays scale-exact.
                    let s = scale as f32;
                    let step_x = (s_w * scale) as f32;
                    let step_y = (s_h * scale) as f32;
                    let mut y = d_top;
                    while y < d_bottom {
                        let th = (s_h as f32).min((d_bottom - y) / s);
                        let mut x = d_left;
                        while x < d_right {
                            let tw = (s_w as f32).min((d_right - x) / s);
                            ops.push(PatchOp {
                                src: RectF::new(s_left as f32, s_top as f32, tw, th),
                                dst: RectF::new(x, y, tw * s, th * s),
                            });
                            x += step_x;
                        }
                        y += step_y;
                    }
                }
            }
        }
    }
    ops
}
