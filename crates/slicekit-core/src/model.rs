use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle (atlas pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0,
        y: 0,
        w: 0,
        h: 0,
    };

    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge coordinate (`x + w`).
    pub fn right(&self) -> i32 {
        self.x + self.w
    }
    /// Exclusive bottom edge coordinate (`y + h`).
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
    /// A rectangle is empty when either extent is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
    pub fn to_f32(&self) -> RectF {
        RectF::new(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }
}

/// Axis-aligned float rectangle (destination space).
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

/// Integer point. Pivot components are signed offsets from a slice's top-left.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Float point (destination space).
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One named region of the atlas: geometry plus display metadata.
///
/// Records are immutable once constructed; a [`crate::table::SliceTable`]
/// owns them for the process lifetime and hands out shared references.
///
/// Encodable ranges of the compact binary format: `bounds.x`/`bounds.y`
/// 0–255, `bounds.w` 0–31, `bounds.h` 0–63, `center` components 0–3, pivot
/// magnitudes 0–7 per axis. Values outside those ranges are bit-masked by
/// the codec, never rejected (see `codec`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slice {
    /// Region within the atlas image.
    pub bounds: Rect,
    /// Nine-patch interior inset, relative to `bounds` top-left.
    /// An empty rectangle means the slice is a plain region.
    pub center: Rect,
    /// Anchor offset from `bounds` top-left.
    pub pivot: Point,
    /// Asset scale marker from the source sheet (`@2x` assets). Not carried
    /// by the compact binary format.
    pub scale: i32,
    /// Source-sheet-only metadata flag. Not carried by the compact format.
    pub has_space: bool,
}

impl Default for Slice {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            center: Rect::ZERO,
            pivot: Point::ZERO,
            scale: 1,
            has_space: false,
        }
    }
}

impl Slice {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn with_center(mut self, center: Rect) -> Self {
        self.center = center;
        self
    }

    pub fn with_pivot(mut self, pivot: Point) -> Self {
        self.pivot = pivot;
        self
    }

    /// Derived, never stored: a slice is a nine-patch iff its center inset
    /// has positive extent on both axes.
    pub fn is_nine_patch(&self) -> bool {
        self.center.w > 0 && self.center.h > 0
    }
}

/// Inclusive `min..=max` range of one record field across a table.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRange {
    pub min: i32,
    pub max: i32,
}

impl FieldRange {
    fn seed(v: i32) -> Self {
        Self { min: v, max: v }
    }
    fn fold(&mut self, v: i32) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

/// Per-field min/max summary over a slice table.
///
/// Informational only: the compact format never stores any of this. Useful
/// for checking a sheet against the encodable ranges before shipping it.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStats {
    pub entries: usize,
    pub nine_patches: usize,
    pub pivoted: usize,
    pub bounds_x: FieldRange,
    pub bounds_y: FieldRange,
    pub bounds_w: FieldRange,
    pub bounds_h: FieldRange,
    pub center_x: FieldRange,
    pub center_y: FieldRange,
    pub center_w: FieldRange,
    pub center_h: FieldRange,
    pub pivot_x: FieldRange,
    pub pivot_y: FieldRange,
}

impl TableStats {
    pub fn from_slices<'a, I>(slices: I) -> Self
    where
        I: IntoIterator<Item = &'a Slice>,
    {
        let mut iter = slices.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let mut stats = TableStats {
            entries: 1,
            nine_patches: usize::from(first.is_nine_patch()),
            pivoted: usize::from(first.pivot != Point::ZERO),
            bounds_x: FieldRange::seed(first.bounds.x),
            bounds_y: FieldRange::seed(first.bounds.y),
            bounds_w: FieldRange::seed(first.bounds.w),
            bounds_h: FieldRange::seed(first.bounds.h),
            center_x: FieldRange::seed(first.center.x),
            center_y: FieldRange::seed(first.center.y),
            center_w: FieldRange::seed(first.center.w),
            center_h: FieldRange::seed(first.center.h),
            pivot_x: FieldRange::seed(first.pivot.x),
            pivot_y: FieldRange::seed(first.pivot.y),
        };
        for s in iter {
            stats.entries += 1;
            if s.is_nine_patch() {
                stats.nine_patches += 1;
            }
            if s.pivot != Point::ZERO {
                stats.pivoted += 1;
            }
            stats.bounds_x.fold(s.bounds.x);
            stats.bounds_y.fold(s.bounds.y);
            stats.bounds_w.fold(s.bounds.w);
            stats.bounds_h.fold(s.bounds.h);
            stats.center_x.fold(s.center.x);
            stats.center_y.fold(s.center.y);
            stats.center_w.fold(s.center.w);
            stats.center_h.fold(s.center.h);
            stats.pivot_x.fold(s.pivot.x);
            stats.pivot_y.fold(s.pivot.y);
        }
        stats
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Entries: {}, Nine-patches: {}, Pivoted: {}, Bounds x: {}..={} y: {}..={} w: {}..={} h: {}..={}, Center w: {}..={} h: {}..={}, Pivot x: {}..={} y: {}..={}",
            self.entries,
            self.nine_patches,
            self.pivoted,
            self.bounds_x.min,
            self.bounds_x.max,
            self.bounds_y.min,
            self.bounds_y.max,
            self.bounds_w.min,
            self.bounds_w.max,
            self.bounds_h.min,
            self.bounds_h.max,
            self.center_w.min,
            self.center_w.max,
            self.center_h.min,
            self.center_h.max,
            self.pivot_x.min,
            self.pivot_x.max,
            self.pivot_y.min,
            self.pivot_y.max,
        )
    }
}
