use thiserror::Error;

#[derive(Debug, Error)]
pub enum SliceKitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Slice sheet error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Table has {count} entries; the compact format stores the count in one byte (max 255)")]
    CapacityExceeded { count: usize },
    #[error("Slice name `{key}` is {len} UTF-8 bytes; the compact format stores key length in one byte (max 255)")]
    KeyTooLong { key: String, len: usize },
    #[error("Compact input truncated: needed {needed} more byte(s), {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },
    #[error("Slice is not a nine-patch (empty center inset)")]
    NotNinePatch,
}

pub type Result<T> = std::result::Result<T, SliceKitError>;
