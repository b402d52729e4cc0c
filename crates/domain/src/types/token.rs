use serde::{Deserialize, Serialize};

/// Pixel rectangle in page coordinates (origin top-left).
///
/// Width and height are signed so that degenerate boxes reported by an OCR
/// engine survive deserialization and can be skipped explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// True when the rectangle covers at least one pixel.
    pub const fn is_paintable(&self) -> bool {
        self.w > 0 && self.h > 0
    }
}

/// A word as reported by the OCR capability, before offsets are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    #[serde(flatten)]
    pub rect: PixelRect,
}

impl OcrWord {
    pub fn new(text: impl Into<String>, rect: PixelRect) -> Self {
        Self { text: text.into(), rect }
    }
}

/// An OCR word unit positioned both on the page and in the analyzed text.
///
/// `start..end` are byte offsets into the same reconstructed text the
/// extractor ran over, so `&text[start..end] == token.text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(flatten)]
    pub rect: PixelRect,
    #[serde(default)]
    pub page: usize,
    pub start: usize,
    pub end: usize,
}
