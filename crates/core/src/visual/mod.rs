//! Visual redaction of page rasters

pub mod painter;

pub use painter::{fill_color, paint_boxes, redact_pages};
