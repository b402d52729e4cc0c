//! Raster codec for page images

pub mod codec;

pub use codec::{decode_page, encode_png, read_page, write_png};
