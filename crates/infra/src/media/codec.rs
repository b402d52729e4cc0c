//! Page raster decoding and encoding

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use piiveil_domain::{PiiVeilError, Result};
use tracing::debug;

use crate::errors::InfraError;

/// Decode image bytes of any supported format into an RGBA raster.
///
/// # Errors
/// Returns `PiiVeilError::InvalidInput` when the bytes are not a decodable
/// image.
pub fn decode_page(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).map_err(InfraError::from)?;
    Ok(image.to_rgba8())
}

/// Encode a raster as PNG.
pub fn encode_png(page: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    page.write_to(&mut buffer, ImageFormat::Png).map_err(InfraError::from)?;
    Ok(buffer.into_inner())
}

/// Read and decode a page image from disk.
pub fn read_page(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).map_err(InfraError::from)?;
    let page = decode_page(&bytes)?;
    debug!(path = %path.display(), width = page.width(), height = page.height(), "page decoded");
    Ok(page)
}

/// Write a page as PNG, replacing any existing file.
pub fn write_png(path: &Path, page: &RgbaImage) -> Result<()> {
    let bytes = encode_png(page)?;
    std::fs::write(path, bytes).map_err(|err| PiiVeilError::from(InfraError::from(err)))
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn png_bytes_decode_back_to_same_pixels() {
        let mut page = RgbaImage::from_pixel(4, 3, Rgba([255, 255, 255, 255]));
        page.put_pixel(1, 1, Rgba([0, 0, 0, 255]));

        let decoded = decode_page(&encode_png(&page).unwrap()).unwrap();

        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(1, 1), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn garbage_bytes_are_invalid_input() {
        let err = decode_page(b"%PDF-1.7 not a raster").unwrap_err();
        assert!(matches!(err, PiiVeilError::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn pages_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page-0.png");
        let page = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));

        write_png(&path, &page).unwrap();
        assert_eq!(read_page(&path).unwrap(), page);
    }

    #[test]
    fn missing_page_file_is_not_found() {
        let err = read_page(Path::new("/nonexistent/page.png")).unwrap_err();
        assert!(matches!(err, PiiVeilError::NotFound(_)));
    }
}
