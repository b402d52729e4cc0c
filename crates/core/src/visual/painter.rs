//! Opaque box painting over page rasters

use std::collections::BTreeMap;

use image::{Rgba, RgbaImage};
use piiveil_domain::RedactionBox;
use tracing::{debug, warn};

/// Fully opaque fill for `rgb`.
pub const fn fill_color(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], u8::MAX])
}

/// Pixel range of `redaction_box` clipped to a `width` x `height` raster, or
/// `None` when nothing remains.
fn clip(redaction_box: &RedactionBox, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let rect = redaction_box.rect;
    if !rect.is_paintable() {
        return None;
    }

    let x0 = i64::from(rect.x).max(0);
    let y0 = i64::from(rect.y).max(0);
    let x1 = (i64::from(rect.x) + i64::from(rect.w)).min(i64::from(width));
    let y1 = (i64::from(rect.y) + i64::from(rect.h)).min(i64::from(height));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    // All four are within 0..=u32::MAX after clipping.
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Paint every box onto `image`, clipped to its bounds.
///
/// Boxes with a non-positive width or height, or lying entirely outside the
/// raster, are skipped. Returns the number of boxes painted.
pub fn paint_boxes<'a>(
    image: &mut RgbaImage,
    boxes: impl IntoIterator<Item = &'a RedactionBox>,
    fill: Rgba<u8>,
) -> usize {
    let (width, height) = image.dimensions();
    let mut painted = 0;

    for redaction_box in boxes {
        let Some((x0, y0, x1, y1)) = clip(redaction_box, width, height) else {
            continue;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, fill);
            }
        }
        painted += 1;
    }

    painted
}

/// Paint `boxes` onto their pages.
///
/// Pages without boxes are returned untouched and page order is preserved.
/// Boxes pointing at a page that was not supplied are ignored.
pub fn redact_pages(
    mut pages: Vec<RgbaImage>,
    boxes: &[RedactionBox],
    fill: Rgba<u8>,
) -> Vec<RgbaImage> {
    let mut by_page: BTreeMap<usize, Vec<&RedactionBox>> = BTreeMap::new();
    for redaction_box in boxes {
        by_page.entry(redaction_box.page).or_default().push(redaction_box);
    }

    for (page, page_boxes) in by_page {
        let Some(image) = pages.get_mut(page) else {
            warn!(page, boxes = page_boxes.len(), "Boxes reference a page that was not supplied");
            continue;
        };
        let painted = paint_boxes(image, page_boxes, fill);
        debug!(page, painted, "Painted redaction boxes");
    }

    pages
}

#[cfg(test)]
mod tests {
    use piiveil_domain::{PiiType, PixelRect};

    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn page() -> RgbaImage {
        RgbaImage::from_pixel(20, 10, WHITE)
    }

    fn redaction_box(page: usize, x: i32, y: i32, w: i32, h: i32) -> RedactionBox {
        RedactionBox { rect: PixelRect::new(x, y, w, h), page, pii_type: PiiType::Email, start: 0, end: 1 }
    }

    fn painted_pixels(image: &RgbaImage) -> usize {
        image.pixels().filter(|p| **p == BLACK).count()
    }

    #[test]
    fn paints_exact_rectangle() {
        let mut image = page();
        let painted = paint_boxes(&mut image, &[redaction_box(0, 2, 3, 4, 2)], BLACK);

        assert_eq!(painted, 1);
        assert_eq!(painted_pixels(&image), 8);
        assert_eq!(*image.get_pixel(2, 3), BLACK);
        assert_eq!(*image.get_pixel(5, 4), BLACK);
        assert_eq!(*image.get_pixel(6, 4), WHITE);
        assert_eq!(*image.get_pixel(2, 5), WHITE);
    }

    #[test]
    fn degenerate_and_offscreen_boxes_are_skipped() {
        let mut image = page();
        let boxes = [
            redaction_box(0, 1, 1, 0, 5),
            redaction_box(0, 1, 1, 5, -2),
            redaction_box(0, 50, 50, 5, 5),
        ];
        assert_eq!(paint_boxes(&mut image, &boxes, BLACK), 0);
        assert_eq!(painted_pixels(&image), 0);
    }

    #[test]
    fn boxes_are_clipped_to_bounds() {
        let mut image = page();
        paint_boxes(&mut image, &[redaction_box(0, -5, 8, 10, 10)], BLACK);
        assert_eq!(painted_pixels(&image), 5 * 2);
    }

    #[test]
    fn pages_are_painted_independently_in_order() {
        let boxes = [redaction_box(1, 0, 0, 2, 2), redaction_box(7, 0, 0, 2, 2)];
        let pages = redact_pages(vec![page(), page(), page()], &boxes, BLACK);

        assert_eq!(pages.len(), 3);
        assert_eq!(painted_pixels(&pages[0]), 0);
        assert_eq!(painted_pixels(&pages[1]), 4);
        assert_eq!(painted_pixels(&pages[2]), 0);
    }

    #[test]
    fn fill_is_always_opaque() {
        assert_eq!(fill_color([10, 20, 30]), Rgba([10, 20, 30, 255]));
    }
}
