//! Synthetic masks and images for unit tests.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point;

/// Axis-aligned filled rectangle as (x, y, width, height) in pixels.
pub(crate) type RectSpec = (u32, u32, u32, u32);

const FOREGROUND: Luma<u8> = Luma([255]);

/// Render a binary mask with the given filled rectangles set to `value`.
pub(crate) fn mask_with_rects(w: u32, h: u32, rects: &[RectSpec], value: u8) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    for &(rx, ry, rw, rh) in rects {
        for y in ry..(ry + rh).min(h) {
            for x in rx..(rx + rw).min(w) {
                mask.put_pixel(x, y, Luma([value]));
            }
        }
    }
    mask
}

/// Add a filled disk (a coin) to a mask.
pub(crate) fn fill_disk(mask: &mut GrayImage, center: (i32, i32), radius: i32) {
    draw_filled_circle_mut(mask, center, radius, FOREGROUND);
}

/// Add a filled `size.0` × `size.1` rectangle centred on `center`, turned by
/// `angle` radians.
pub(crate) fn fill_rotated_rect(
    mask: &mut GrayImage,
    center: (f64, f64),
    size: (f64, f64),
    angle: f64,
) {
    let (s, c) = angle.sin_cos();
    let (hw, hh) = (size.0 / 2.0, size.1 / 2.0);
    let corners: Vec<Point<i32>> = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .iter()
        .map(|&(x, y)| {
            Point::new(
                (center.0 + x * c - y * s).round() as i32,
                (center.1 + x * s + y * c).round() as i32,
            )
        })
        .collect();
    draw_polygon_mut(mask, &corners, FOREGROUND);
}

/// Solid-colour RGB image, used as the photo the mask belongs to.
pub(crate) fn plain_image(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb([40, 40, 40]))
}
