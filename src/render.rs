//! Measurement overlay: boxes, markers, connector lines and size labels.

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut};
use kurbo::Point;

use crate::config::MeasureConfig;
use crate::error::MeasureError;
use crate::geom::DetectedObject;
use crate::measure::ObjectMeasurement;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CORNER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const MIDPOINT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const CONNECTOR_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const MARKER_RADIUS: i32 = 5;

static LABEL_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

fn label_font() -> Result<FontRef<'static>, MeasureError> {
    FontRef::try_from_slice(LABEL_FONT)
        .map_err(|e| MeasureError::Annotation(format!("label font: {}", e)))
}

/// Draw the measurement overlay on a copy of `image`.
pub fn annotate(
    image: &RgbImage,
    objects: &[DetectedObject],
    measurements: &[ObjectMeasurement],
    config: &MeasureConfig,
) -> Result<RgbImage, MeasureError> {
    let font = label_font()?;
    let scale = PxScale::from(config.label_size.max(1.0));
    let text_h = scale.y.round() as i32;
    let mut canvas = image.clone();

    for (obj, m) in objects.iter().zip(measurements) {
        let corners = obj.bbox.corners;
        for i in 0..4 {
            thick_line(&mut canvas, corners[i], corners[(i + 1) % 4], BOX_COLOR);
        }
        for c in corners {
            draw_filled_circle_mut(&mut canvas, to_pixel(c), MARKER_RADIUS, CORNER_COLOR);
        }

        let mid = obj.midpoints;
        for p in [mid.top, mid.bottom, mid.left, mid.right] {
            draw_filled_circle_mut(&mut canvas, to_pixel(p), MARKER_RADIUS, MIDPOINT_COLOR);
        }
        thick_line(&mut canvas, mid.top, mid.bottom, CONNECTOR_COLOR);
        thick_line(&mut canvas, mid.left, mid.right, CONNECTOR_COLOR);

        // Width above the top edge, height right of the right edge.
        let width_label = format!("{:.2} {}", m.width, config.unit);
        let height_label = format!("{:.2} {}", m.height, config.unit);
        let (tx, ty) = to_pixel(mid.top);
        let (wx, wy) = (tx - 15, ty - 10 - text_h);
        draw_text_mut(&mut canvas, LABEL_COLOR, wx, wy, scale, &font, &width_label);
        let (rx, ry) = to_pixel(mid.right);
        let (hx, hy) = (rx + 10, ry - text_h / 2);
        draw_text_mut(&mut canvas, LABEL_COLOR, hx, hy, scale, &font, &height_label);
    }

    Ok(canvas)
}

fn to_pixel(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Two-pixel line: the segment plus a copy shifted along its minor axis.
fn thick_line(canvas: &mut RgbImage, a: Point, b: Point, color: Rgb<u8>) {
    let (ax, ay) = (a.x as f32, a.y as f32);
    let (bx, by) = (b.x as f32, b.y as f32);
    draw_line_segment_mut(canvas, (ax, ay), (bx, by), color);
    let (ox, oy) = if (bx - ax).abs() >= (by - ay).abs() { (0.0, 1.0) } else { (1.0, 0.0) };
    draw_line_segment_mut(canvas, (ax + ox, ay + oy), (bx + ox, by + oy), color);
}
