//! Physical measurements for every detected object.

use serde::Serialize;

use crate::calibrate::Calibration;
use crate::geom::DetectedObject;

/// Physical size of the whole image, using the same calibration as the objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameMetrics {
    pub frame_width: f64,
    pub frame_height: f64,
    pub frame_area: f64,
    /// How many reference objects (by nominal area) fit in the frame.
    pub frame_reference_count: f64,
}

impl FrameMetrics {
    pub fn new(width_px: u32, height_px: u32, calibration: &Calibration) -> Self {
        let frame_width = calibration.to_width(width_px as f64);
        let frame_height = calibration.to_height(height_px as f64);
        let frame_area = frame_width * frame_height;
        Self {
            frame_width,
            frame_height,
            frame_area,
            frame_reference_count: frame_area / calibration.reference_area(),
        }
    }
}

/// Measurement of one object, serialized as one entry of the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectMeasurement {
    pub width: f64,
    pub height: f64,
    pub area: f64,
    /// Oriented box corners [tl, tr, br, bl] as [x, y] pixel coordinates.
    #[serde(rename = "box")]
    pub corners: [[f64; 2]; 4],
    /// Object area over the reference's nominal area.
    pub reference_count: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub is_reference: bool,
    #[serde(flatten)]
    pub frame: FrameMetrics,
}

/// Convert every object (reference included) to physical units.
pub fn assemble(
    objects: &[DetectedObject],
    calibration: &Calibration,
    frame: FrameMetrics,
) -> Vec<ObjectMeasurement> {
    objects
        .iter()
        .enumerate()
        .map(|(i, obj)| {
            let width = calibration.to_width(obj.d_b);
            let height = calibration.to_height(obj.d_a);
            let area = width * height;
            ObjectMeasurement {
                width,
                height,
                area,
                corners: obj.bbox.corners.map(|p| [p.x, p.y]),
                reference_count: area / calibration.reference_area(),
                pixel_width: obj.d_b,
                pixel_height: obj.d_a,
                is_reference: i == calibration.reference_index,
                frame,
            }
        })
        .collect()
}
