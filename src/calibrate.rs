//! Pixel-to-metric calibration against the reference object.

use serde::Serialize;

use crate::error::MeasureError;
use crate::geom::DetectedObject;

/// Pixel-per-unit factors derived once per image from the reference object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Calibration {
    /// Horizontal pixels per physical unit (reference dB / reference length).
    pub width_modifier: f64,
    /// Vertical pixels per physical unit (reference dA / reference length).
    pub height_modifier: f64,
    /// Known physical length of the reference object.
    pub reference_length: f64,
    /// Index of the reference in the left-to-right object list.
    pub reference_index: usize,
}

impl Calibration {
    /// Calibrate from the detected objects, using the smallest as reference.
    pub fn from_objects(
        objects: &[DetectedObject],
        reference_length: f64,
    ) -> Result<Self, MeasureError> {
        validate_reference_length(reference_length)?;
        let index = select_reference(objects).ok_or(MeasureError::NoReferenceFound)?;
        Ok(Self::from_reference(&objects[index], index, reference_length))
    }

    fn from_reference(reference: &DetectedObject, index: usize, reference_length: f64) -> Self {
        Self {
            width_modifier: reference.d_b / reference_length,
            height_modifier: reference.d_a / reference_length,
            reference_length,
            reference_index: index,
        }
    }

    /// Nominal area of the reference (its length squared).
    pub fn reference_area(&self) -> f64 {
        self.reference_length * self.reference_length
    }

    pub fn to_width(&self, pixels: f64) -> f64 {
        pixels / self.width_modifier
    }

    pub fn to_height(&self, pixels: f64) -> f64 {
        pixels / self.height_modifier
    }
}

/// Reject reference lengths that would produce infinite or NaN factors.
pub fn validate_reference_length(length: f64) -> Result<(), MeasureError> {
    if length.is_finite() && length > 0.0 {
        Ok(())
    } else {
        Err(MeasureError::InvalidReferenceConstant(length))
    }
}

/// Index of the object with the smallest box area (dA × dB).
///
/// On ties the earliest object in the list wins. Length and width are never
/// minimized independently, so both factors always come from one object.
pub fn select_reference(objects: &[DetectedObject]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, obj) in objects.iter().enumerate() {
        let area = obj.box_area();
        match best {
            Some((_, best_area)) if area >= best_area => {}
            _ => best = Some((i, area)),
        }
    }
    best.map(|(i, _)| i)
}
