use std::path::Path;

use image::{GrayImage, ImageReader};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

use crate::config::MeasureConfig;
use crate::error::MeasureError;

/// Load a single-channel mask from disk.
///
/// Colour and alpha images are reduced to 8-bit luma.
pub fn load_mask(path: &Path) -> Result<GrayImage, MeasureError> {
    let mask = ImageReader::open(path)
        .map_err(|e| MeasureError::MaskUnavailable(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| MeasureError::MaskUnavailable(format!("{}: {}", path.display(), e)))?
        .into_luma8();
    Ok(mask)
}

/// Binarize a mask: values strictly above `level` become 255, the rest 0.
pub fn binarize(mask: &GrayImage, level: u8) -> GrayImage {
    threshold(mask, level, ThresholdType::Binary)
}

/// Morphological closing with a Euclidean disk of the given radius.
///
/// Fills small holes and notches left by an imperfect segmentation.
pub fn close(mask: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return mask.clone();
    }
    morphology::close(mask, Norm::L2, radius)
}

/// Turn a raw segmentation mask into a clean binary silhouette mask.
///
/// Foreground pixels are 255, background pixels are 0.
pub fn prepare(mask: &GrayImage, config: &MeasureConfig) -> GrayImage {
    let binary = binarize(mask, config.threshold);
    close(&binary, config.smoothing_radius)
}
