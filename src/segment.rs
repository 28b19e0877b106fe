//! Foreground/background segmentation seam.
//!
//! The measuring core never runs a segmentation model itself. A [`Segmenter`]
//! hands it a single-channel mask (high = foreground) for the input photo.

use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::MeasureError;

/// Produces a foreground mask for a photo.
///
/// Implementations must be safe to share between threads; the pipeline keeps
/// no state between calls.
pub trait Segmenter: Sync {
    fn segment(&self, image: &RgbImage) -> Result<GrayImage, MeasureError>;
}

/// A mask computed out of band, e.g. by an external background remover.
#[derive(Debug, Clone)]
pub struct PrecomputedMask(pub GrayImage);

impl Segmenter for PrecomputedMask {
    fn segment(&self, _image: &RgbImage) -> Result<GrayImage, MeasureError> {
        Ok(self.0.clone())
    }
}

/// A background-removed cut-out; its alpha channel is the mask.
#[derive(Debug, Clone)]
pub struct AlphaCutout(pub DynamicImage);

impl Segmenter for AlphaCutout {
    fn segment(&self, _image: &RgbImage) -> Result<GrayImage, MeasureError> {
        alpha_mask(&self.0)
    }
}

impl<F> Segmenter for F
where
    F: Fn(&RgbImage) -> Result<GrayImage, MeasureError> + Sync,
{
    fn segment(&self, image: &RgbImage) -> Result<GrayImage, MeasureError> {
        self(image)
    }
}

/// Extract the alpha channel of an RGBA (or luma-alpha) image as a mask.
pub fn alpha_mask(cutout: &DynamicImage) -> Result<GrayImage, MeasureError> {
    if !cutout.color().has_alpha() {
        return Err(MeasureError::SegmentationFailed(
            "cut-out has no alpha channel".to_string(),
        ));
    }
    let rgba = cutout.to_rgba8();
    let (w, h) = rgba.dimensions();
    let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
    GrayImage::from_raw(w, h, alpha).ok_or_else(|| {
        MeasureError::SegmentationFailed("alpha buffer does not match image size".to_string())
    })
}
