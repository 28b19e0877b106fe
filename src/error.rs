use thiserror::Error;

/// Errors that can abort a measurement.
///
/// An image with no detectable objects is not an error: the pipeline returns
/// the original image and an empty object list.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MeasureError {
    #[error("invalid reference length {0}: must be positive and finite")]
    InvalidReferenceConstant(f64),

    #[error("segmentation failed: {0}")]
    SegmentationFailed(String),

    #[error("mask unavailable: {0}")]
    MaskUnavailable(String),

    #[error("no reference object could be selected")]
    NoReferenceFound,

    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("failed to draw annotation: {0}")]
    Annotation(String),
}
