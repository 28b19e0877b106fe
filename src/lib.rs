//! coinmeasure: object sizes from a photo with a reference coin.
//!
//! Given a photo and a foreground mask, finds every object silhouette, fits an
//! oriented bounding box to each, calibrates pixels to physical units from the
//! smallest object (the coin) and reports per-object dimensions.
//!
//! # Example
//!
//! ```no_run
//! use coinmeasure::{measure_files, MeasureConfig};
//! use std::path::Path;
//!
//! let config = MeasureConfig::default();
//! let result = measure_files(Path::new("photo.jpg"), Path::new("mask.png"), &config)?;
//! for object in &result.objects {
//!     println!("{:.2} x {:.2} {}", object.width, object.height, config.unit);
//! }
//! # Ok::<(), coinmeasure::MeasureError>(())
//! ```

#![forbid(unsafe_code)]

mod bitmap;
mod calibrate;
mod config;
mod contour;
mod geom;
mod measure;
mod render;

pub mod error;
pub mod segment;

#[cfg(test)]
mod test_utils;

pub use bitmap::load_mask;
pub use calibrate::Calibration;
pub use config::{MeasureConfig, DIME_DIAMETER_IN};
pub use error::MeasureError;
pub use geom::{order_corners, MIN_CONTOUR_AREA};
pub use measure::{FrameMetrics, ObjectMeasurement};
pub use segment::{AlphaCutout, PrecomputedMask, Segmenter};

// Re-export kurbo so callers get the same Point type as order_corners.
pub use kurbo;

use std::path::Path;
use std::time::Instant;

use image::{imageops, GrayImage, ImageReader, RgbImage};

use calibrate::validate_reference_length;

/// Result of measuring one photo.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Copy of the input photo with the measurement overlay.
    pub annotated: RgbImage,
    /// One entry per object, left to right. Empty when nothing was found.
    pub objects: Vec<ObjectMeasurement>,
    /// Pixel-to-unit factors, absent when no objects were found.
    pub calibration: Option<Calibration>,
}

impl Measurement {
    fn empty(image: RgbImage) -> Self {
        Self { annotated: image, objects: Vec::new(), calibration: None }
    }
}

/// Full pipeline: photo + segmenter → measured objects.
pub fn measure(
    image: &RgbImage,
    segmenter: &dyn Segmenter,
    config: &MeasureConfig,
) -> Result<Measurement, MeasureError> {
    validate_reference_length(config.reference_length)?;

    let t_start = Instant::now();
    let mask = segmenter.segment(image)?;
    tracing::info!(
        "segment: {}x{} mask in {}ms",
        mask.width(),
        mask.height(),
        t_start.elapsed().as_millis()
    );

    measure_mask(image, &mask, config)
}

/// Pipeline once a mask is available: mask → contours → boxes → calibration
/// → measurements.
pub fn measure_mask(
    image: &RgbImage,
    mask: &GrayImage,
    config: &MeasureConfig,
) -> Result<Measurement, MeasureError> {
    validate_reference_length(config.reference_length)?;

    if mask.dimensions() != image.dimensions() {
        return Err(MeasureError::MaskUnavailable(format!(
            "mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            image.width(),
            image.height()
        )));
    }

    // ── Orientation ───────────────────────────────────────
    let original = image;
    let rotated;
    let (image, mask) = if config.landscape && image.height() > image.width() {
        tracing::info!("orient: portrait input rotated to landscape");
        rotated = (imageops::rotate270(image), imageops::rotate270(mask));
        (&rotated.0, &rotated.1)
    } else {
        (image, mask)
    };

    // ── Mask ──────────────────────────────────────────────
    let clean = bitmap::prepare(mask, config);
    tracing::debug!(
        "mask: threshold {}, closing radius {}",
        config.threshold,
        config.smoothing_radius
    );

    // ── Contours ──────────────────────────────────────────
    let contours = contour::extract(&clean);
    if contours.is_empty() {
        tracing::info!("contours: none found");
        return Ok(Measurement::empty(original.clone()));
    }

    // ── Oriented boxes ────────────────────────────────────
    let objects = geom::detect(&contours);
    tracing::info!(
        "objects: {} of {} contours above {} px²",
        objects.len(),
        contours.len(),
        MIN_CONTOUR_AREA
    );
    if objects.is_empty() {
        return Ok(Measurement::empty(original.clone()));
    }

    // ── Calibration ───────────────────────────────────────
    let calibration = Calibration::from_objects(&objects, config.reference_length)
        .inspect_err(|e| {
            tracing::error!("calibration failed on {} objects: {}", objects.len(), e)
        })?;
    tracing::info!(
        "calibrate: reference #{} → {:.3} px/unit wide, {:.3} px/unit high",
        calibration.reference_index,
        calibration.width_modifier,
        calibration.height_modifier
    );

    // ── Measure ───────────────────────────────────────────
    let frame = FrameMetrics::new(image.width(), image.height(), &calibration);
    let results = measure::assemble(&objects, &calibration, frame);
    for (i, m) in results.iter().enumerate() {
        tracing::debug!(
            "object #{}: {:.2} x {:.2} (area {:.2}, {:.1} references)",
            i,
            m.width,
            m.height,
            m.area,
            m.reference_count
        );
    }

    let annotated = if config.annotate {
        render::annotate(image, &objects, &results, config)?
    } else {
        image.clone()
    };

    Ok(Measurement { annotated, objects: results, calibration: Some(calibration) })
}

/// Convenience: measure a photo against a mask image on disk.
pub fn measure_files(
    image_path: &Path,
    mask_path: &Path,
    config: &MeasureConfig,
) -> Result<Measurement, MeasureError> {
    validate_reference_length(config.reference_length)?;
    let image = load_image(image_path)?;
    let mask = load_mask(mask_path)?;
    measure(&image, &PrecomputedMask(mask), config)
}

/// Load a photo as 8-bit RGB.
pub fn load_image(path: &Path) -> Result<RgbImage, MeasureError> {
    let image = ImageReader::open(path)
        .map_err(|e| MeasureError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| MeasureError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .into_rgb8();
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fill_disk, fill_rotated_rect, mask_with_rects, plain_image, RectSpec};
    use approx::assert_abs_diff_eq;

    fn run(w: u32, h: u32, rects: &[RectSpec]) -> Measurement {
        let image = plain_image(w, h);
        let mask = mask_with_rects(w, h, rects, 255);
        measure(&image, &PrecomputedMask(mask), &MeasureConfig::default()).unwrap()
    }

    #[test]
    fn single_object_measures_as_reference() {
        let result = run(200, 200, &[(60, 40, 45, 70)]);
        assert_eq!(result.objects.len(), 1);
        let obj = &result.objects[0];
        assert!(obj.is_reference);
        assert_abs_diff_eq!(obj.width, 0.705, epsilon = 1e-9);
        assert_abs_diff_eq!(obj.height, 0.705, epsilon = 1e-9);
    }

    #[test]
    fn coin_and_box_scenario() {
        // 30×50 coin-ish blob and a 100×200 box.
        let result = run(320, 260, &[(20, 30, 30, 50), (120, 30, 100, 200)]);
        assert_eq!(result.objects.len(), 2);

        let cal = result.calibration.unwrap();
        assert_eq!(cal.reference_index, 0);
        // Boundaries run through pixel centres, so a w-pixel blob spans w - 1.
        assert_abs_diff_eq!(cal.width_modifier, 29.0 / 0.705, epsilon = 1e-9);
        assert_abs_diff_eq!(cal.height_modifier, 49.0 / 0.705, epsilon = 1e-9);

        let big = &result.objects[1];
        assert_abs_diff_eq!(big.width, 99.0 * 0.705 / 29.0, epsilon = 1e-9);
        assert_abs_diff_eq!(big.height, 199.0 * 0.705 / 49.0, epsilon = 1e-9);
        assert_abs_diff_eq!(big.width, 2.35, epsilon = 0.1);
        assert_abs_diff_eq!(big.height, 2.82, epsilon = 0.1);
        assert_abs_diff_eq!(big.frame.frame_width, 320.0 / cal.width_modifier, epsilon = 1e-9);
    }

    #[test]
    fn results_are_ordered_left_to_right() {
        let result = run(400, 200, &[(300, 20, 40, 40), (20, 120, 30, 30), (150, 60, 60, 90)]);
        assert_eq!(result.objects.len(), 3);
        let left_edges: Vec<f64> = result
            .objects
            .iter()
            .map(|o| o.corners.iter().map(|c| c[0]).fold(f64::MAX, f64::min))
            .collect();
        assert_eq!(left_edges, vec![20.0, 150.0, 300.0]);
        assert!(result.objects[0].is_reference);
    }

    #[test]
    fn measurements_survive_scaling() {
        let small = run(300, 200, &[(20, 20, 40, 40), (100, 40, 120, 80)]);
        let large = run(600, 400, &[(40, 40, 80, 80), (200, 80, 240, 160)]);
        for (a, b) in small.objects.iter().zip(&large.objects) {
            assert_abs_diff_eq!(a.width, b.width, epsilon = 0.02 * a.width);
            assert_abs_diff_eq!(a.height, b.height, epsilon = 0.02 * a.height);
        }
    }

    #[test]
    fn specks_are_never_reported() {
        // 8×8 speck: contour area 49 px².
        let result = run(200, 120, &[(20, 20, 8, 8), (80, 30, 40, 40)]);
        assert_eq!(result.objects.len(), 1);
        assert!(result.objects[0].is_reference);

        let only_specks = run(200, 120, &[(20, 20, 8, 8), (100, 60, 6, 6)]);
        assert!(only_specks.objects.is_empty());
        assert!(only_specks.calibration.is_none());
    }

    #[test]
    fn empty_mask_returns_original_image() {
        let image = plain_image(64, 48);
        let mask = GrayImage::new(64, 48);
        let result = measure_mask(&image, &mask, &MeasureConfig::default()).unwrap();
        assert!(result.objects.is_empty());
        assert_eq!(result.annotated, image);
    }

    #[test]
    fn invalid_reference_fails_before_segmentation() {
        let config = MeasureConfig { reference_length: 0.0, ..MeasureConfig::default() };
        let never = |_: &RgbImage| -> Result<GrayImage, MeasureError> {
            panic!("segmenter must not run")
        };
        let err = measure(&plain_image(10, 10), &never, &config).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidReferenceConstant(_)));
    }

    #[test]
    fn segmentation_failure_propagates() {
        let failing = |_: &RgbImage| -> Result<GrayImage, MeasureError> {
            Err(MeasureError::SegmentationFailed("no alpha".to_string()))
        };
        let err = measure(&plain_image(10, 10), &failing, &MeasureConfig::default()).unwrap_err();
        assert!(matches!(err, MeasureError::SegmentationFailed(_)));
    }

    #[test]
    fn mismatched_mask_is_unavailable() {
        let image = plain_image(40, 40);
        let err = measure_mask(&image, &GrayImage::new(20, 40), &MeasureConfig::default())
            .unwrap_err();
        assert!(matches!(err, MeasureError::MaskUnavailable(_)));
    }

    #[test]
    fn portrait_input_is_rotated_when_requested() {
        let image = plain_image(120, 240);
        let mask = mask_with_rects(120, 240, &[(30, 40, 30, 30), (30, 120, 40, 80)], 255);
        let config = MeasureConfig { landscape: true, ..MeasureConfig::default() };
        let result = measure_mask(&image, &mask, &config).unwrap();
        assert_eq!(result.annotated.dimensions(), (240, 120));
        assert_eq!(result.objects.len(), 2);
        // The tall box lies on its side after rotation.
        assert!(result.objects[1].width > result.objects[1].height);
    }

    #[test]
    fn empty_portrait_input_comes_back_unrotated() {
        let image = plain_image(100, 200);
        let config = MeasureConfig { landscape: true, ..MeasureConfig::default() };
        let result = measure_mask(&image, &GrayImage::new(100, 200), &config).unwrap();
        assert!(result.objects.is_empty());
        assert_eq!(result.annotated, image);

        let specks = mask_with_rects(100, 200, &[(20, 20, 6, 6)], 255);
        let result = measure_mask(&image, &specks, &config).unwrap();
        assert!(result.objects.is_empty());
        assert_eq!(result.annotated.dimensions(), (100, 200));
    }

    #[test]
    fn round_reference_measures_tilted_box() {
        // Coin of diameter ~60 px on the left, 240×120 box tilted on the right.
        for angle in [0.0, 0.3, 0.5, -0.5, 0.7] {
            let mut mask = GrayImage::new(440, 300);
            fill_disk(&mut mask, (60, 150), 30);
            fill_rotated_rect(&mut mask, (280.0, 150.0), (240.0, 120.0), angle);
            let result = measure_mask(&plain_image(440, 300), &mask, &MeasureConfig::default())
                .unwrap();
            assert_eq!(result.objects.len(), 2, "angle {}", angle);

            let coin = &result.objects[0];
            assert!(coin.is_reference);
            assert_abs_diff_eq!(coin.width, 0.705, epsilon = 1e-9);
            assert_abs_diff_eq!(coin.height, 0.705, epsilon = 1e-9);

            // 240 / 60 and 120 / 60 coin diameters, give or take a pixel per side.
            let tilted = &result.objects[1];
            assert!(tilted.width > tilted.height, "angle {}: {:?}", angle, tilted);
            assert_abs_diff_eq!(tilted.width, 2.82, epsilon = 0.15);
            assert_abs_diff_eq!(tilted.height, 1.41, epsilon = 0.1);
        }
    }

    #[test]
    fn annotation_can_be_disabled() {
        let image = plain_image(100, 100);
        let mask = mask_with_rects(100, 100, &[(30, 30, 30, 30)], 255);
        let config = MeasureConfig { annotate: false, ..MeasureConfig::default() };
        let result = measure_mask(&image, &mask, &config).unwrap();
        assert_eq!(result.objects.len(), 1);
        assert_eq!(result.annotated, image);
    }
}
