/// All measurement parameters in one struct.
/// Adjustable per call; nothing here is cached between invocations.
#[derive(Debug, Clone)]
pub struct MeasureConfig {
    // -- Mask stage --
    /// Binarization threshold (0-255). Mask values strictly above it are foreground.
    pub threshold: u8,
    /// Radius of the disk used for morphological closing.
    /// 7 corresponds to a 15×15 elliptical kernel. 0 = no closing.
    pub smoothing_radius: u8,

    // -- Calibration --
    /// Real-world length of the reference object (coin diameter).
    /// Must be positive and finite.
    pub reference_length: f64,
    /// Unit suffix used in annotation labels, e.g. "in" or "mm".
    pub unit: String,

    // -- Output --
    /// Rotate portrait images (and their masks) to landscape before measuring.
    pub landscape: bool,
    /// Draw the measurement overlay. When false the annotated image is a plain copy.
    pub annotate: bool,
    /// Text height of annotation labels, in pixels.
    pub label_size: f32,
}

/// Diameter of a US dime in inches.
pub const DIME_DIAMETER_IN: f64 = 0.705;

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            threshold: 127,
            smoothing_radius: 7,
            reference_length: DIME_DIAMETER_IN,
            unit: "in".to_string(),
            landscape: false,
            annotate: true,
            label_size: 18.0,
        }
    }
}
