use clap::{ArgGroup, Parser};
use coinmeasure::{AlphaCutout, MeasureConfig, PrecomputedMask, Segmenter};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "coinmeasure",
    about = "Measure objects in a photo against a reference coin"
)]
#[command(group(ArgGroup::new("segmentation").required(true).args(["mask", "cutout"])))]
struct Cli {
    /// Input photo path (PNG, JPEG, BMP)
    #[arg(short, long)]
    image: PathBuf,

    /// Foreground mask (grayscale, white = object)
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Background-removed cut-out with alpha channel (used as the mask)
    #[arg(short, long)]
    cutout: Option<PathBuf>,

    /// Annotated output image
    #[arg(short, long, default_value = "measured.png")]
    output: PathBuf,

    /// Write measurements as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Real-world length of the reference coin
    #[arg(short, long, default_value = "0.705")]
    reference: f64,

    /// Unit suffix for labels
    #[arg(short, long, default_value = "in")]
    unit: String,

    /// Mask binarization threshold (0-255)
    #[arg(long, default_value = "127")]
    threshold: u8,

    /// Hole-filling radius in pixels (7 = 15×15 kernel, 0 = off)
    #[arg(long, default_value = "7")]
    smoothing_radius: u8,

    /// Rotate portrait photos to landscape before measuring
    #[arg(long)]
    landscape: bool,

    /// Skip drawing the overlay
    #[arg(long)]
    no_annotate: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    unit: &'a str,
    objects: &'a [coinmeasure::ObjectMeasurement],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = MeasureConfig {
        threshold: cli.threshold,
        smoothing_radius: cli.smoothing_radius,
        reference_length: cli.reference,
        unit: cli.unit.clone(),
        landscape: cli.landscape,
        annotate: !cli.no_annotate,
        ..MeasureConfig::default()
    };

    // Header
    eprintln!();
    eprintln!("  coinmeasure \u{00b7} {}", cli.image.display());
    eprintln!();

    let image = coinmeasure::load_image(&cli.image)?;
    let segmenter: Box<dyn Segmenter> = match (&cli.mask, &cli.cutout) {
        (Some(mask), _) => Box::new(PrecomputedMask(coinmeasure::load_mask(mask)?)),
        (None, Some(cutout)) => Box::new(AlphaCutout(image::open(cutout)?)),
        (None, None) => return Err("either --mask or --cutout is required".into()),
    };

    let result = coinmeasure::measure(&image, segmenter.as_ref(), &config)?;

    if result.objects.is_empty() {
        eprintln!("  No objects found");
    }
    for (i, obj) in result.objects.iter().enumerate() {
        let tag = if obj.is_reference { "  (reference)" } else { "" };
        eprintln!(
            "  #{:<3} {:.2} x {:.2} {}  area {:.2}  \u{2248} {:.0} coins{}",
            i + 1,
            obj.width,
            obj.height,
            config.unit,
            obj.area,
            obj.reference_count,
            tag,
        );
    }
    if let Some(frame) = result.objects.first().map(|o| o.frame) {
        eprintln!(
            "  Frame {:.2} x {:.2} {}  \u{2248} {:.0} coins",
            frame.frame_width, frame.frame_height, config.unit, frame.frame_reference_count,
        );
    }

    result.annotated.save(&cli.output)?;

    // Footer
    eprintln!();
    eprintln!("  \u{2713} {}", cli.output.display());

    if let Some(json_path) = &cli.json {
        let report = Report { unit: &config.unit, objects: &result.objects };
        std::fs::write(json_path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("  \u{2713} {}", json_path.display());
    }
    eprintln!();

    Ok(())
}
