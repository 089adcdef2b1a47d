//! CLI application for body measurements from pose keypoints.
//!
//! Usage:
//!   body-measure pose.json --height-cm 175                  # Human-readable output
//!   body-measure pose.json --height-cm 175 --mask mask.png  # Thigh width from mask
//!   body-measure pose.json --height-cm 175 --json           # JSON output
//!   body-measure pose.json --height-cm 175 -o result.json   # Save to file
//!
//! The keypoint file holds the detector output in normalized coordinates:
//!
//! ```json
//! { "image_width": 1080, "image_height": 1920, "keypoints": [[0.5, 0.1], ...] }
//! ```

use std::path::{Path, PathBuf};

use body_measure::{
    assess_pose, BodyMeasurements, EngineConfig, ImageFrame, Landmarks, Measurement,
    MeasurementEngine, MeasurementInput, Point, PoseAssessment, SegmentationMask, ThighSource,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "body-measure")]
#[command(author, version, about = "Body measurements from pose keypoints", long_about = None)]
struct Args {
    /// Keypoint file (JSON)
    #[arg(required = true)]
    keypoints: PathBuf,

    /// True subject height in centimeters
    #[arg(long)]
    height_cm: f32,

    /// Person segmentation mask (grayscale image, same size as the frame)
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Engine config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also report person / full-body visibility
    #[arg(long)]
    assess: bool,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Deserialize)]
struct KeypointFile {
    image_width: u32,
    image_height: u32,
    keypoints: Vec<[f32; 2]>,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    keypoints: String,
    width: u32,
    height: u32,
    height_cm: f32,
    mask: Option<String>,
    measurements: BodyMeasurements,
    /// Fixed-order vector, slots as in `Measurement`
    vector: [f32; Measurement::COUNT],
    #[serde(skip_serializing_if = "Option::is_none")]
    assessment: Option<PoseAssessment>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    let engine = MeasurementEngine::new(config);

    tracing::info!("Loading keypoints: {}", args.keypoints.display());
    let file: KeypointFile = serde_json::from_str(&std::fs::read_to_string(&args.keypoints)?)?;
    let to_point = |&[x, y]: &[f32; 2]| Point::new(x, y);
    let slots: Vec<Point> = file.keypoints.iter().map(to_point).collect();
    let landmarks = Landmarks::from_slots(&slots)?;
    let frame = ImageFrame::new(file.image_width, file.image_height);
    tracing::info!(
        "Frame {}x{}, {} valid landmarks",
        frame.width,
        frame.height,
        landmarks.valid_count()
    );

    let mask = match &args.mask {
        Some(path) => Some(load_mask(path)?),
        None => None,
    };

    let input = MeasurementInput::new(&landmarks, frame, args.height_cm);
    let measurements = match &mask {
        Some(mask) => engine.measure(&input.with_mask(mask)),
        None => engine.measure(&input),
    };
    tracing::info!(
        "{} of {} measurements computed",
        measurements.computed_count(),
        Measurement::COUNT
    );

    let output = Output {
        keypoints: args.keypoints.display().to_string(),
        width: frame.width,
        height: frame.height,
        height_cm: args.height_cm,
        mask: args.mask.as_ref().map(|p| p.display().to_string()),
        vector: measurements.to_array(),
        measurements,
        assessment: args.assess.then(|| assess_pose(&landmarks)),
    };

    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        tracing::info!("Output written to {}", path.display());
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn load_mask(path: &Path) -> Result<SegmentationMask, Box<dyn std::error::Error>> {
    tracing::info!("Loading mask: {}", path.display());
    let img = image::open(path)?.to_luma8();
    let (width, height) = img.dimensions();
    Ok(SegmentationMask::from_luma(img.as_raw(), width, height)?)
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!(
        "Keypoints: {} ({}x{})\n",
        output.keypoints, output.width, output.height
    ));
    s.push_str(&format!("Subject height: {:.1} cm\n", output.height_cm));
    if let Some(ref mask) = output.mask {
        s.push_str(&format!("Mask: {}\n", mask));
    }

    let m = &output.measurements;
    if m.is_empty() {
        s.push_str("\nNo measurements (calibration failed or no usable landmarks).\n");
    } else {
        s.push_str("\nMeasurements:\n");
        for kind in Measurement::ALL {
            let value = m.get(kind);
            if value > 0.0 {
                s.push_str(&format!("  {:<18} {:>6.1} cm\n", kind.label(), value));
            } else {
                s.push_str(&format!("  {:<18} {:>6}\n", kind.label(), "-"));
            }
        }
        let source = match m.thigh_source {
            ThighSource::MaskScan => "mask edge scan",
            ThighSource::HipProportion => "hip proportion estimate (low confidence)",
            ThighSource::Mixed => "mask scan + hip proportion estimate",
            ThighSource::Unavailable => "unavailable",
        };
        s.push_str(&format!("  Thigh source: {}\n", source));
    }

    if let Some(ref a) = output.assessment {
        s.push_str("\nPose:\n");
        s.push_str(&format!("  Person detected: {}\n", a.has_person));
        s.push_str(&format!("  Full body:       {}\n", a.is_full_body));
        s.push_str(&format!(
            "  Confidence:      {:.0}%\n",
            a.confidence * 100.0
        ));
        if !a.message.is_empty() {
            s.push_str(&format!("  {}\n", a.message));
        }
    }

    s
}
