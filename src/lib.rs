//! # body-measure
//!
//! Anthropometric body measurements from a single photograph's 2D pose
//! landmarks and the subject's known height.
//!
//! This crate provides:
//! - **Calibration**: a cm-per-pixel scale from the detected nose-to-foot extent
//! - **Geometric Measurements**: shoulder, hip and neck width, arm and leg
//!   length, upper and lower body length
//! - **Thigh Width**: edge scan over a person segmentation mask, with a
//!   keypoint-only fallback when no usable mask is available
//! - **Validation**: every value is checked against an anatomically plausible range
//! - **Pose Assessment**: person / full-body visibility check for capture screens
//!
//! Pose detection itself is out of scope: landmarks come from an external
//! detector in normalized [0,1] image coordinates. Any coordinate outside
//! that range marks the landmark as not detected.
//!
//! ## Measurement Vector
//!
//! | Slot | Measurement | Range (cm) |
//! |---|---|---|
//! | 0 | shoulder width | 30-60 |
//! | 1 | arm length | 50-80 |
//! | 2 | leg length | 70-120 |
//! | 3 | hip width | 25-50 |
//! | 4 | upper body length | 40-80 |
//! | 5 | lower body length | 60-100 |
//! | 6 | neck width | 8-15 |
//! | 7 | thigh width | 10-75 |
//!
//! A slot holding `0.0` was not computed or was rejected.
//!
//! ## Quick Start
//!
//! ```rust
//! use body_measure::{
//!     measure, ImageFrame, Landmark, Landmarks, MeasurementInput, Point, SegmentationMask,
//! };
//!
//! // Landmarks from a pose detector (unset ones stay "not detected")
//! let mut landmarks = Landmarks::missing();
//! landmarks.set(Landmark::Nose, Point::new(0.5, 0.1));
//! landmarks.set(Landmark::LeftShoulder, Point::new(0.333, 0.22));
//! landmarks.set(Landmark::RightShoulder, Point::new(0.667, 0.22));
//! landmarks.set(Landmark::LeftHeel, Point::new(0.45, 0.92));
//!
//! let frame = ImageFrame::new(1080, 1920);
//! let input = MeasurementInput::new(&landmarks, frame, 175.0);
//! let result = measure(&input);
//! assert!(result.shoulder_width > 30.0 && result.shoulder_width < 60.0);
//! assert_eq!(result.arm_length, 0.0);
//!
//! // With a segmentation mask aligned to the same frame
//! let mask = SegmentationMask::from_fn(1080, 1920, |x, _| {
//!     if (324..756).contains(&x) { 1.0 } else { 0.0 }
//! });
//! let result = measure(&input.with_mask(&mask));
//! println!("{:?}", result.to_array());
//! ```
//!
//! ## Custom Masks
//!
//! Implement the [`MaskAccess`] trait to scan your own mask storage:
//!
//! ```rust
//! use body_measure::MaskAccess;
//!
//! struct MyMask { /* ... */ }
//!
//! impl MaskAccess for MyMask {
//!     fn value(&self, x: i32, y: i32) -> f32 {
//!         // Person probability at (x, y), 0.0 for out-of-bounds
//!         0.0
//!     }
//!     fn width(&self) -> u32 { 1080 }
//!     fn height(&self) -> u32 { 1920 }
//! }
//! ```

mod assessment;
mod calibration;
mod config;
mod engine;
mod error;
mod landmarks;
mod mask;
mod measurements;
mod thigh;
mod types;
mod validate;

pub use assessment::{assess_pose, PoseAssessment, MIN_LANDMARKS_FOR_PERSON};
pub use calibration::{calibrate, ScaleFactor};
pub use config::{EngineConfig, RangeConfig};
pub use engine::{measure, MeasurementEngine, MeasurementInput};
pub use error::{Error, Result};
pub use landmarks::{Landmark, Landmarks, Side, POSE_SLOT_COUNT};
pub use mask::{MaskAccess, SegmentationMask};
pub use measurements::{compute_geometric, BodyMeasurements, Measurement};
pub use thigh::{
    estimate_thighs, HipProportion, LegGeometry, MaskEdgeScan, ThighEstimate, ThighSource,
    ThighWidthStrategy,
};
pub use types::{ImageFrame, Point};
pub use validate::{validate, MeasurementRange};
