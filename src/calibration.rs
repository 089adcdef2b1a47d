//! Pixel-to-centimeter calibration from the subject's known height.
//!
//! The detected body extent runs from the nose down to the lowest visible
//! foot landmark. Dividing the true height by that extent in pixels gives a
//! single cm/px ratio shared by every measurement of one call.

use tracing::debug;

use crate::error::{Error, Result};
use crate::landmarks::{Landmark, Landmarks};
use crate::types::ImageFrame;

/// Centimeters per pixel for one image. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f32);

impl ScaleFactor {
    pub fn cm_per_px(self) -> f32 {
        self.0
    }

    /// Convert a length in pixels to centimeters.
    pub fn to_cm(self, pixels: f32) -> f32 {
        pixels * self.0
    }
}

/// Derive the scale factor for `landmarks` detected on `frame`.
///
/// Fails if the nose is not detected, the body extent is not positive, the
/// frame is empty or `height_cm` lies outside `(0, max_height_cm]`.
pub fn calibrate(
    landmarks: &Landmarks,
    frame: ImageFrame,
    height_cm: f32,
    max_height_cm: f32,
) -> Result<ScaleFactor> {
    // NaN fails both comparisons and lands here too.
    if !(height_cm > 0.0 && height_cm <= max_height_cm) {
        return Err(Error::InvalidHeight(height_cm));
    }
    if frame.is_empty() {
        return Err(Error::InvalidImageFrame {
            width: frame.width,
            height: frame.height,
        });
    }

    let head = landmarks
        .valid(Landmark::Nose)
        .ok_or(Error::MissingHeadReference)?;

    // Image y grows downward, so the lowest point has the largest y.
    let foot_y = Landmark::FEET
        .iter()
        .filter_map(|&l| landmarks.valid(l))
        .map(|p| p.y)
        .reduce(f32::max)
        .or_else(|| {
            debug!("no foot landmark detected, using lowest landmark");
            landmarks.iter_valid().map(|(_, p)| p.y).reduce(f32::max)
        })
        .unwrap_or(head.y);

    let extent = foot_y - head.y;
    if extent <= 0.0 {
        return Err(Error::NonPositiveBodyExtent(extent));
    }

    let extent_px = extent * frame.height_px();
    let cm_per_px = height_cm / extent_px;
    if !cm_per_px.is_finite() || cm_per_px <= 0.0 {
        return Err(Error::NonPositiveBodyExtent(extent));
    }

    debug!(extent_px, cm_per_px, "calibrated scale");
    Ok(ScaleFactor(cm_per_px))
}
