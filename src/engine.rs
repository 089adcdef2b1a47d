//! The measurement engine.
//!
//! One call takes one landmark set plus its image frame, the subject's true
//! height and optionally a segmentation mask, and returns all eight
//! measurements. The engine holds nothing but its configuration, so a single
//! instance can be shared across threads.

use tracing::{debug, warn};

use crate::calibration::{calibrate, ScaleFactor};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::landmarks::Landmarks;
use crate::mask::{MaskAccess, SegmentationMask};
use crate::measurements::{compute_geometric, BodyMeasurements, Measurement};
use crate::thigh::{
    estimate_thighs, HipProportion, MaskEdgeScan, ThighEstimate, ThighWidthStrategy,
};
use crate::types::ImageFrame;
use crate::validate::validate;

/// Inputs of one measurement call.
#[derive(Debug)]
pub struct MeasurementInput<'a, M: MaskAccess = SegmentationMask> {
    pub landmarks: &'a Landmarks,
    /// Dimensions the landmarks were normalized against
    pub frame: ImageFrame,
    /// True subject height in centimeters
    pub height_cm: f32,
    pub mask: Option<&'a M>,
}

impl<'a> MeasurementInput<'a, SegmentationMask> {
    pub fn new(landmarks: &'a Landmarks, frame: ImageFrame, height_cm: f32) -> Self {
        Self {
            landmarks,
            frame,
            height_cm,
            mask: None,
        }
    }
}

impl<'a, M: MaskAccess> MeasurementInput<'a, M> {
    pub fn with_mask<N: MaskAccess>(self, mask: &'a N) -> MeasurementInput<'a, N> {
        MeasurementInput {
            landmarks: self.landmarks,
            frame: self.frame,
            height_cm: self.height_cm,
            mask: Some(mask),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeasurementEngine {
    config: EngineConfig,
}

impl MeasurementEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute all measurements, absorbing every failure.
    ///
    /// Calibration failure yields an all-zero result; any single measurement
    /// that lacks landmarks or falls outside its range is reported as 0.0.
    pub fn measure<M: MaskAccess>(&self, input: &MeasurementInput<'_, M>) -> BodyMeasurements {
        match self.try_measure(input) {
            Ok(measurements) => measurements,
            Err(e) => {
                warn!("calibration failed: {}", e);
                BodyMeasurements::zeros()
            }
        }
    }

    /// Like [`measure`](Self::measure) but surfaces calibration failure.
    pub fn try_measure<M: MaskAccess>(
        &self,
        input: &MeasurementInput<'_, M>,
    ) -> Result<BodyMeasurements> {
        let scale = calibrate(
            input.landmarks,
            input.frame,
            input.height_cm,
            self.config.max_height_cm,
        )?;
        Ok(self.measure_with_scale(input, scale))
    }

    fn measure_with_scale<M: MaskAccess>(
        &self,
        input: &MeasurementInput<'_, M>,
        scale: ScaleFactor,
    ) -> BodyMeasurements {
        let mut out = BodyMeasurements::zeros();

        for kind in Measurement::GEOMETRIC {
            let raw = compute_geometric(kind, input.landmarks, input.frame, scale);
            out.set(kind, self.accept(kind, raw));
        }

        let estimate = self.thighs(input);
        let raw = estimate.width_px().map(|px| scale.to_cm(px));
        out.set(
            Measurement::ThighWidth,
            self.accept(Measurement::ThighWidth, raw),
        );
        if out.thigh_width > 0.0 {
            out.thigh_source = estimate.source;
        }

        out
    }

    fn thighs<M: MaskAccess>(&self, input: &MeasurementInput<'_, M>) -> ThighEstimate {
        let fallback = HipProportion::new(self.config.thigh_expansion_factor);
        let scan = input.mask.and_then(|mask| {
            if mask.matches(input.frame) {
                Some(MaskEdgeScan::new(mask, self.config.mask_threshold))
            } else {
                warn!(
                    "mask is {}x{} but frame is {}x{}, skipping edge scan",
                    mask.width(),
                    mask.height(),
                    input.frame.width,
                    input.frame.height
                );
                None
            }
        });
        let primary = scan.as_ref().map(|s| s as &dyn ThighWidthStrategy);
        estimate_thighs(input.landmarks, input.frame, primary, &fallback)
    }

    fn accept(&self, kind: Measurement, raw: Option<f32>) -> f32 {
        let Some(value) = raw else {
            debug!(measurement = kind.label(), "landmarks missing");
            return 0.0;
        };
        let validated = validate(value, self.config.ranges.get(kind));
        if validated == 0.0 {
            debug!(measurement = kind.label(), value, "rejected as implausible");
        }
        validated
    }
}

/// Measure with the default engine configuration.
pub fn measure<M: MaskAccess>(input: &MeasurementInput<'_, M>) -> BodyMeasurements {
    MeasurementEngine::default().measure(input)
}
