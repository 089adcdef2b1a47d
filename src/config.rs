use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::measurements::Measurement;
use crate::validate::MeasurementRange;

/// Tunable constants of the measurement engine.
///
/// `EngineConfig::default()` is the calibrated baseline; a TOML file only
/// needs to list the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper sanity bound on the subject height (cm)
    #[serde(default = "default_max_height_cm")]
    pub max_height_cm: f32,
    /// Mask values strictly above this count as person pixels
    #[serde(default = "default_mask_threshold")]
    pub mask_threshold: f32,
    /// Hip half-width multiplier used by the geometry-only thigh estimate
    #[serde(default = "default_thigh_expansion_factor")]
    pub thigh_expansion_factor: f32,
    #[serde(default)]
    pub ranges: RangeConfig,
}

/// Plausible range per measurement (cm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    #[serde(default = "default_shoulder_width")]
    pub shoulder_width: MeasurementRange,
    #[serde(default = "default_arm_length")]
    pub arm_length: MeasurementRange,
    #[serde(default = "default_leg_length")]
    pub leg_length: MeasurementRange,
    #[serde(default = "default_hip_width")]
    pub hip_width: MeasurementRange,
    #[serde(default = "default_upper_body_length")]
    pub upper_body_length: MeasurementRange,
    #[serde(default = "default_lower_body_length")]
    pub lower_body_length: MeasurementRange,
    #[serde(default = "default_neck_width")]
    pub neck_width: MeasurementRange,
    #[serde(default = "default_thigh_width")]
    pub thigh_width: MeasurementRange,
}

fn default_max_height_cm() -> f32 {
    300.0
}

fn default_mask_threshold() -> f32 {
    0.5
}

fn default_thigh_expansion_factor() -> f32 {
    1.5
}

fn default_shoulder_width() -> MeasurementRange {
    MeasurementRange::new(30.0, 60.0)
}

fn default_arm_length() -> MeasurementRange {
    MeasurementRange::new(50.0, 80.0)
}

fn default_leg_length() -> MeasurementRange {
    MeasurementRange::new(70.0, 120.0)
}

fn default_hip_width() -> MeasurementRange {
    MeasurementRange::new(25.0, 50.0)
}

fn default_upper_body_length() -> MeasurementRange {
    MeasurementRange::new(40.0, 80.0)
}

fn default_lower_body_length() -> MeasurementRange {
    MeasurementRange::new(60.0, 100.0)
}

fn default_neck_width() -> MeasurementRange {
    MeasurementRange::new(8.0, 15.0)
}

// Wide enough to admit the hip-proportion fallback (1.5x a 50 cm hip).
fn default_thigh_width() -> MeasurementRange {
    MeasurementRange::new(10.0, 75.0)
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            shoulder_width: default_shoulder_width(),
            arm_length: default_arm_length(),
            leg_length: default_leg_length(),
            hip_width: default_hip_width(),
            upper_body_length: default_upper_body_length(),
            lower_body_length: default_lower_body_length(),
            neck_width: default_neck_width(),
            thigh_width: default_thigh_width(),
        }
    }
}

impl RangeConfig {
    pub fn get(&self, measurement: Measurement) -> MeasurementRange {
        match measurement {
            Measurement::ShoulderWidth => self.shoulder_width,
            Measurement::ArmLength => self.arm_length,
            Measurement::LegLength => self.leg_length,
            Measurement::HipWidth => self.hip_width,
            Measurement::UpperBodyLength => self.upper_body_length,
            Measurement::LowerBodyLength => self.lower_body_length,
            Measurement::NeckWidth => self.neck_width,
            Measurement::ThighWidth => self.thigh_width,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_height_cm: default_max_height_cm(),
            mask_threshold: default_mask_threshold(),
            thigh_expansion_factor: default_thigh_expansion_factor(),
            ranges: RangeConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config)
    }
}
