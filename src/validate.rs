use serde::{Deserialize, Serialize};

/// Inclusive plausible range for one measurement, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRange {
    pub min: f32,
    pub max: f32,
}

impl MeasurementRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Pass `value` through if it is finite and inside `range`, otherwise 0.0.
///
/// Every measurement goes through here before it is reported.
pub fn validate(value: f32, range: MeasurementRange) -> f32 {
    if value.is_finite() && range.contains(value) {
        value
    } else {
        0.0
    }
}
