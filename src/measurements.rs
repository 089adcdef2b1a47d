//! Body measurements and the keypoint-geometry calculators.
//!
//! Each calculator needs a fixed subset of landmarks and returns `None` when
//! any of them is missing. Distances are taken in normalized coordinates and
//! converted with `distance * reference_px * cm_per_px`, where the reference
//! is the image width for horizontal spans, the height for vertical spans and
//! the longer side for limb paths.

use serde::{Deserialize, Serialize};

use crate::calibration::ScaleFactor;
use crate::landmarks::{Landmark, Landmarks, Side};
use crate::thigh::ThighSource;
use crate::types::ImageFrame;

/// One slot of the measurement vector, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    ShoulderWidth = 0,
    ArmLength = 1,
    LegLength = 2,
    HipWidth = 3,
    UpperBodyLength = 4,
    LowerBodyLength = 5,
    NeckWidth = 6,
    ThighWidth = 7,
}

impl Measurement {
    pub const COUNT: usize = 8;

    pub const ALL: [Measurement; Measurement::COUNT] = [
        Measurement::ShoulderWidth,
        Measurement::ArmLength,
        Measurement::LegLength,
        Measurement::HipWidth,
        Measurement::UpperBodyLength,
        Measurement::LowerBodyLength,
        Measurement::NeckWidth,
        Measurement::ThighWidth,
    ];

    /// The seven measurements derived from keypoint geometry alone.
    pub const GEOMETRIC: [Measurement; 7] = [
        Measurement::ShoulderWidth,
        Measurement::ArmLength,
        Measurement::LegLength,
        Measurement::HipWidth,
        Measurement::UpperBodyLength,
        Measurement::LowerBodyLength,
        Measurement::NeckWidth,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Measurement::ShoulderWidth => "Shoulder width",
            Measurement::ArmLength => "Arm length",
            Measurement::LegLength => "Leg length",
            Measurement::HipWidth => "Hip width",
            Measurement::UpperBodyLength => "Upper body length",
            Measurement::LowerBodyLength => "Lower body length",
            Measurement::NeckWidth => "Neck width",
            Measurement::ThighWidth => "Thigh width",
        }
    }
}

/// Validated body measurements in centimeters.
///
/// A value of `0.0` means the measurement could not be computed or was
/// rejected as implausible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurements {
    /// Shoulder to shoulder (landmarks 11-12)
    pub shoulder_width: f32,
    /// Shoulder-elbow-wrist path, averaged over both arms
    pub arm_length: f32,
    /// Hip-knee-ankle path, averaged over both legs
    pub leg_length: f32,
    /// Hip to hip (landmarks 23-24)
    pub hip_width: f32,
    /// Hip midpoint up to the highest detected landmark
    pub upper_body_length: f32,
    /// Hip midpoint to ankle midpoint
    pub lower_body_length: f32,
    /// Eye to eye (landmarks 2 and 5)
    pub neck_width: f32,
    /// Mid-thigh width, averaged over the legs that produced one
    pub thigh_width: f32,
    /// How `thigh_width` was obtained
    pub thigh_source: ThighSource,
}

impl Default for BodyMeasurements {
    fn default() -> Self {
        Self::zeros()
    }
}

impl BodyMeasurements {
    pub const fn zeros() -> Self {
        Self {
            shoulder_width: 0.0,
            arm_length: 0.0,
            leg_length: 0.0,
            hip_width: 0.0,
            upper_body_length: 0.0,
            lower_body_length: 0.0,
            neck_width: 0.0,
            thigh_width: 0.0,
            thigh_source: ThighSource::Unavailable,
        }
    }

    pub fn get(&self, measurement: Measurement) -> f32 {
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

    pub(crate) fn set(&mut self, measurement: Measurement, value: f32) {
        let slot = match measurement {
            Measurement::ShoulderWidth => &mut self.shoulder_width,
            Measurement::ArmLength => &mut self.arm_length,
            Measurement::LegLength => &mut self.leg_length,
            Measurement::HipWidth => &mut self.hip_width,
            Measurement::UpperBodyLength => &mut self.upper_body_length,
            Measurement::LowerBodyLength => &mut self.lower_body_length,
            Measurement::NeckWidth => &mut self.neck_width,
            Measurement::ThighWidth => &mut self.thigh_width,
        };
        *slot = value;
    }

    /// The fixed-order measurement vector.
    pub fn to_array(&self) -> [f32; Measurement::COUNT] {
        Measurement::ALL.map(|m| self.get(m))
    }

    /// Number of measurements holding a non-zero value.
    pub fn computed_count(&self) -> usize {
        self.to_array().iter().filter(|v| **v != 0.0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.computed_count() == 0
    }
}

impl std::ops::Index<Measurement> for BodyMeasurements {
    type Output = f32;

    fn index(&self, measurement: Measurement) -> &Self::Output {
        match measurement {
            Measurement::ShoulderWidth => &self.shoulder_width,
            Measurement::ArmLength => &self.arm_length,
            Measurement::LegLength => &self.leg_length,
            Measurement::HipWidth => &self.hip_width,
            Measurement::UpperBodyLength => &self.upper_body_length,
            Measurement::LowerBodyLength => &self.lower_body_length,
            Measurement::NeckWidth => &self.neck_width,
            Measurement::ThighWidth => &self.thigh_width,
        }
    }
}

/// Raw (unvalidated) centimeter value of a geometric measurement.
///
/// Returns `None` for [`Measurement::ThighWidth`], which needs the
/// segmentation strategies in [`crate::thigh`].
pub fn compute_geometric(
    measurement: Measurement,
    landmarks: &Landmarks,
    frame: ImageFrame,
    scale: ScaleFactor,
) -> Option<f32> {
    match measurement {
        Measurement::ShoulderWidth => shoulder_width(landmarks, frame, scale),
        Measurement::ArmLength => arm_length(landmarks, frame, scale),
        Measurement::LegLength => leg_length(landmarks, frame, scale),
        Measurement::HipWidth => hip_width(landmarks, frame, scale),
        Measurement::UpperBodyLength => upper_body_length(landmarks, frame, scale),
        Measurement::LowerBodyLength => lower_body_length(landmarks, frame, scale),
        Measurement::NeckWidth => neck_width(landmarks, frame, scale),
        Measurement::ThighWidth => None,
    }
}

pub fn shoulder_width(landmarks: &Landmarks, frame: ImageFrame, scale: ScaleFactor) -> Option<f32> {
    let (l, r) = landmarks.valid_pair(Landmark::LeftShoulder, Landmark::RightShoulder)?;
    Some(scale.to_cm(l.distance(&r) * frame.width_px()))
}

pub fn hip_width(landmarks: &Landmarks, frame: ImageFrame, scale: ScaleFactor) -> Option<f32> {
    let (l, r) = landmarks.valid_pair(Landmark::LeftHip, Landmark::RightHip)?;
    Some(scale.to_cm(l.distance(&r) * frame.width_px()))
}

pub fn neck_width(landmarks: &Landmarks, frame: ImageFrame, scale: ScaleFactor) -> Option<f32> {
    let (l, r) = landmarks.valid_pair(Landmark::LeftEye, Landmark::RightEye)?;
    Some(scale.to_cm(l.distance(&r) * frame.width_px()))
}

pub fn arm_length(landmarks: &Landmarks, frame: ImageFrame, scale: ScaleFactor) -> Option<f32> {
    let left = limb_path(
        landmarks,
        Side::Left.shoulder(),
        Side::Left.elbow(),
        Side::Left.wrist(),
    )?;
    let right = limb_path(
        landmarks,
        Side::Right.shoulder(),
        Side::Right.elbow(),
        Side::Right.wrist(),
    )?;
    Some(scale.to_cm((left + right) / 2.0 * frame.max_side_px()))
}

pub fn leg_length(landmarks: &Landmarks, frame: ImageFrame, scale: ScaleFactor) -> Option<f32> {
    let left = limb_path(
        landmarks,
        Side::Left.hip(),
        Side::Left.knee(),
        Side::Left.ankle(),
    )?;
    let right = limb_path(
        landmarks,
        Side::Right.hip(),
        Side::Right.knee(),
        Side::Right.ankle(),
    )?;
    Some(scale.to_cm((left + right) / 2.0 * frame.max_side_px()))
}

/// Vertical span from the hip midpoint up to the highest detected landmark.
///
/// The sign is kept: a hip midpoint above the highest point yields a negative
/// value, which the range check rejects.
pub fn upper_body_length(
    landmarks: &Landmarks,
    frame: ImageFrame,
    scale: ScaleFactor,
) -> Option<f32> {
    let hips = landmarks.midpoint(Landmark::LeftHip, Landmark::RightHip)?;
    let top_y = landmarks.iter_valid().map(|(_, p)| p.y).reduce(f32::min)?;
    Some(scale.to_cm((hips.y - top_y) * frame.height_px()))
}

pub fn lower_body_length(
    landmarks: &Landmarks,
    frame: ImageFrame,
    scale: ScaleFactor,
) -> Option<f32> {
    let hips = landmarks.midpoint(Landmark::LeftHip, Landmark::RightHip)?;
    let ankles = landmarks.midpoint(Landmark::LeftAnkle, Landmark::RightAnkle)?;
    Some(scale.to_cm(hips.distance(&ankles) * frame.height_px()))
}

/// Normalized length of the two-segment path `a -> b -> c`.
fn limb_path(landmarks: &Landmarks, a: Landmark, b: Landmark, c: Landmark) -> Option<f32> {
    let pa = landmarks.valid(a)?;
    let pb = landmarks.valid(b)?;
    let pc = landmarks.valid(c)?;
    Some(pa.distance(&pb) + pb.distance(&pc))
}
