//! Capture-time pose assessment.
//!
//! Answers "is there a person, and is the whole body in frame?" from a
//! landmark set, so a capture screen can reject a photo before measuring it.
//! Detection here is more lenient than the measurement validity gate:
//! landmarks slightly outside the frame still count as seen.

use serde::{Deserialize, Serialize};

use crate::landmarks::{Landmark, Landmarks};
use crate::types::Point;

/// Minimum detected landmarks to report a person at all.
pub const MIN_LANDMARKS_FOR_PERSON: usize = 10;

const DETECT_MIN: f32 = -0.1;
const DETECT_MAX: f32 = 1.1;
// Undetected landmarks come back at the origin.
const ORIGIN_EPSILON: f32 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseAssessment {
    pub has_person: bool,
    pub is_full_body: bool,
    /// Share of detected landmarks, boosted when the full body is visible
    pub confidence: f32,
    /// Empty on success, otherwise the first missing body region
    pub message: String,
}

impl PoseAssessment {
    fn no_person() -> Self {
        Self {
            has_person: false,
            is_full_body: false,
            confidence: 0.0,
            message: "No person detected".to_string(),
        }
    }
}

fn is_detected(p: Point) -> bool {
    let in_range =
        (DETECT_MIN..=DETECT_MAX).contains(&p.x) && (DETECT_MIN..=DETECT_MAX).contains(&p.y);
    let at_origin = p.x.abs() <= ORIGIN_EPSILON && p.y.abs() <= ORIGIN_EPSILON;
    in_range && !at_origin
}

struct Seen<'a>(&'a Landmarks);

impl Seen<'_> {
    fn has(&self, l: Landmark) -> bool {
        is_detected(self.0.get(l))
    }

    fn any(&self, ls: &[Landmark]) -> bool {
        ls.iter().any(|&l| self.has(l))
    }

    fn all(&self, ls: &[Landmark]) -> bool {
        ls.iter().all(|&l| self.has(l))
    }
}

/// Assess whether `landmarks` show a person with the full body visible.
pub fn assess_pose(landmarks: &Landmarks) -> PoseAssessment {
    use Landmark::*;

    let seen = Seen(landmarks);
    let detected = Landmark::ALL.iter().filter(|&&l| seen.has(l)).count();
    if detected < MIN_LANDMARKS_FOR_PERSON {
        return PoseAssessment::no_person();
    }

    let mut confidence = (detected as f32 / Landmark::COUNT as f32).min(1.0);

    let nose = seen.has(Nose);
    let left_eye = seen.any(&[LeftEyeInner, LeftEye, LeftEyeOuter]);
    let right_eye = seen.any(&[RightEyeInner, RightEye, RightEyeOuter]);
    let ears = seen.any(&[LeftEar, RightEar]);
    let head = nose && (left_eye || right_eye) && ears;

    let shoulders = seen.any(&[LeftShoulder, RightShoulder]);
    let elbows = seen.any(&[LeftElbow, RightElbow]);
    let wrists = seen.any(&[LeftWrist, RightWrist]);
    let upper_body = seen.all(&[
        LeftShoulder,
        RightShoulder,
        LeftElbow,
        RightElbow,
        LeftWrist,
        RightWrist,
    ]);

    let left_hand = seen.has(LeftWrist) && seen.any(&[LeftPinky, LeftIndex, LeftThumb]);
    let right_hand = seen.has(RightWrist) && seen.any(&[RightPinky, RightIndex, RightThumb]);

    let hips = seen.any(&[LeftHip, RightHip]);
    let knees = seen.any(&[LeftKnee, RightKnee]);
    let ankles = seen.any(&[LeftAnkle, RightAnkle]);
    let lower_body = seen.all(&[
        LeftHip,
        RightHip,
        LeftKnee,
        RightKnee,
        LeftAnkle,
        RightAnkle,
    ]);

    let left_foot = seen.has(LeftAnkle) && seen.any(&[LeftHeel, LeftFootIndex]);
    let right_foot = seen.has(RightAnkle) && seen.any(&[RightHeel, RightFootIndex]);

    let message = if !head {
        if !nose {
            "Head not fully visible - nose not detected"
        } else if !left_eye && !right_eye {
            "Face not clearly visible - eyes not detected"
        } else {
            "Head not fully visible - ears not detected"
        }
    } else if !upper_body {
        if !shoulders {
            "Upper body not visible - shoulders not detected"
        } else if !elbows {
            "Arms not fully visible - elbows not detected"
        } else if !wrists {
            "Arms not fully visible - wrists not detected"
        } else {
            "Upper body not fully visible"
        }
    } else if !left_hand {
        "Left hand not fully visible"
    } else if !right_hand {
        "Right hand not fully visible"
    } else if !lower_body {
        if !hips {
            "Lower body not visible - hips not detected"
        } else if !knees {
            "Legs not fully visible - knees not detected"
        } else if !ankles {
            "Legs not fully visible - ankles not detected"
        } else {
            "Lower body not fully visible"
        }
    } else if !left_foot {
        "Left foot not fully visible"
    } else if !right_foot {
        "Right foot not fully visible"
    } else {
        ""
    };

    let is_full_body = message.is_empty();
    if is_full_body {
        confidence = (confidence + 0.2).min(1.0);
    }

    PoseAssessment {
        has_person: true,
        is_full_body,
        confidence,
        message: message.to_string(),
    }
}
