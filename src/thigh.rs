//! Thigh width estimation.
//!
//! Thigh width has no landmark pair of its own. Two strategies measure it
//! per leg at the row halfway between hip and knee:
//!
//! - [`MaskEdgeScan`] walks that row of the segmentation mask to find the
//!   outer and inner edge of the thigh.
//! - [`HipProportion`] scales the hip half-width up by a fixed factor. It is a
//!   coarse surrogate and is only used when the scan is unavailable or fails.
//!
//! Both need both hips (the body centerline is their midpoint) plus the hip
//! and knee of the leg being measured.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::landmarks::{Landmark, Landmarks, Side};
use crate::mask::MaskAccess;
use crate::types::{ImageFrame, Point};

/// How the reported thigh width was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThighSource {
    /// Every contributing leg was measured from the segmentation mask
    MaskScan,
    /// Every contributing leg used the hip-proportion estimate
    HipProportion,
    /// One leg from the mask, the other from the hip-proportion estimate
    Mixed,
    /// No leg could be measured
    Unavailable,
}

/// Landmark geometry of one leg, as consumed by the strategies.
#[derive(Debug, Clone, Copy)]
pub struct LegGeometry {
    pub side: Side,
    pub hip: Point,
    pub knee: Point,
    /// Normalized x of the hip midpoint
    pub center_x: f32,
    pub frame: ImageFrame,
}

impl LegGeometry {
    /// Returns `None` unless both hips and this leg's knee are valid.
    pub fn from_landmarks(landmarks: &Landmarks, side: Side, frame: ImageFrame) -> Option<Self> {
        let center = landmarks.midpoint(Landmark::LeftHip, Landmark::RightHip)?;
        Some(Self {
            side,
            hip: landmarks.valid(side.hip())?,
            knee: landmarks.valid(side.knee())?,
            center_x: center.x,
            frame,
        })
    }

    /// Pixel row halfway between hip and knee.
    pub fn scan_row(&self) -> i32 {
        self.frame.row((self.hip.y + self.knee.y) / 2.0)
    }
}

/// A way of measuring one thigh, in pixels.
pub trait ThighWidthStrategy {
    fn leg_width_px(&self, leg: &LegGeometry) -> Option<f32>;

    fn source(&self) -> ThighSource;
}

/// Edge scan over a segmentation mask aligned with the image frame.
pub struct MaskEdgeScan<'a, M: MaskAccess> {
    mask: &'a M,
    threshold: f32,
}

impl<'a, M: MaskAccess> MaskEdgeScan<'a, M> {
    pub fn new(mask: &'a M, threshold: f32) -> Self {
        Self { mask, threshold }
    }

    fn is_person(&self, x: i32, y: i32) -> bool {
        self.mask.value(x, y) > self.threshold
    }
}

impl<M: MaskAccess> ThighWidthStrategy for MaskEdgeScan<'_, M> {
    fn leg_width_px(&self, leg: &LegGeometry) -> Option<f32> {
        let frame = leg.frame;
        if !self.mask.matches(frame) {
            return None;
        }

        let row = leg.scan_row();
        if row < 0 || row >= frame.height as i32 {
            return None;
        }

        let center = frame.column(leg.center_x);
        let hip = frame.column(leg.hip.x);
        if hip == center {
            return None;
        }

        // Walk away from the centerline toward the hip's side of the image.
        let dir = if hip < center { -1 } else { 1 };
        let max_offset = if dir < 0 {
            center
        } else {
            frame.width as i32 - 1 - center
        };
        let column = |offset: i32| center + dir * offset;

        // Outer edge: first person pixel coming in from the image border.
        let outer = (0..=max_offset)
            .rev()
            .find(|&offset| self.is_person(column(offset), row))?;

        // Inner edge: first person pixel going out from the centerline,
        // no further than twice the centerline-to-hip distance.
        let reach = (2 * (hip - center).abs()).min(max_offset);
        let inner = (0..=reach).find(|&offset| self.is_person(column(offset), row))?;

        (outer > inner).then(|| (outer - inner) as f32)
    }

    fn source(&self) -> ThighSource {
        ThighSource::MaskScan
    }
}

/// Geometry-only estimate: `|hip.x - center.x| * expansion`, doubled.
pub struct HipProportion {
    expansion: f32,
}

impl HipProportion {
    pub fn new(expansion: f32) -> Self {
        Self { expansion }
    }
}

impl ThighWidthStrategy for HipProportion {
    fn leg_width_px(&self, leg: &LegGeometry) -> Option<f32> {
        let half_width = (leg.hip.x - leg.center_x).abs() * self.expansion;
        Some(half_width * 2.0 * leg.frame.width_px())
    }

    fn source(&self) -> ThighSource {
        ThighSource::HipProportion
    }
}

/// Per-leg results and their combination, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ThighEstimate {
    pub left_px: Option<f32>,
    pub right_px: Option<f32>,
    pub source: ThighSource,
}

impl ThighEstimate {
    /// Average of the legs that produced a width.
    pub fn width_px(&self) -> Option<f32> {
        match (self.left_px, self.right_px) {
            (Some(l), Some(r)) => Some((l + r) / 2.0),
            (Some(w), None) | (None, Some(w)) => Some(w),
            (None, None) => None,
        }
    }
}

/// Estimate both thighs, preferring `primary` and falling back per leg.
pub fn estimate_thighs(
    landmarks: &Landmarks,
    frame: ImageFrame,
    primary: Option<&dyn ThighWidthStrategy>,
    fallback: &dyn ThighWidthStrategy,
) -> ThighEstimate {
    let mut widths = [None, None];
    let mut sources = Vec::with_capacity(2);

    for (slot, side) in widths.iter_mut().zip(Side::BOTH) {
        let Some(leg) = LegGeometry::from_landmarks(landmarks, side, frame) else {
            debug!(?side, "thigh landmarks missing");
            continue;
        };

        let measured = primary.and_then(|s| s.leg_width_px(&leg).map(|w| (w, s.source())));
        let measured = measured.or_else(|| {
            if primary.is_some() {
                debug!(?side, "edge scan failed, using hip proportion");
            }
            fallback.leg_width_px(&leg).map(|w| (w, fallback.source()))
        });

        if let Some((width, source)) = measured {
            *slot = Some(width);
            sources.push(source);
        }
    }

    let source = match sources.as_slice() {
        [] => ThighSource::Unavailable,
        [only] => *only,
        [a, b] if a == b => *a,
        _ => ThighSource::Mixed,
    };

    ThighEstimate {
        left_px: widths[0],
        right_px: widths[1],
        source,
    }
}
