//! Named pose landmarks.
//!
//! The pose detector emits a fixed 135-slot keypoint array of which only the
//! first 33 slots carry anatomical meaning. [`Landmarks`] holds exactly those
//! 33 points and is indexed by [`Landmark`] instead of raw positions.

use crate::error::{Error, Result};
use crate::types::Point;

/// Slot count of the detector's full keypoint output.
pub const POSE_SLOT_COUNT: usize = 135;

/// The 33 anatomical landmarks, in detector slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Landmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Landmark {
    pub const COUNT: usize = 33;

    pub const ALL: [Landmark; Landmark::COUNT] = [
        Landmark::Nose,
        Landmark::LeftEyeInner,
        Landmark::LeftEye,
        Landmark::LeftEyeOuter,
        Landmark::RightEyeInner,
        Landmark::RightEye,
        Landmark::RightEyeOuter,
        Landmark::LeftEar,
        Landmark::RightEar,
        Landmark::MouthLeft,
        Landmark::MouthRight,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftPinky,
        Landmark::RightPinky,
        Landmark::LeftIndex,
        Landmark::RightIndex,
        Landmark::LeftThumb,
        Landmark::RightThumb,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
        Landmark::LeftHeel,
        Landmark::RightHeel,
        Landmark::LeftFootIndex,
        Landmark::RightFootIndex,
    ];

    /// Ankle, heel and foot-index landmarks of both feet.
    pub const FEET: [Landmark; 6] = [
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
        Landmark::LeftHeel,
        Landmark::RightHeel,
        Landmark::LeftFootIndex,
        Landmark::RightFootIndex,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Body side, from the subject's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn shoulder(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftShoulder,
            Side::Right => Landmark::RightShoulder,
        }
    }

    pub fn elbow(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftElbow,
            Side::Right => Landmark::RightElbow,
        }
    }

    pub fn wrist(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftWrist,
            Side::Right => Landmark::RightWrist,
        }
    }

    pub fn hip(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftHip,
            Side::Right => Landmark::RightHip,
        }
    }

    pub fn knee(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftKnee,
            Side::Right => Landmark::RightKnee,
        }
    }

    pub fn ankle(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftAnkle,
            Side::Right => Landmark::RightAnkle,
        }
    }
}

/// The 33 anatomical landmarks of one detected pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    points: [Point; Landmark::COUNT],
}

impl Landmarks {
    pub fn new(points: [Point; Landmark::COUNT]) -> Self {
        Self { points }
    }

    /// A pose with every landmark set to the "not detected" sentinel.
    pub fn missing() -> Self {
        Self {
            points: [Point::missing(); Landmark::COUNT],
        }
    }

    /// Build from the detector's slot array (typically 135 entries).
    ///
    /// Slots past the 33 anatomical landmarks are ignored.
    pub fn from_slots(slots: &[Point]) -> Result<Self> {
        if slots.len() < Landmark::COUNT {
            return Err(Error::TooFewKeypoints {
                expected: Landmark::COUNT,
                actual: slots.len(),
            });
        }
        let mut points = [Point::missing(); Landmark::COUNT];
        points.copy_from_slice(&slots[..Landmark::COUNT]);
        Ok(Self { points })
    }

    pub fn get(&self, landmark: Landmark) -> Point {
        self.points[landmark.index()]
    }

    pub fn set(&mut self, landmark: Landmark, point: Point) {
        self.points[landmark.index()] = point;
    }

    /// The landmark if it passes the validity gate.
    pub fn valid(&self, landmark: Landmark) -> Option<Point> {
        let p = self.get(landmark);
        p.is_valid().then_some(p)
    }

    /// Both landmarks, only if both are valid.
    pub fn valid_pair(&self, a: Landmark, b: Landmark) -> Option<(Point, Point)> {
        Some((self.valid(a)?, self.valid(b)?))
    }

    /// Midpoint of two landmarks, only if both are valid.
    pub fn midpoint(&self, a: Landmark, b: Landmark) -> Option<Point> {
        let (pa, pb) = self.valid_pair(a, b)?;
        Some(pa.midpoint(&pb))
    }

    pub fn iter_valid(&self) -> impl Iterator<Item = (Landmark, Point)> + '_ {
        Landmark::ALL
            .iter()
            .map(move |&l| (l, self.get(l)))
            .filter(|(_, p)| p.is_valid())
    }

    pub fn valid_count(&self) -> usize {
        self.iter_valid().count()
    }

    pub fn points(&self) -> &[Point; Landmark::COUNT] {
        &self.points
    }
}

impl Default for Landmarks {
    fn default() -> Self {
        Self::missing()
    }
}

impl std::ops::Index<Landmark> for Landmarks {
    type Output = Point;

    fn index(&self, landmark: Landmark) -> &Self::Output {
        &self.points[landmark.index()]
    }
}
