use serde::{Deserialize, Serialize};

/// A 2D point in image-normalized coordinates.
///
/// Detected landmarks lie in [0,1] on both axes; anything else (including
/// the `-1.0` sentinel some detectors emit) means "not detected".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The "not detected" sentinel.
    pub const fn missing() -> Self {
        Self { x: -1.0, y: -1.0 }
    }

    /// True iff both coordinates lie in [0,1] inclusive. NaN is never valid.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Arithmetic mean of two points.
    pub fn midpoint(&self, other: &Point) -> Point {
        (*self + *other) * 0.5
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Pixel dimensions of the image the landmarks were normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
}

impl ImageFrame {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn width_px(&self) -> f32 {
        self.width as f32
    }

    pub fn height_px(&self) -> f32 {
        self.height as f32
    }

    /// Reference length for diagonal and path measurements.
    pub fn max_side_px(&self) -> f32 {
        self.width.max(self.height) as f32
    }

    /// Convert a normalized x coordinate to a pixel column (truncating).
    pub fn column(&self, x: f32) -> i32 {
        (x * self.width_px()) as i32
    }

    /// Convert a normalized y coordinate to a pixel row (truncating).
    pub fn row(&self, y: f32) -> i32 {
        (y * self.height_px()) as i32
    }
}
