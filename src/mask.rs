use crate::error::{Error, Result};
use crate::types::ImageFrame;

/// Trait for reading per-pixel person probabilities from a segmentation mask.
pub trait MaskAccess {
    /// Person probability at (x, y) in [0,1]. Returns 0.0 for out-of-bounds pixels.
    fn value(&self, x: i32, y: i32) -> f32;

    /// Mask dimensions.
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// True if the mask is pixel-aligned with `frame`.
    fn matches(&self, frame: ImageFrame) -> bool {
        self.width() == frame.width && self.height() == frame.height
    }
}

/// A row-major buffer of person probabilities implementing [`MaskAccess`].
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationMask {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl SegmentationMask {
    pub fn new(data: Vec<f32>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::MaskSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> f32,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Build from 8-bit coverage values, mapping 0..=255 onto [0,1].
    pub fn from_luma(data: &[u8], width: u32, height: u32) -> Result<Self> {
        let values = data.iter().map(|&v| v as f32 / 255.0).collect();
        Self::new(values, width, height)
    }
}

impl MaskAccess for SegmentationMask {
    fn value(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0.0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
