use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Keypoint file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Subject height {0} cm is outside (0, max]")]
    InvalidHeight(f32),

    #[error("Invalid image frame {width}x{height}")]
    InvalidImageFrame { width: u32, height: u32 },

    #[error("Head reference (nose) not detected")]
    MissingHeadReference,

    #[error("Body extent {0} is not positive")]
    NonPositiveBodyExtent(f32),

    #[error("Mask buffer holds {actual} values, expected {expected}")]
    MaskSize { expected: usize, actual: usize },

    #[error("Pose has {actual} keypoints, need at least {expected}")]
    TooFewKeypoints { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
