use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Background buffer holds {actual} bytes, expected {expected}")]
    BackgroundBuffer { expected: usize, actual: usize },

    #[error("Failed to build text scene: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("PNG encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;
