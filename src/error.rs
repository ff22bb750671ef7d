//! Error type shared by the library.
//!
//! Interaction problems never show up here; a session that ends ambiguously
//! resolves to `SessionOutcome::Cancelled`. Only caller contract violations and
//! I/O around the host are reported as errors.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("source image must have positive dimensions, got {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error("viewport must have positive dimensions, got {max_width}x{max_height}")]
    InvalidViewport { max_width: u32, max_height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(String),
}
