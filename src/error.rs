//! Font loading errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a font from an atlas image
#[derive(Debug, Error)]
pub enum FontError {
    /// Atlas file could not be read or decoded
    #[error("failed to decode atlas {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Atlas dimensions do not form a 16x16 grid of non-empty cells
    #[error("malformed atlas: {width}x{height} is not divisible into a 16x16 grid")]
    MalformedAtlas { width: u32, height: u32 },
}

pub type FontResult<T> = std::result::Result<T, FontError>;
