//! Frame scaling and PNG export

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// GIF encoding error
    #[error("GIF error: {0}")]
    Encode(#[from] gif::EncodingError),
    /// The animation has no frames to encode
    #[error("animation has no frames")]
    EmptyAnimation,
    /// A frame collapsed to zero width or height (e.g. from a tiny scale factor)
    #[error("frame {index} has zero-sized dimensions ({width}x{height})")]
    ZeroDimension {
        /// Index of the offending frame in the sequence
        index: usize,
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
    },
    /// Frame dimensions exceed what the GIF format can address
    #[error("frame dimensions {0}x{1} exceed the GIF limit of 65535")]
    TooLarge(u32, u32),
}

/// Scale every frame by a uniform factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for sprite art. A factor of exactly 1.0
/// returns the input unchanged. New dimensions truncate toward zero
/// (`trunc(w * factor)`), so small factors can collapse frames to zero size;
/// the scaler does not reject those, the GIF encoder does when asked to
/// write them.
pub fn scale_frames(frames: Vec<RgbaImage>, factor: f32) -> Vec<RgbaImage> {
    if factor == 1.0 {
        return frames;
    }

    frames
        .into_iter()
        .map(|frame| {
            let new_w = (frame.width() as f32 * factor) as u32;
            let new_h = (frame.height() as f32 * factor) as u32;
            image::imageops::resize(&frame, new_w, new_h, FilterType::Nearest)
        })
        .collect()
}

/// Save an RGBA image to a PNG file.
///
/// Creates parent directories if they don't exist.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Write every frame as a zero-padded numbered PNG inside `dir`.
///
/// Files are named `000.png`, `001.png`, ... in sequence order. The
/// directory is created if it does not exist.
///
/// # Returns
///
/// The paths written, in frame order.
pub fn save_frames(frames: &[RgbaImage], dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("{:03}.png", i));
        frame.save(&path)?;
        paths.push(path);
    }

    Ok(paths)
}
