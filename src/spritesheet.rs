//! Spritesheet slicing - partitions a grid bitmap into individual frames

use std::num::NonZeroU32;

use image::imageops;
use image::RgbaImage;

/// Slice a spritesheet into `rows * cols` equally sized frames.
///
/// Frames are extracted in row-major order (row 0 col 0, row 0 col 1, ...).
/// Frame dimensions are `width / cols` by `height / rows` using integer
/// division; remainder pixels at the right/bottom edge of a non-divisible
/// sheet are not included in any frame.
///
/// # Arguments
///
/// * `sheet` - The decoded spritesheet image
/// * `rows` - Number of grid rows
/// * `cols` - Number of grid columns
///
/// # Returns
///
/// The extracted frames, all with identical dimensions.
pub fn slice_frames(sheet: &RgbaImage, rows: NonZeroU32, cols: NonZeroU32) -> Vec<RgbaImage> {
    let rows = rows.get();
    let cols = cols.get();
    let frame_w = sheet.width() / cols;
    let frame_h = sheet.height() / rows;

    let mut frames = Vec::with_capacity((rows * cols) as usize);
    for r in 0..rows {
        for c in 0..cols {
            let left = c * frame_w;
            let top = r * frame_h;
            frames.push(imageops::crop_imm(sheet, left, top, frame_w, frame_h).to_image());
        }
    }

    frames
}
