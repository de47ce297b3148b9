//! GIF animation encoding

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::RgbaImage;

use crate::output::OutputError;

/// Palette quantization effort when size optimization is enabled.
/// Lower is slower and produces a better palette (valid range 1-30).
const SPEED_OPTIMIZED: i32 = 10;
/// Palette quantization effort when size optimization is disabled.
const SPEED_FAST: i32 = 30;

/// Animation parameters applied uniformly to every frame.
#[derive(Debug, Clone, Copy)]
pub struct GifParams {
    /// Duration per frame in milliseconds
    pub duration_ms: u32,
    /// Number of times the animation repeats; 0 repeats forever
    pub loop_count: u16,
    /// Spend more effort on palette quantization to shrink the output
    pub optimize: bool,
}

impl Default for GifParams {
    fn default() -> Self {
        Self { duration_ms: 80, loop_count: 0, optimize: true }
    }
}

/// Encode an ordered sequence of frames as an animated GIF.
///
/// The first frame's dimensions define the logical screen; every frame is
/// written full-size at offset (0,0) with a uniform delay. Frames are
/// disposed by restoring to the background color, so transparent regions do
/// not accumulate pixels from earlier frames. A loop count of 0 writes an
/// infinite repeat.
///
/// # Arguments
///
/// * `frames` - The image frames to include in the animation
/// * `params` - Per-frame duration, loop count, and optimization toggle
/// * `path` - Output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(OutputError)` if the sequence is empty, any frame has zero or
///   oversized dimensions, or the file cannot be written. Validation runs
///   before the output file is created.
pub fn render_gif(frames: &[RgbaImage], params: &GifParams, path: &Path) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Err(OutputError::EmptyAnimation);
    }
    for (index, frame) in frames.iter().enumerate() {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(OutputError::ZeroDimension {
                index,
                width: frame.width(),
                height: frame.height(),
            });
        }
    }

    let (width, height) = frames[0].dimensions();
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(OutputError::TooLarge(width, height));
    }

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = Encoder::new(writer, width as u16, height as u16, &[])?;

    let repeat = if params.loop_count == 0 {
        Repeat::Infinite
    } else {
        Repeat::Finite(params.loop_count)
    };
    encoder.set_repeat(repeat)?;

    // GIF stores delays in centiseconds (1/100th of a second)
    let delay_cs = (params.duration_ms / 10).clamp(1, u16::MAX as u32) as u16;
    let speed = if params.optimize { SPEED_OPTIMIZED } else { SPEED_FAST };

    for rgba_image in frames {
        let mut pixels = rgba_image.as_raw().clone();
        let mut frame = Frame::from_rgba_speed(width as u16, height as u16, &mut pixels, speed);
        frame.delay = delay_cs;
        frame.dispose = DisposalMethod::Background;
        encoder.write_frame(&frame)?;
    }

    Ok(())
}
