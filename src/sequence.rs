//! Frame sequence ordering - reversal and ping-pong augmentation

use image::RgbaImage;

/// Build the final animation order from a list of frames.
///
/// `reverse` flips the whole sequence first. `pingpong` then appends a
/// mirrored tail that walks back through the interior of the (possibly
/// reversed) sequence, reusing the existing first and last frames as
/// turning points rather than re-emitting them: on replay the loop returns
/// to the first frame naturally, so `[f0,f1,f2,f3]` becomes
/// `[f0,f1,f2,f3,f2,f1]`.
///
/// Sequences of two or fewer frames have no interior to walk; the tail is
/// the full reverse of the sequence in that case, so `[f0,f1]` becomes
/// `[f0,f1,f1,f0]`.
pub fn build_sequence(mut frames: Vec<RgbaImage>, reverse: bool, pingpong: bool) -> Vec<RgbaImage> {
    if reverse {
        frames.reverse();
    }

    if pingpong {
        let tail: Vec<RgbaImage> = if frames.len() > 2 {
            frames[1..frames.len() - 1].iter().rev().cloned().collect()
        } else {
            frames.iter().rev().cloned().collect()
        };
        frames.extend(tail);
    }

    frames
}
