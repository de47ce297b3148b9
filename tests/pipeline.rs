//! End-to-end pipeline tests: slice, scale, order, encode, decode back.

use std::fs::File;
use std::num::NonZeroU32;

use gif::{ColorOutput, DecodeOptions, DisposalMethod};
use image::{Rgba, RgbaImage};
use tempfile::tempdir;

use spritegif::gif::{render_gif, GifParams};
use spritegif::output::scale_frames;
use spritegif::sequence::build_sequence;
use spritegif::spritesheet::slice_frames;

fn nz(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap()
}

/// Distinct, well-separated solid color for grid cell (r, c) of a 4x4 sheet.
fn cell_color(r: u32, c: u32) -> Rgba<u8> {
    Rgba([(r * 60 + 15) as u8, (c * 60 + 15) as u8, 40, 255])
}

/// A 256x256 sheet of 4x4 solid-colored 64x64 cells.
fn make_sheet() -> RgbaImage {
    let mut sheet = RgbaImage::new(256, 256);
    for (x, y, pixel) in sheet.enumerate_pixels_mut() {
        *pixel = cell_color(y / 64, x / 64);
    }
    sheet
}

/// GIF palette quantization is allowed a little slack on solid colors.
fn assert_color_close(actual: &[u8], expected: Rgba<u8>) {
    for i in 0..3 {
        let diff = (actual[i] as i16 - expected[i] as i16).abs();
        assert!(diff <= 8, "channel {} off by {}: {:?} vs {:?}", i, diff, actual, expected);
    }
}

fn decode_frames(path: &std::path::Path) -> Vec<gif::Frame<'static>> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);
    let mut decoder = options.read_info(File::open(path).unwrap()).unwrap();

    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        frames.push(frame.clone());
    }
    frames
}

/// Netscape application extension loop field of an encoded GIF.
fn read_loop_field(path: &std::path::Path) -> u16 {
    let bytes = std::fs::read(path).unwrap();
    let marker = b"NETSCAPE2.0";
    let pos = bytes
        .windows(marker.len())
        .position(|w| w == marker)
        .expect("netscape extension present");
    assert_eq!(bytes[pos + 11], 0x03);
    assert_eq!(bytes[pos + 12], 0x01);
    u16::from_le_bytes([bytes[pos + 13], bytes[pos + 14]])
}

#[test]
fn slicing_a_256_grid_covers_the_expected_rects() {
    let sheet = make_sheet();
    let frames = slice_frames(&sheet, nz(4), nz(4));

    assert_eq!(frames.len(), 16);
    for frame in &frames {
        assert_eq!(frame.dimensions(), (64, 64));
    }

    // Frame 0 covers (0,0)-(64,64); frame 15 covers (192,192)-(256,256)
    assert_eq!(*frames[0].get_pixel(0, 0), cell_color(0, 0));
    assert_eq!(*frames[0].get_pixel(63, 63), cell_color(0, 0));
    assert_eq!(*frames[15].get_pixel(0, 0), cell_color(3, 3));
    assert_eq!(*frames[15].get_pixel(63, 63), cell_color(3, 3));
}

#[test]
fn full_pipeline_produces_a_sixteen_frame_gif() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("walk.gif");

    let sheet = make_sheet();
    let frames = slice_frames(&sheet, nz(4), nz(4));
    let frames = scale_frames(frames, 1.0);
    let sequence = build_sequence(frames, false, false);

    render_gif(&sequence, &GifParams::default(), &path).unwrap();

    let decoded = decode_frames(&path);
    assert_eq!(decoded.len(), 16);
    for frame in &decoded {
        assert_eq!((frame.width, frame.height), (64, 64));
        assert_eq!(frame.delay, 8); // 80ms in centiseconds
        assert_eq!(frame.dispose, DisposalMethod::Background);
    }

    // Row-major order survives the round trip
    assert_color_close(&decoded[0].buffer[0..4], cell_color(0, 0));
    assert_color_close(&decoded[1].buffer[0..4], cell_color(0, 1));
    assert_color_close(&decoded[15].buffer[0..4], cell_color(3, 3));
}

#[test]
fn pingpong_pipeline_appends_mirrored_tail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pingpong.gif");

    let sheet = make_sheet();
    let frames = slice_frames(&sheet, nz(4), nz(4));
    let sequence = build_sequence(frames, false, true);

    // 16 forward + 14 interior frames on the way back
    assert_eq!(sequence.len(), 30);

    render_gif(&sequence, &GifParams::default(), &path).unwrap();
    let decoded = decode_frames(&path);
    assert_eq!(decoded.len(), 30);

    // The frame after the last forward frame is its predecessor
    assert_color_close(&decoded[16].buffer[0..4], cell_color(3, 2));
    // The tail ends one short of the first frame
    assert_color_close(&decoded[29].buffer[0..4], cell_color(0, 1));
}

#[test]
fn reverse_pipeline_flips_frame_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reverse.gif");

    let sheet = make_sheet();
    let frames = slice_frames(&sheet, nz(4), nz(4));
    let sequence = build_sequence(frames, true, false);

    render_gif(&sequence, &GifParams::default(), &path).unwrap();
    let decoded = decode_frames(&path);

    assert_eq!(decoded.len(), 16);
    assert_color_close(&decoded[0].buffer[0..4], cell_color(3, 3));
    assert_color_close(&decoded[15].buffer[0..4], cell_color(0, 0));
}

#[test]
fn scaled_pipeline_shrinks_frames() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scaled.gif");

    let sheet = make_sheet();
    let frames = slice_frames(&sheet, nz(4), nz(4));
    let frames = scale_frames(frames, 0.5);
    let sequence = build_sequence(frames, false, false);

    render_gif(&sequence, &GifParams::default(), &path).unwrap();
    let decoded = decode_frames(&path);

    assert_eq!(decoded.len(), 16);
    for frame in &decoded {
        assert_eq!((frame.width, frame.height), (32, 32));
    }
}

#[test]
fn loop_zero_round_trips_as_infinite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("infinite.gif");

    let frames = vec![
        RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])),
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])),
    ];

    let params = GifParams { loop_count: 0, ..GifParams::default() };
    render_gif(&frames, &params, &path).unwrap();

    // An infinite repeat is written as a loop field of 0
    assert_eq!(read_loop_field(&path), 0);
}

#[test]
fn finite_loop_count_round_trips_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("finite.gif");

    let frames = vec![
        RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])),
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])),
    ];

    let params = GifParams { loop_count: 5, ..GifParams::default() };
    render_gif(&frames, &params, &path).unwrap();

    assert_eq!(read_loop_field(&path), 5);
}

#[test]
fn truncating_grid_drops_edge_pixels_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truncated.gif");

    // 100x100 sheet in a 3x3 grid: 33x33 frames, the last pixel row and
    // column of the sheet belong to no frame.
    let sheet = RgbaImage::from_pixel(100, 100, Rgba([200, 100, 50, 255]));
    let frames = slice_frames(&sheet, nz(3), nz(3));
    assert_eq!(frames.len(), 9);

    render_gif(&frames, &GifParams::default(), &path).unwrap();
    let decoded = decode_frames(&path);

    assert_eq!(decoded.len(), 9);
    for frame in &decoded {
        assert_eq!((frame.width, frame.height), (33, 33));
    }
}
