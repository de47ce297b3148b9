//! Command-line interface implementation

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::config::{load_config, SpritegifConfig};
use crate::gif::{render_gif, GifParams};
use crate::output::{save_frames, scale_frames};
use crate::sequence::build_sequence;
use crate::spritesheet::slice_frames;

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Built-in defaults, used when neither the CLI nor spritegif.toml provides
/// a value.
const DEFAULT_ROWS: u32 = 4;
const DEFAULT_COLS: u32 = 4;
const DEFAULT_DURATION_MS: u32 = 80;
const DEFAULT_LOOP_COUNT: u16 = 0;
const DEFAULT_SCALE: f32 = 1.0;

/// Spritegif - Convert a spritesheet (rows x cols) into an animated GIF
#[derive(Parser)]
#[command(name = "spritegif")]
#[command(about = "Convert a spritesheet (rows x cols) into an animated GIF")]
#[command(version)]
pub struct Cli {
    /// Path to the spritesheet image
    pub input: PathBuf,

    /// Output GIF path
    pub output: PathBuf,

    /// Number of grid rows [default: 4]
    #[arg(long)]
    pub rows: Option<NonZeroU32>,

    /// Number of grid columns [default: 4]
    #[arg(long)]
    pub cols: Option<NonZeroU32>,

    /// Frame duration in milliseconds [default: 80]
    #[arg(long)]
    pub duration: Option<u32>,

    /// GIF loop count, 0 for infinite [default: 0]
    #[arg(long = "loop")]
    pub loop_count: Option<u16>,

    /// Play frames in reverse order
    #[arg(long)]
    pub reverse: bool,

    /// Play forward then backward
    #[arg(long)]
    pub pingpong: bool,

    /// Scale factor for frames, nearest-neighbor [default: 1.0]
    #[arg(long, allow_hyphen_values = true)]
    pub scale: Option<f32>,

    /// Disable GIF size optimization
    #[arg(long)]
    pub no_optimize: bool,

    /// Config file to use instead of discovering spritegif.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write each final frame as a numbered PNG in this directory
    #[arg(long)]
    pub frames_dir: Option<PathBuf>,

    /// Print a JSON summary to stdout on success
    #[arg(long)]
    pub json: bool,
}

/// Fully resolved conversion settings: CLI over config over built-ins.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Settings {
    rows: NonZeroU32,
    cols: NonZeroU32,
    duration_ms: u32,
    loop_count: u16,
    scale: f32,
    optimize: bool,
}

/// Resolve each setting from the CLI argument, the config default, or the
/// built-in default, in that order of precedence.
fn resolve_settings(cli: &Cli, config: &SpritegifConfig) -> Result<Settings, String> {
    let defaults = &config.defaults;

    let rows = match cli.rows {
        Some(rows) => rows,
        None => NonZeroU32::new(defaults.rows.unwrap_or(DEFAULT_ROWS))
            .ok_or("rows must be at least 1")?,
    };
    let cols = match cli.cols {
        Some(cols) => cols,
        None => NonZeroU32::new(defaults.cols.unwrap_or(DEFAULT_COLS))
            .ok_or("cols must be at least 1")?,
    };

    let scale = cli.scale.or(defaults.scale).unwrap_or(DEFAULT_SCALE);
    if scale <= 0.0 || scale.is_nan() {
        return Err(format!("scale must be greater than 0, got {}", scale));
    }

    let optimize = if cli.no_optimize { false } else { defaults.optimize.unwrap_or(true) };

    Ok(Settings {
        rows,
        cols,
        duration_ms: cli.duration.or(defaults.duration).unwrap_or(DEFAULT_DURATION_MS),
        loop_count: cli.loop_count.or(defaults.loop_count).unwrap_or(DEFAULT_LOOP_COUNT),
        scale,
        optimize,
    })
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    run_convert(&cli)
}

/// Execute the conversion pipeline: decode, slice, scale, order, encode.
fn run_convert(cli: &Cli) -> ExitCode {
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let settings = match resolve_settings(cli, &config) {
        Ok(settings) => settings,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let sheet = match image::open(&cli.input) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            eprintln!("Error: Cannot open input image '{}': {}", cli.input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let frames = slice_frames(&sheet, settings.rows, settings.cols);
    let frames = scale_frames(frames, settings.scale);
    let sequence = build_sequence(frames, cli.reverse, cli.pingpong);

    if sequence.is_empty() {
        eprintln!("Error: No frames produced");
        return ExitCode::from(EXIT_ERROR);
    }

    if let Some(dir) = &cli.frames_dir {
        if let Err(e) = save_frames(&sequence, dir) {
            eprintln!("Error: Failed to write frames to '{}': {}", dir.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let params = GifParams {
        duration_ms: settings.duration_ms,
        loop_count: settings.loop_count,
        optimize: settings.optimize,
    };
    if let Err(e) = render_gif(&sequence, &params, &cli.output) {
        eprintln!("Error: Failed to save GIF '{}': {}", cli.output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    let (frame_w, frame_h) = sequence[0].dimensions();
    if cli.json {
        let summary = serde_json::json!({
            "output": cli.output.display().to_string(),
            "frames": sequence.len(),
            "frame_width": frame_w,
            "frame_height": frame_h,
            "duration_ms": settings.duration_ms,
            "loop": settings.loop_count,
        });
        println!("{}", summary);
    } else {
        println!(
            "Saved: {} ({} frames, {}x{})",
            cli.output.display(),
            sequence.len(),
            frame_w,
            frame_h
        );
    }

    ExitCode::from(EXIT_SUCCESS)
}
