//! Spritegif - command-line tool for converting spritesheet grids into animated GIFs

use std::process::ExitCode;

use spritegif::cli;

fn main() -> ExitCode {
    cli::run()
}
