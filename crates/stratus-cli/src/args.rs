//! Command-line argument definitions for the Stratus CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Every argument is optional: running without any renders
//! the cloud architecture diagram with the built-in defaults. Flags take
//! precedence over the configuration file.

use clap::Parser;

/// Command-line arguments for the Stratus diagram renderer
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Output base filename, without extension
    #[arg(long)]
    pub filename: Option<String>,

    /// Directory the diagram is written to
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Output format (png, jpg, svg, pdf, dot)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory custom icon paths are resolved against.
    ///
    /// Defaults to the icons bundled in the source tree. The bundled path is
    /// fixed at build time, so an installed binary needs this flag (or
    /// `icon_root` in the config file) once the source checkout is gone.
    #[arg(long)]
    pub icon_root: Option<String>,

    /// Graphviz layout engine (dot, neato, fdp, circo, twopi, sfdp)
    #[arg(long)]
    pub engine: Option<String>,

    /// Rank direction (TB, BT, LR, RL)
    #[arg(long)]
    pub direction: Option<String>,

    /// Open the rendered diagram in the system viewer
    #[arg(long)]
    pub show: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
