//! CLI logic for the Stratus diagram renderer.
//!
//! This module wires the command-line arguments and configuration file to
//! the [`DiagramBuilder`] and renders the cloud architecture.

pub mod architecture;
pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::path::Path;

use log::info;

use stratus::{
    DiagramBuilder, StratusError,
    config::{AppConfig, LayoutEngine},
    semantic::{OutputFormat, RankDirection},
};

/// Icons shipped with the CLI, used when no icon root is configured.
///
/// This is the source tree path at build time; a binary installed elsewhere
/// finds it missing and keeps the configured root.
const BUNDLED_ICON_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// Run the Stratus CLI application
///
/// Loads the configuration, applies the command-line overrides, and renders
/// the cloud architecture diagram.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StratusError` for:
/// - Configuration loading errors or invalid overrides
/// - Diagram model errors
/// - Missing icons, a missing Graphviz installation, or rendering errors
pub fn run(args: &Args) -> Result<(), StratusError> {
    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args)?;

    let mut header = architecture::header();
    if let Some(filename) = &args.filename {
        header = header.with_filename(filename);
    }
    if args.show {
        header = header.with_show(true);
    }

    info!(
        title = header.title(),
        filename:% = header.filename(),
        out_dir:? = app_config.render().out_dir();
        "Processing diagram"
    );

    let builder = DiagramBuilder::new(app_config);
    let artifact = builder.draw(header, architecture::cloud_architecture)?;

    info!(path:? = artifact.path(), format:% = artifact.format(); "Diagram exported successfully");

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Args) -> Result<(), StratusError> {
    let layout = config.layout_mut();

    if let Some(engine) = &args.engine {
        let engine: LayoutEngine = engine
            .parse()
            .map_err(|err| StratusError::Config(format!("{err}: `{engine}`")))?;
        layout.set_engine(engine);
    }
    if let Some(direction) = &args.direction {
        let direction: RankDirection = direction
            .parse()
            .map_err(|err| StratusError::Config(format!("{err}: `{direction}`")))?;
        layout.set_direction(direction);
    }

    let render = config.render_mut();

    if let Some(format) = &args.format {
        let format: OutputFormat = format
            .parse()
            .map_err(|err| StratusError::Config(format!("{err}: `{format}`")))?;
        render.set_format(format);
    }
    if let Some(out_dir) = &args.out_dir {
        render.set_out_dir(out_dir);
    }
    if let Some(icon_root) = &args.icon_root {
        render.set_icon_root(icon_root);
    } else if render.icon_root() == Path::new(".") && Path::new(BUNDLED_ICON_ROOT).is_dir() {
        render.set_icon_root(BUNDLED_ICON_ROOT);
    }

    Ok(())
}
