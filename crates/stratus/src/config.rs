//! Configuration types for Stratus diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out, styled and written. All types implement
//! [`serde::Deserialize`] for loading from external sources, and every field
//! falls back to a default when absent.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Graphviz engine and graph spacing.
//! - [`StyleConfig`] - Fonts, colors and per-category node styles.
//! - [`RenderConfig`] - Output format and directories.
//!
//! # Example
//!
//! ```
//! # use stratus::config::{AppConfig, LayoutEngine};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().engine(), LayoutEngine::Dot);
//! assert!(config.style().background_color().is_ok());
//! ```

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
    str::FromStr,
};

use indexmap::IndexMap;
use serde::Deserialize;

use stratus_core::{
    color::Color,
    semantic::{OutputFormat, RankDirection},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the render configuration for in-place overrides.
    pub fn render_mut(&mut self) -> &mut RenderConfig {
        &mut self.render
    }

    /// Returns the layout configuration for in-place overrides.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }
}

/// Graphviz layout programs.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEngine {
    /// Hierarchical layout (default)
    #[default]
    Dot,
    /// Spring model layout
    Neato,
    /// Force-directed placement
    Fdp,
    /// Circular layout
    Circo,
    /// Radial layout
    Twopi,
    /// Force-directed placement for large graphs
    Sfdp,
}

impl FromStr for LayoutEngine {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dot" => Ok(Self::Dot),
            "neato" => Ok(Self::Neato),
            "fdp" => Ok(Self::Fdp),
            "circo" => Ok(Self::Circo),
            "twopi" => Ok(Self::Twopi),
            "sfdp" => Ok(Self::Sfdp),
            _ => Err("Unsupported layout engine"),
        }
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Dot => "dot",
            LayoutEngine::Neato => "neato",
            LayoutEngine::Fdp => "fdp",
            LayoutEngine::Circo => "circo",
            LayoutEngine::Twopi => "twopi",
            LayoutEngine::Sfdp => "sfdp",
        }
    }
}

impl Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Layout settings passed to Graphviz as graph attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    engine: LayoutEngine,
    direction: RankDirection,
    splines: String,
    nodesep: f32,
    ranksep: f32,
    pad: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::Dot,
            direction: RankDirection::LeftRight,
            splines: "ortho".to_string(),
            nodesep: 0.60,
            ranksep: 0.75,
            pad: 2.0,
        }
    }
}

impl LayoutConfig {
    /// Returns the Graphviz layout program.
    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn set_engine(&mut self, engine: LayoutEngine) {
        self.engine = engine;
    }

    /// Returns the default rank direction, used when the diagram sets none.
    pub fn direction(&self) -> RankDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: RankDirection) {
        self.direction = direction;
    }

    /// Returns the Graphviz `splines` mode.
    pub fn splines(&self) -> &str {
        &self.splines
    }

    /// Minimum space between nodes of the same rank, in inches.
    pub fn nodesep(&self) -> f32 {
        self.nodesep
    }

    /// Minimum space between ranks, in inches.
    pub fn ranksep(&self) -> f32 {
        self.ranksep
    }

    /// Margin around the drawing, in inches.
    pub fn pad(&self) -> f32 {
        self.pad
    }
}

/// Shape and fill override for one node category.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CategoryStyle {
    /// Graphviz shape name.
    #[serde(default)]
    shape: Option<String>,

    /// Fill color, as a color string.
    #[serde(default)]
    fill_color: Option<String>,
}

impl CategoryStyle {
    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    pub fn fill_color(&self) -> Option<&str> {
        self.fill_color.as_deref()
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Colors are kept as strings and parsed on access so that a bad value is
/// reported with the field it came from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    font_name: String,
    font_color: String,
    edge_color: String,
    /// Cluster background colors, picked by nesting depth and cycled.
    cluster_colors: Vec<String>,
    /// Per-category overrides keyed by category name (`database`, `load_balancer`, ...).
    categories: IndexMap<String, CategoryStyle>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            font_name: "Sans-Serif".to_string(),
            font_color: "#2D3436".to_string(),
            edge_color: "#7B8894".to_string(),
            cluster_colors: ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"]
                .into_iter()
                .map(String::from)
                .collect(),
            categories: IndexMap::new(),
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn font_color(&self) -> Result<Color, String> {
        Color::new(&self.font_color).map_err(|err| format!("Invalid font color in config: {err}"))
    }

    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn edge_color(&self) -> Result<Color, String> {
        Color::new(&self.edge_color).map_err(|err| format!("Invalid edge color in config: {err}"))
    }

    /// Returns the parsed cluster palette.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette is empty or holds an invalid color.
    pub fn cluster_colors(&self) -> Result<Vec<Color>, String> {
        if self.cluster_colors.is_empty() {
            return Err("cluster_colors in config must not be empty".to_string());
        }
        self.cluster_colors
            .iter()
            .map(|color| Color::new(color))
            .collect::<Result<_, _>>()
            .map_err(|err| format!("Invalid cluster color in config: {err}"))
    }

    /// Per-category overrides as written in the config.
    pub fn categories(&self) -> &IndexMap<String, CategoryStyle> {
        &self.categories
    }
}

/// Where and how the artifact is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    format: OutputFormat,
    out_dir: PathBuf,
    /// Directory that relative icon paths are resolved against.
    icon_root: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            out_dir: PathBuf::from("."),
            icon_root: PathBuf::from("."),
        }
    }
}

impl RenderConfig {
    /// Returns the default output format, used when the diagram sets none.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn set_out_dir(&mut self, out_dir: impl Into<PathBuf>) {
        self.out_dir = out_dir.into();
    }

    pub fn icon_root(&self) -> &Path {
        &self.icon_root
    }

    pub fn set_icon_root(&mut self, icon_root: impl Into<PathBuf>) {
        self.icon_root = icon_root.into();
    }
}
