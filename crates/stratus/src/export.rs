//! Export functionality for Stratus diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! turning a diagram into an artifact on disk. It is the final stage in the
//! Stratus pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Canvas body
//!     ↓ build
//! Semantic Model (Diagram)
//!     ↓ structure
//! DiagramGraph
//!     ↓ export (this module)
//! Image file
//! ```
//!
//! # Available Backends
//!
//! - [`graphviz`]: DOT generation via [`dot::DotBuilder`] and rendering with
//!   the Graphviz executables through [`graphviz::GraphvizExporter`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. [`Error`] converts into
//! [`StratusError::Export`] at the crate boundary.
//!
//! [`StratusError::Export`]: crate::StratusError::Export

/// DOT document generation.
pub mod dot;
/// Graphviz rendering backend.
pub mod graphviz;

mod viewer;

use std::path::{Path, PathBuf};

use stratus_core::semantic::{Diagram, OutputFormat};

use crate::structure::DiagramGraph;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Writes `diagram` to the backend's output format.
    ///
    /// `graph` is the validated graph view of the same diagram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingIcon`] when a custom icon does not exist,
    /// [`Error::BackendUnavailable`] when the rendering program cannot be
    /// started, [`Error::Render`] when it fails, and [`Error::Io`] if writing
    /// the output fails.
    fn export(&mut self, diagram: &Diagram, graph: &DiagramGraph) -> Result<Artifact, Error>;
}

/// The file produced by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    format: OutputFormat,
}

impl Artifact {
    pub fn new(path: PathBuf, format: OutputFormat) -> Self {
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Errors that can occur during diagram export.
///
/// This type is converted into [`StratusError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`StratusError::Export`]: crate::StratusError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// The rendering program could not be started.
    BackendUnavailable(std::io::Error),
    /// A custom node refers to an icon file that does not exist.
    MissingIcon { label: String, path: PathBuf },
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::BackendUnavailable(err) => {
                write!(f, "Graphviz is not available: {err}")
            }
            Self::MissingIcon { label, path } => {
                write!(f, "icon `{}` of node `{label}` not found", path.display())
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) | Self::MissingIcon { .. } => None,
            Self::BackendUnavailable(err) | Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
