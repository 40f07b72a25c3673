//! Error types for Stratus operations.
//!
//! This module provides the main error type [`StratusError`] which wraps
//! the error conditions that can occur while building and rendering a diagram.

use std::io;

use thiserror::Error;

use stratus_core::semantic::ModelError;

use crate::export;

/// The main error type for Stratus operations.
#[derive(Debug, Error)]
pub enum StratusError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A handle or connection was rejected while building the diagram.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),
}
