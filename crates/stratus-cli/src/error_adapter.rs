//! Error adapter for converting StratusError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Each error kind
//! gets a stable diagnostic code and, where the fix is usually the same, a
//! help line.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use stratus::{StratusError, export};

/// Adapter rendering a [`StratusError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a StratusError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            StratusError::Io(_) => "stratus::io",
            StratusError::Model(_) => "stratus::model",
            StratusError::Graph(_) => "stratus::graph",
            StratusError::Config(_) => "stratus::config",
            StratusError::Export(_) => "stratus::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            StratusError::Export(export::Error::BackendUnavailable(_)) => {
                "install Graphviz and make sure `dot` is on PATH, or use `--format dot`"
            }
            StratusError::Export(export::Error::MissingIcon { .. }) => {
                "point `--icon-root` at the directory holding `my_resources/`"
            }
            StratusError::Config(_) => "check the configuration file and command-line flags",
            _ => return None,
        };
        Some(Box::new(help))
    }
}
