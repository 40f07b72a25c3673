//! Stratus - cloud architecture diagrams as code.
//!
//! A diagram is described by a Rust closure that places nodes, nests them in
//! clusters, and connects them with edges. The resulting model is checked,
//! translated to Graphviz DOT, and rendered to an image file.

pub mod config;
pub mod export;
pub mod structure;

mod canvas;
mod error;

pub use stratus_core::{color, identifier, semantic};

pub use canvas::Canvas;
pub use error::StratusError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{Artifact, Exporter, dot::Theme, graphviz::GraphvizExporter};
use semantic::{Diagram, Header};
use structure::DiagramGraph;

/// Builder for constructing and rendering Stratus diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use stratus::{
///     DiagramBuilder,
///     config::AppConfig,
///     semantic::{Category, Header},
/// };
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Describe and render in one step
/// let artifact = builder
///     .draw(Header::new("Grouped Workers"), |canvas| {
///         let elb = canvas.node("ELB", Category::LoadBalancer);
///         let workers: Vec<_> = (1..=5)
///             .map(|n| canvas.node(format!("worker{n}"), Category::Compute))
///             .collect();
///         let db = canvas.node("events", Category::Database);
///
///         canvas.link(elb, &workers)?;
///         canvas.link(&workers, db)?;
///         Ok(())
///     })
///     .expect("Failed to draw");
///
/// println!("{}", artifact.path().display());
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout, style and render settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build a diagram by running `body` on an open canvas.
    ///
    /// The canvas is closed when `body` returns; any cluster still open on an
    /// early return is closed as well.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `body`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stratus::{DiagramBuilder, semantic::{Category, Header}};
    ///
    /// let diagram = DiagramBuilder::default()
    ///     .build(Header::new("Event Processing"), |canvas| {
    ///         let source = canvas.node("k8s source", Category::Compute);
    ///         let queue = canvas.node("event queue", Category::Topic);
    ///         canvas.link(source, queue)?;
    ///         Ok(())
    ///     })
    ///     .expect("Failed to build diagram");
    ///
    /// assert_eq!(diagram.edge_count(), 1);
    /// ```
    pub fn build<F>(&self, header: Header, body: F) -> Result<Diagram, StratusError>
    where
        F: FnOnce(&mut Canvas) -> Result<(), StratusError>,
    {
        info!(title = header.title(); "Building diagram");

        let mut canvas = Canvas::new(header);
        body(&mut canvas)?;
        let diagram = canvas.finish();

        debug!(
            nodes = diagram.node_count(),
            clusters = diagram.cluster_count(),
            edges = diagram.edge_count();
            "Diagram built"
        );
        trace!(diagram:?; "Built diagram");

        Ok(diagram)
    }

    /// Translate a diagram into Graphviz DOT source.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Config`] for invalid style settings and
    /// [`StratusError::Graph`] when an edge endpoint cannot be resolved.
    pub fn to_dot(&self, diagram: &Diagram) -> Result<String, StratusError> {
        let theme = self.theme()?;
        let graph = DiagramGraph::from_diagram(diagram)?;
        let source = export::dot::DotBuilder::new(&self.config, &theme).to_source(diagram, &graph)?;
        Ok(source)
    }

    /// Render a diagram to a file in the configured output directory.
    ///
    /// The file is named after the diagram header and carries the extension
    /// of the output format. When the header asks for it, the file is then
    /// opened in the system viewer.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Config`] for invalid style settings,
    /// [`StratusError::Graph`] for unresolvable edges, and
    /// [`StratusError::Export`] when an icon is missing or rendering fails.
    pub fn render(&self, diagram: &Diagram) -> Result<Artifact, StratusError> {
        info!(title = diagram.header().title(); "Rendering diagram");
        let theme = self.theme()?;
        let graph = DiagramGraph::from_diagram(diagram)?;

        let mut exporter = GraphvizExporter::new(&self.config, &theme);
        let artifact = exporter.export(diagram, &graph)?;

        info!(path:? = artifact.path(); "Diagram rendered successfully");
        Ok(artifact)
    }

    /// Build a diagram with `body` and render it.
    ///
    /// # Errors
    ///
    /// See [`DiagramBuilder::build`] and [`DiagramBuilder::render`].
    pub fn draw<F>(&self, header: Header, body: F) -> Result<Artifact, StratusError>
    where
        F: FnOnce(&mut Canvas) -> Result<(), StratusError>,
    {
        let diagram = self.build(header, body)?;
        self.render(&diagram)
    }

    fn theme(&self) -> Result<Theme, StratusError> {
        Theme::from_config(self.config.style()).map_err(StratusError::Config)
    }
}

#[cfg(test)]
mod tests {
    use crate::semantic::Category;

    use super::*;

    #[test]
    fn test_build_propagates_body_error() {
        let err = DiagramBuilder::default()
            .build(Header::new("t"), |canvas| {
                canvas.cluster("VPC", |canvas| {
                    canvas.node("EC2", Category::Compute);
                    Err(StratusError::Graph("stop".to_string()))
                })
            })
            .unwrap_err();

        assert!(matches!(err, StratusError::Graph(_)));
    }

    #[test]
    fn test_invalid_style_is_config_error() {
        let config: AppConfig = toml::from_str("[style]\nfont_color = \"nope\"").unwrap();
        let builder = DiagramBuilder::new(config);
        let diagram = builder.build(Header::new("t"), |_| Ok(())).unwrap();

        let err = builder.to_dot(&diagram).unwrap_err();
        assert!(matches!(err, StratusError::Config(msg) if msg.contains("font color")));
    }
}
