//! Rendering through the Graphviz command line tools.
//!
//! [`GraphvizExporter`] checks custom icons, builds the DOT document, and
//! either writes the DOT source directly or asks the configured layout
//! program to render it. Output is staged in a temporary file next to the
//! final artifact and moved into place only once rendering succeeded.

use std::{fs, io::Write, path::Path};

use graphviz_rust::{
    cmd::{CommandArg, Format, Layout},
    printer::{DotPrinter, PrinterContext},
};
use log::{debug, info, warn};
use tempfile::NamedTempFile;

use stratus_core::semantic::{Diagram, OutputFormat};

use super::{
    Artifact, Error, Exporter,
    dot::{DotBuilder, Theme},
    viewer,
};
use crate::{
    config::{AppConfig, LayoutEngine},
    structure::DiagramGraph,
};

/// Exporter that renders with the Graphviz executables.
///
/// # Examples
///
/// ```rust,no_run
/// use stratus::{
///     config::AppConfig,
///     export::{Exporter, dot::Theme, graphviz::GraphvizExporter},
///     semantic::{Category, Diagram, Header},
///     structure::DiagramGraph,
/// };
///
/// let mut diagram = Diagram::new(Header::new("Single Node"));
/// diagram.add_node(None, "EC2", Category::Compute).unwrap();
///
/// let config = AppConfig::default();
/// let theme = Theme::from_config(config.style()).unwrap();
/// let graph = DiagramGraph::from_diagram(&diagram).unwrap();
///
/// let mut exporter = GraphvizExporter::new(&config, &theme);
/// let artifact = exporter.export(&diagram, &graph).unwrap();
/// println!("Wrote {}", artifact.path().display());
/// ```
pub struct GraphvizExporter<'a> {
    config: &'a AppConfig,
    theme: &'a Theme,
}

impl<'a> GraphvizExporter<'a> {
    pub fn new(config: &'a AppConfig, theme: &'a Theme) -> Self {
        Self { config, theme }
    }

    fn check_icons(&self, builder: &DotBuilder<'_>, diagram: &Diagram) -> Result<(), Error> {
        for (_, node) in diagram.nodes() {
            let Some(path) = builder.icon_path(node) else {
                continue;
            };
            if !path.is_file() {
                return Err(Error::MissingIcon {
                    label: node.label().to_string(),
                    path,
                });
            }
        }
        Ok(())
    }

    fn run_layout(
        &self,
        dot: dot_structures::Graph,
        format: OutputFormat,
        output: &Path,
    ) -> Result<(), Error> {
        let engine = self.config.layout().engine();
        debug!(engine:%, format:%, output:?; "Running Graphviz");

        let args = vec![
            CommandArg::Layout(layout_of(engine)),
            CommandArg::Format(format_of(format)?),
            CommandArg::Output(output.to_string_lossy().into_owned()),
        ];
        graphviz_rust::exec(dot, &mut PrinterContext::default(), args).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::BackendUnavailable(err)
            } else {
                Error::Render(err.to_string())
            }
        })?;
        Ok(())
    }
}

impl Exporter for GraphvizExporter<'_> {
    fn export(&mut self, diagram: &Diagram, graph: &DiagramGraph) -> Result<Artifact, Error> {
        let header = diagram.header();
        let builder = DotBuilder::new(self.config, self.theme);
        self.check_icons(&builder, diagram)?;

        let format = header
            .format()
            .unwrap_or_else(|| self.config.render().format());
        let out_dir = self.config.render().out_dir();
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(format!("{}.{}", header.filename(), format.extension()));

        let dot = builder.build(diagram, graph)?;
        let mut staged = NamedTempFile::new_in(out_dir)?;
        match format {
            OutputFormat::Dot => {
                let source = dot.print(&mut PrinterContext::default());
                staged.write_all(source.as_bytes())?;
                staged.flush()?;
            }
            _ => self.run_layout(dot, format, staged.path())?,
        }
        staged.persist(&path).map_err(|err| err.error)?;
        info!(path:? = path, format:%; "Diagram written");

        if header.show() {
            if let Err(err) = viewer::open(&path) {
                warn!(path:? = path, err:%; "Failed to open diagram viewer");
            }
        }

        Ok(Artifact::new(path, format))
    }
}

fn layout_of(engine: LayoutEngine) -> Layout {
    match engine {
        LayoutEngine::Dot => Layout::Dot,
        LayoutEngine::Neato => Layout::Neato,
        LayoutEngine::Fdp => Layout::Fdp,
        LayoutEngine::Circo => Layout::Circo,
        LayoutEngine::Twopi => Layout::Twopi,
        LayoutEngine::Sfdp => Layout::Sfdp,
    }
}

fn format_of(format: OutputFormat) -> Result<Format, Error> {
    match format {
        OutputFormat::Png => Ok(Format::Png),
        OutputFormat::Jpg => Ok(Format::Jpg),
        OutputFormat::Svg => Ok(Format::Svg),
        OutputFormat::Pdf => Ok(Format::Pdf),
        OutputFormat::Dot => Err(Error::Render(
            "DOT output is written without running Graphviz".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use stratus_core::semantic::{Category, Header, Link};

    use super::*;

    fn config_in(out_dir: &Path, icon_root: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.render_mut().set_out_dir(out_dir);
        config.render_mut().set_icon_root(icon_root);
        config.render_mut().set_format(OutputFormat::Dot);
        config
    }

    fn export(diagram: &Diagram, config: &AppConfig) -> Result<Artifact, Error> {
        let theme = Theme::from_config(config.style()).unwrap();
        let graph = DiagramGraph::from_diagram(diagram).unwrap();
        GraphvizExporter::new(config, &theme).export(diagram, &graph)
    }

    #[test]
    fn test_dot_output_is_named_after_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut diagram = Diagram::new(Header::new("Web Service"));
        let elb = diagram.add_node(None, "ELB", Category::LoadBalancer).unwrap();
        let web = diagram.add_node(None, "Web", Category::Compute).unwrap();
        diagram.connect(elb, web, Link::forward()).unwrap();

        let artifact = export(&diagram, &config_in(dir.path(), dir.path())).unwrap();

        assert_eq!(artifact.path(), dir.path().join("web_service.dot"));
        assert_eq!(artifact.format(), OutputFormat::Dot);
        let source = fs::read_to_string(artifact.path()).unwrap();
        assert!(source.contains("\"ELB\""));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_out_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("diagrams");
        let mut diagram = Diagram::new(Header::new("t").with_filename("single"));
        diagram.add_node(None, "EC2", Category::Compute).unwrap();

        let artifact = export(&diagram, &config_in(&nested, dir.path())).unwrap();

        assert_eq!(artifact.path(), nested.join("single.dot"));
        assert!(artifact.path().is_file());
    }

    #[test]
    fn test_missing_icon_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut diagram = Diagram::new(Header::new("t"));
        diagram
            .add_custom_node(None, "Postman", "my_resources/postman.svg")
            .unwrap();

        let err = export(&diagram, &config_in(dir.path(), dir.path())).unwrap_err();

        assert!(matches!(err, Error::MissingIcon { ref label, .. } if label == "Postman"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_present_icon_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("my_resources")).unwrap();
        fs::write(dir.path().join("my_resources/packer.svg"), "<svg/>").unwrap();
        let mut diagram = Diagram::new(Header::new("t").with_filename("packer"));
        diagram
            .add_custom_node(None, "Packer Check", "my_resources/packer.svg")
            .unwrap();

        let artifact = export(&diagram, &config_in(dir.path(), dir.path())).unwrap();
        let source = fs::read_to_string(artifact.path()).unwrap();

        assert!(source.contains("packer.svg"));
    }

    #[test]
    fn test_format_and_layout_mapping() {
        assert!(format_of(OutputFormat::Dot).is_err());
        assert!(matches!(format_of(OutputFormat::Svg), Ok(Format::Svg)));
        assert!(matches!(layout_of(LayoutEngine::Neato), Layout::Neato));
    }
}
