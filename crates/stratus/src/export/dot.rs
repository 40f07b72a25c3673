//! Translation of a diagram into a Graphviz DOT document.
//!
//! [`DotBuilder`] walks the cluster tree of a [`Diagram`] and emits one
//! `subgraph cluster_<n>` per cluster and one statement per node, followed by
//! the resolved edges. Styling comes from a [`Theme`] resolved once from the
//! [`StyleConfig`].

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph, GraphAttributes, Id as DotId, Node as DotNode,
    NodeId, Stmt, Subgraph, Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};

use stratus_core::{
    color::Color,
    semantic::{Category, Diagram, Member, Node, NodeRef},
};

use super::Error;
use crate::{
    config::{AppConfig, StyleConfig},
    structure::{DiagramGraph, ResolvedEdge},
};

const GRAPH_FONT_SIZE: &str = "15";
const NODE_FONT_SIZE: &str = "13";
const CLUSTER_FONT_SIZE: &str = "12";
const NODE_SIZE: &str = "1.4";
/// Custom nodes are taller to leave room for the label under the icon.
const ICON_NODE_HEIGHT: &str = "1.9";
const CLUSTER_PEN_COLOR: &str = "#AEB6BE";

/// Built-in shape and fill color per category.
fn default_node_style(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Compute => ("box", "#FBD8BF"),
        Category::Database => ("cylinder", "#C9CDF2"),
        Category::Storage => ("folder", "#CFE3C8"),
        Category::LoadBalancer => ("hexagon", "#DDCBFF"),
        Category::Gateway => ("house", "#DDCBFF"),
        Category::AutoScaling => ("box3d", "#FBD8BF"),
        Category::Serverless => ("component", "#FAD6B3"),
        Category::Topic => ("cds", "#F8C6DD"),
        Category::Identity => ("octagon", "#F5C9CF"),
        Category::Monitoring => ("tab", "#F8C6DD"),
        Category::Actor => ("ellipse", "#E3E6E8"),
        Category::Network => ("box", "#E8DCFF"),
        Category::Dns => ("circle", "#DDCBFF"),
        Category::Security => ("note", "#F5C9CF"),
        Category::SourceControl => ("folder", "#E3E6E8"),
        Category::Pipeline => ("cds", "#D6E4F5"),
        Category::Runtime => ("component", "#D3EBC7"),
        Category::Custom => ("none", "#FFFFFF"),
    }
}

#[derive(Debug, Clone)]
struct NodeStyle {
    shape: String,
    fill_color: String,
}

impl NodeStyle {
    fn builtin(category: Category) -> Self {
        let (shape, fill_color) = default_node_style(category);
        Self {
            shape: shape.to_string(),
            fill_color: fill_color.to_string(),
        }
    }
}

/// Resolved styling: every color validated and converted to hex.
#[derive(Debug, Clone)]
pub struct Theme {
    font_name: String,
    font_color: String,
    edge_color: String,
    background_color: Option<String>,
    cluster_colors: Vec<String>,
    node_styles: HashMap<Category, NodeStyle>,
}

impl Theme {
    /// Resolves a theme from the style configuration.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field for invalid colors,
    /// an empty cluster palette, or an unknown category name.
    pub fn from_config(style: &StyleConfig) -> Result<Self, String> {
        let mut node_styles: HashMap<Category, NodeStyle> = Category::ALL
            .into_iter()
            .map(|category| (category, NodeStyle::builtin(category)))
            .collect();

        for (name, overrides) in style.categories() {
            let category: Category = name
                .parse()
                .map_err(|err| format!("{err} `{name}` in style.categories"))?;
            let entry = node_styles
                .entry(category)
                .or_insert_with(|| NodeStyle::builtin(category));
            if let Some(shape) = overrides.shape() {
                entry.shape = shape.to_string();
            }
            if let Some(fill_color) = overrides.fill_color() {
                entry.fill_color = Color::new(fill_color)
                    .map_err(|err| format!("Invalid fill color for `{name}` in config: {err}"))?
                    .to_hex();
            }
        }

        Ok(Self {
            font_name: style.font_name().to_string(),
            font_color: style.font_color()?.to_hex(),
            edge_color: style.edge_color()?.to_hex(),
            background_color: style.background_color()?.map(Color::to_hex),
            cluster_colors: style
                .cluster_colors()?
                .into_iter()
                .map(Color::to_hex)
                .collect(),
            node_styles,
        })
    }

    /// Background color of a cluster at `depth`, cycling through the palette.
    pub fn cluster_color(&self, depth: usize) -> &str {
        &self.cluster_colors[depth % self.cluster_colors.len()]
    }

    /// Shape and fill color used for `category`.
    pub fn node_style(&self, category: Category) -> (&str, &str) {
        let style = &self.node_styles[&category];
        (&style.shape, &style.fill_color)
    }
}

/// Resolves a custom icon path against `icon_root` unless it is absolute.
pub fn resolve_icon(icon_root: &Path, icon: &Path) -> PathBuf {
    if icon.is_absolute() {
        icon.to_path_buf()
    } else {
        icon_root.join(icon)
    }
}

/// Builder of the DOT document for one diagram.
pub struct DotBuilder<'a> {
    config: &'a AppConfig,
    theme: &'a Theme,
}

impl<'a> DotBuilder<'a> {
    pub fn new(config: &'a AppConfig, theme: &'a Theme) -> Self {
        Self { config, theme }
    }

    /// Builds the DOT graph of `diagram`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if `graph` was not built from `diagram`.
    pub fn build(&self, diagram: &Diagram, graph: &DiagramGraph) -> Result<Graph, Error> {
        let mut stmts = vec![
            Stmt::GAttribute(GraphAttributes::Graph(self.graph_attributes(diagram))),
            Stmt::GAttribute(GraphAttributes::Node(self.node_defaults())),
            Stmt::GAttribute(GraphAttributes::Edge(self.edge_defaults())),
        ];
        stmts.extend(self.member_stmts(diagram, diagram.members()));
        for resolved in graph.resolved_edges() {
            stmts.push(Stmt::Edge(self.edge_stmt(diagram, resolved)?));
        }

        Ok(Graph::DiGraph {
            id: quoted(diagram.header().title()),
            strict: false,
            stmts,
        })
    }

    /// Builds and prints the DOT source of `diagram`.
    ///
    /// # Errors
    ///
    /// See [`DotBuilder::build`].
    pub fn to_source(&self, diagram: &Diagram, graph: &DiagramGraph) -> Result<String, Error> {
        let dot = self.build(diagram, graph)?;
        Ok(dot.print(&mut PrinterContext::default()))
    }

    /// Absolute or icon-root-relative path of a custom node's icon.
    pub fn icon_path(&self, node: &Node) -> Option<PathBuf> {
        node.icon()
            .map(|icon| resolve_icon(self.config.render().icon_root(), icon))
    }

    fn graph_attributes(&self, diagram: &Diagram) -> Vec<Attribute> {
        let layout = self.config.layout();
        let direction = diagram
            .header()
            .direction()
            .unwrap_or_else(|| layout.direction());

        let mut attributes = vec![
            attr("label", diagram.header().title()),
            attr("rankdir", direction.as_str()),
            attr("pad", layout.pad().to_string()),
            attr("splines", layout.splines()),
            attr("nodesep", layout.nodesep().to_string()),
            attr("ranksep", layout.ranksep().to_string()),
            attr("fontname", &self.theme.font_name),
            attr("fontsize", GRAPH_FONT_SIZE),
            attr("fontcolor", &self.theme.font_color),
            attr("compound", "true"),
        ];
        if let Some(background) = &self.theme.background_color {
            attributes.push(attr("bgcolor", background));
        }
        attributes
    }

    fn node_defaults(&self) -> Vec<Attribute> {
        vec![
            attr("shape", "box"),
            attr("style", "rounded"),
            attr("fixedsize", "true"),
            attr("width", NODE_SIZE),
            attr("height", NODE_SIZE),
            attr("labelloc", "b"),
            attr("imagescale", "true"),
            attr("fontname", &self.theme.font_name),
            attr("fontsize", NODE_FONT_SIZE),
            attr("fontcolor", &self.theme.font_color),
        ]
    }

    fn edge_defaults(&self) -> Vec<Attribute> {
        vec![
            attr("color", &self.theme.edge_color),
            attr("fontname", &self.theme.font_name),
            attr("fontsize", NODE_FONT_SIZE),
            attr("fontcolor", &self.theme.font_color),
        ]
    }

    fn member_stmts(&self, diagram: &Diagram, members: &[Member]) -> Vec<Stmt> {
        members
            .iter()
            .filter_map(|member| match member {
                Member::Node(node) => diagram.node(*node).map(|node| self.node_stmt(node)),
                Member::Cluster(cluster) => diagram.cluster(*cluster).map(|cluster| {
                    let attributes = vec![
                        attr("label", cluster.title()),
                        attr("labeljust", "l"),
                        attr("pencolor", CLUSTER_PEN_COLOR),
                        attr("style", "rounded"),
                        attr("bgcolor", self.theme.cluster_color(cluster.depth())),
                        attr("fontname", &self.theme.font_name),
                        attr("fontsize", CLUSTER_FONT_SIZE),
                    ];
                    let mut stmts = vec![Stmt::GAttribute(GraphAttributes::Graph(attributes))];
                    stmts.extend(self.member_stmts(diagram, cluster.members()));
                    Stmt::Subgraph(Subgraph {
                        id: DotId::Plain(cluster.id().to_string()),
                        stmts,
                    })
                }),
            })
            .collect()
    }

    fn node_stmt(&self, node: &Node) -> Stmt {
        let mut attributes = vec![attr("label", node.label())];
        match self.icon_path(node) {
            Some(icon) => {
                attributes.push(attr("shape", "none"));
                attributes.push(attr("image", icon.to_string_lossy()));
                attributes.push(attr("height", ICON_NODE_HEIGHT));
            }
            None => {
                let (shape, fill_color) = self.theme.node_style(node.category());
                attributes.push(attr("shape", shape));
                attributes.push(attr("style", "rounded,filled"));
                attributes.push(attr("fillcolor", fill_color));
                attributes.push(attr("fixedsize", "false"));
                attributes.push(attr("labelloc", "c"));
            }
        }

        Stmt::Node(DotNode {
            id: NodeId(DotId::Plain(node.id().to_string()), None),
            attributes,
        })
    }

    fn edge_stmt(&self, diagram: &Diagram, resolved: &ResolvedEdge) -> Result<DotEdge, Error> {
        let edge = diagram
            .edge(resolved.edge())
            .ok_or_else(|| Error::Render("edge does not belong to the diagram".to_string()))?;

        let mut attributes = vec![attr("dir", edge.direction().as_dot())];
        if let Some(label) = edge.label() {
            attributes.push(attr("label", label));
        }
        if let Some(color) = edge.color() {
            attributes.push(attr("color", color.to_hex()));
        }
        if let Some(style) = edge.style() {
            attributes.push(attr("style", style.as_str()));
        }
        if let Some(cluster) = resolved.source_cluster().and_then(|c| diagram.cluster(c)) {
            attributes.push(attr("ltail", cluster.id().to_string()));
        }
        if let Some(cluster) = resolved.target_cluster().and_then(|c| diagram.cluster(c)) {
            attributes.push(attr("lhead", cluster.id().to_string()));
        }

        Ok(DotEdge {
            ty: EdgeTy::Pair(
                node_vertex(diagram, resolved.source())?,
                node_vertex(diagram, resolved.target())?,
            ),
            attributes,
        })
    }
}

fn node_vertex(diagram: &Diagram, node: NodeRef) -> Result<Vertex, Error> {
    let node = diagram
        .node(node)
        .ok_or_else(|| Error::Render("edge endpoint does not belong to the diagram".to_string()))?;
    Ok(Vertex::N(NodeId(DotId::Plain(node.id().to_string()), None)))
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn quoted(text: &str) -> DotId {
    DotId::Escaped(format!("\"{}\"", escape(text)))
}

fn attr(key: &str, value: impl AsRef<str>) -> Attribute {
    Attribute(DotId::Plain(key.to_string()), quoted(value.as_ref()))
}
