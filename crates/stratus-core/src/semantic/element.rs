//! Diagram element types for the semantic model.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    color::Color,
    identifier::Id,
    semantic::{Category, ClusterRef, Endpoint, NodeRef},
};

/// A labeled vertex standing for one infrastructure element.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    category: Category,
    icon: Option<PathBuf>,
    parent: Option<ClusterRef>,
}

impl Node {
    pub(super) fn new(
        id: Id,
        label: String,
        category: Category,
        icon: Option<PathBuf>,
        parent: Option<ClusterRef>,
    ) -> Self {
        Self {
            id,
            label,
            category,
            icon,
            parent,
        }
    }

    /// Get the node identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Path of the icon image for custom nodes.
    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    /// The cluster the node was created in, `None` at the diagram root.
    pub fn parent(&self) -> Option<ClusterRef> {
        self.parent
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.category)
    }
}

/// A child of a cluster or of the diagram root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    Node(NodeRef),
    Cluster(ClusterRef),
}

/// A titled group of nodes and sub-clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: Id,
    path: Id,
    title: String,
    parent: Option<ClusterRef>,
    depth: usize,
    members: Vec<Member>,
}

impl Cluster {
    pub(super) fn new(
        id: Id,
        path: Id,
        title: String,
        parent: Option<ClusterRef>,
        depth: usize,
    ) -> Self {
        Self {
            id,
            path,
            title,
            parent,
            depth,
            members: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Get the cluster identifier, always prefixed with `cluster_`.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Titles from the outermost cluster down to this one, joined by `::`.
    pub fn path(&self) -> Id {
        self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<ClusterRef> {
        self.parent
    }

    /// Nesting depth, 0 for clusters directly under the diagram root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Direct children in creation order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

/// Arrow heads drawn on an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    #[default]
    Forward,
    Backward,
    Bidirectional,
    Plain,
}

impl ArrowDirection {
    /// Graphviz `dir` attribute value.
    pub fn as_dot(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "back",
            Self::Bidirectional => "both",
            Self::Plain => "none",
        }
    }
}

/// Line style of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    Bold,
}

impl LineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Bold => "bold",
        }
    }
}

/// Template for the edges created by one connection.
///
/// # Examples
///
/// ```
/// use stratus_core::semantic::{ArrowDirection, Link, LineStyle};
///
/// let link = Link::forward().with_label("HTTPS").with_style(LineStyle::Dashed);
/// assert_eq!(link.direction(), ArrowDirection::Forward);
/// assert_eq!(link.label(), Some("HTTPS"));
///
/// assert_eq!(Link::plain().direction(), ArrowDirection::Plain);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    direction: ArrowDirection,
    label: Option<String>,
    color: Option<Color>,
    style: Option<LineStyle>,
}

impl Link {
    pub fn new(direction: ArrowDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn forward() -> Self {
        Self::new(ArrowDirection::Forward)
    }

    pub fn backward() -> Self {
        Self::new(ArrowDirection::Backward)
    }

    /// An undirected connector without arrow heads.
    pub fn plain() -> Self {
        Self::new(ArrowDirection::Plain)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn direction(&self) -> ArrowDirection {
        self.direction
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn style(&self) -> Option<LineStyle> {
        self.style
    }
}

/// A connection between two endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Endpoint,
    target: Endpoint,
    link: Link,
}

impl Edge {
    pub(super) fn new(source: Endpoint, target: Endpoint, link: Link) -> Self {
        Self {
            source,
            target,
            link,
        }
    }

    pub fn source(&self) -> Endpoint {
        self.source
    }

    pub fn target(&self) -> Endpoint {
        self.target
    }

    pub fn direction(&self) -> ArrowDirection {
        self.link.direction
    }

    pub fn label(&self) -> Option<&str> {
        self.link.label()
    }

    pub fn color(&self) -> Option<Color> {
        self.link.color
    }

    pub fn style(&self) -> Option<LineStyle> {
        self.link.style
    }
}
