//! Root diagram type.
//!
//! - [`Header`] - Title, output filename and render overrides
//! - [`Diagram`] - Append-only store of nodes, clusters and edges
//! - [`RankDirection`], [`OutputFormat`] - Header-level render settings

use std::{
    fmt::{self, Display},
    path::PathBuf,
    str::FromStr,
    sync::atomic::{AtomicUsize, Ordering},
};

use log::trace;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    identifier::Id,
    semantic::{
        Category, Cluster, ClusterRef, Edge, EdgeRef, Endpoint, Endpoints, Link, Member, Node,
        NodeRef, pair_endpoints,
    },
};

/// Filename used when neither a filename nor a title is given.
const FALLBACK_FILENAME: &str = "diagrams_image";

static NEXT_DIAGRAM_KEY: AtomicUsize = AtomicUsize::new(0);

/// Process-unique key stamped on every handle a diagram issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) struct DiagramKey(usize);

impl DiagramKey {
    pub(super) fn next() -> Self {
        Self(NEXT_DIAGRAM_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Errors raised while adding elements to a [`Diagram`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown node handle #{0}: it was not created by this diagram")]
    UnknownNode(usize),

    #[error("unknown cluster handle #{0}: it was not created by this diagram")]
    UnknownCluster(usize),

    #[error("cannot pair {sources} source endpoints with {targets} target endpoints")]
    EndpointMismatch { sources: usize, targets: usize },
}

/// Direction in which Graphviz ranks the graph.
///
/// The names match external configuration strings (`"LR"`, `"TB"`, ...).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum RankDirection {
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl RankDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

impl FromStr for RankDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            _ => Err("Unsupported rank direction"),
        }
    }
}

impl Display for RankDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image format of the rendered artifact.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    /// The DOT source itself, written without running Graphviz.
    Dot,
}

impl OutputFormat {
    /// File extension of the artifact, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "dot" | "gv" => Ok(Self::Dot),
            _ => Err("Unsupported output format"),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Title and output settings of a diagram.
///
/// # Examples
///
/// ```
/// use stratus_core::semantic::Header;
///
/// let header = Header::new("CSYE6225 Cloud Architecture");
/// assert_eq!(header.filename(), "csye6225_cloud_architecture");
///
/// let header = header.with_filename("cloud_architecture_diagram");
/// assert_eq!(header.filename(), "cloud_architecture_diagram");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    title: String,
    filename: Option<String>,
    show: bool,
    direction: Option<RankDirection>,
    format: Option<OutputFormat>,
}

impl Header {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets an explicit output base filename, without extension.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Opens the rendered artifact in the system viewer when set.
    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    pub fn with_direction(mut self, direction: RankDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Output base filename: the explicit one when it is not blank, or the
    /// title's words joined by `_` and lower-cased, with path separators and
    /// other unsafe characters replaced by `_`.
    pub fn filename(&self) -> String {
        if let Some(filename) = self.filename.as_deref().filter(|f| !f.trim().is_empty()) {
            return filename.to_string();
        }
        let derived: String = self
            .title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if derived.is_empty() {
            FALLBACK_FILENAME.to_string()
        } else {
            derived
        }
    }

    pub fn show(&self) -> bool {
        self.show
    }

    pub fn direction(&self) -> Option<RankDirection> {
        self.direction
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }
}

/// An append-only architecture diagram.
///
/// Nodes and clusters are registered under an optional parent cluster, and
/// edges between them are declared through [`Diagram::connect`]. Nothing can
/// be removed once added.
///
/// # Examples
///
/// ```
/// use stratus_core::semantic::{Category, Diagram, Header, Link};
///
/// let mut diagram = Diagram::new(Header::new("Web"));
/// let vpc = diagram.add_cluster(None, "VPC").unwrap();
/// let igw = diagram.add_node(None, "Internet Gateway", Category::Gateway).unwrap();
/// let subnets: Vec<_> = (1..=3)
///     .map(|n| diagram.add_node(Some(vpc), format!("Public Subnet {n}"), Category::Network))
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// let edges = diagram.connect(igw, &subnets, Link::forward()).unwrap();
/// assert_eq!(edges.len(), 3);
/// assert!(diagram.contains(vpc, subnets[0]));
/// ```
#[derive(Debug, Clone)]
pub struct Diagram {
    key: DiagramKey,
    header: Header,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    members: Vec<Member>,
    edges: Vec<Edge>,
}

impl Diagram {
    pub fn new(header: Header) -> Self {
        Self {
            key: DiagramKey::next(),
            header,
            nodes: Vec::new(),
            clusters: Vec::new(),
            members: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Adds a node tagged with `category` under `parent`, or at the root.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownCluster`] if `parent` was not issued by
    /// this diagram.
    pub fn add_node(
        &mut self,
        parent: Option<ClusterRef>,
        label: impl Into<String>,
        category: Category,
    ) -> Result<NodeRef, ModelError> {
        self.push_node(parent, label.into(), category, None)
    }

    /// Adds a [`Category::Custom`] node drawn with the image at `icon`.
    ///
    /// The icon is not checked here; a missing file fails at render time.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownCluster`] if `parent` was not issued by
    /// this diagram.
    pub fn add_custom_node(
        &mut self,
        parent: Option<ClusterRef>,
        label: impl Into<String>,
        icon: impl Into<PathBuf>,
    ) -> Result<NodeRef, ModelError> {
        self.push_node(parent, label.into(), Category::Custom, Some(icon.into()))
    }

    fn push_node(
        &mut self,
        parent: Option<ClusterRef>,
        label: String,
        category: Category,
        icon: Option<PathBuf>,
    ) -> Result<NodeRef, ModelError> {
        if let Some(parent) = parent {
            self.check_cluster(parent)?;
        }

        let index = self.nodes.len();
        let node_ref = NodeRef {
            diagram: self.key,
            index,
        };
        trace!(index, label = label.as_str(), category = category.as_str(); "Adding node");

        self.nodes
            .push(Node::new(Id::node(index), label, category, icon, parent));
        self.attach(parent, Member::Node(node_ref));
        Ok(node_ref)
    }

    /// Adds an empty cluster titled `title` under `parent`, or at the root.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownCluster`] if `parent` was not issued by
    /// this diagram.
    pub fn add_cluster(
        &mut self,
        parent: Option<ClusterRef>,
        title: impl Into<String>,
    ) -> Result<ClusterRef, ModelError> {
        let title = title.into();
        let (path, depth) = match parent {
            Some(parent) => {
                let parent_cluster = self
                    .cluster(parent)
                    .ok_or(ModelError::UnknownCluster(parent.index))?;
                (
                    parent_cluster.path().create_nested(Id::new(&title)),
                    parent_cluster.depth() + 1,
                )
            }
            None => (Id::new(&title), 0),
        };

        let index = self.clusters.len();
        let cluster_ref = ClusterRef {
            diagram: self.key,
            index,
        };
        trace!(index, depth, path = path.to_string(); "Adding cluster");

        self.clusters
            .push(Cluster::new(Id::cluster(index), path, title, parent, depth));
        self.attach(parent, Member::Cluster(cluster_ref));
        Ok(cluster_ref)
    }

    fn attach(&mut self, parent: Option<ClusterRef>, member: Member) {
        match parent {
            Some(parent) => self.clusters[parent.index].push(member),
            None => self.members.push(member),
        }
    }

    /// Declares edges between `source` and `target` using `link` as template.
    ///
    /// See [`pair_endpoints`] for how single endpoints and lists are paired.
    /// Either all edges of the connection are added or none is.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownNode`] or [`ModelError::UnknownCluster`]
    /// for handles not issued by this diagram, and
    /// [`ModelError::EndpointMismatch`] for lists of different lengths.
    pub fn connect(
        &mut self,
        source: impl Into<Endpoints>,
        target: impl Into<Endpoints>,
        link: Link,
    ) -> Result<Vec<EdgeRef>, ModelError> {
        let source = source.into();
        let target = target.into();

        for endpoint in source.iter().chain(target.iter()) {
            self.check_endpoint(endpoint)?;
        }
        let pairs = pair_endpoints(&source, &target)?;

        let edge_refs = pairs
            .into_iter()
            .map(|(source, target)| {
                let index = self.edges.len();
                trace!(index, source = source.to_string(), target = target.to_string(); "Adding edge");
                self.edges.push(Edge::new(source, target, link.clone()));
                EdgeRef {
                    diagram: self.key,
                    index,
                }
            })
            .collect();
        Ok(edge_refs)
    }

    fn check_node(&self, node: NodeRef) -> Result<(), ModelError> {
        if node.diagram == self.key && node.index < self.nodes.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownNode(node.index))
        }
    }

    fn check_cluster(&self, cluster: ClusterRef) -> Result<(), ModelError> {
        if cluster.diagram == self.key && cluster.index < self.clusters.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownCluster(cluster.index))
        }
    }

    fn check_endpoint(&self, endpoint: Endpoint) -> Result<(), ModelError> {
        match endpoint {
            Endpoint::Node(node) => self.check_node(node),
            Endpoint::Cluster(cluster) => self.check_cluster(cluster),
        }
    }

    pub fn node(&self, node: NodeRef) -> Option<&Node> {
        self.check_node(node).ok()?;
        self.nodes.get(node.index)
    }

    pub fn cluster(&self, cluster: ClusterRef) -> Option<&Cluster> {
        self.check_cluster(cluster).ok()?;
        self.clusters.get(cluster.index)
    }

    pub fn edge(&self, edge: EdgeRef) -> Option<&Edge> {
        if edge.diagram != self.key {
            return None;
        }
        self.edges.get(edge.index)
    }

    /// Iterates over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeRef, &Node)> {
        let diagram = self.key;
        self.nodes
            .iter()
            .enumerate()
            .map(move |(index, node)| (NodeRef { diagram, index }, node))
    }

    /// Iterates over all clusters in creation order.
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterRef, &Cluster)> {
        let diagram = self.key;
        self.clusters
            .iter()
            .enumerate()
            .map(move |(index, cluster)| (ClusterRef { diagram, index }, cluster))
    }

    /// Iterates over all edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeRef, &Edge)> {
        let diagram = self.key;
        self.edges
            .iter()
            .enumerate()
            .map(move |(index, edge)| (EdgeRef { diagram, index }, edge))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Direct children of the diagram root in creation order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// All nodes nested anywhere under `cluster`, depth-first in creation order.
    pub fn descendants(&self, cluster: ClusterRef) -> Vec<NodeRef> {
        let mut nodes = Vec::new();
        if let Some(cluster) = self.cluster(cluster) {
            self.collect_nodes(cluster.members(), &mut nodes);
        }
        nodes
    }

    fn collect_nodes(&self, members: &[Member], nodes: &mut Vec<NodeRef>) {
        for member in members {
            match member {
                Member::Node(node) => nodes.push(*node),
                Member::Cluster(cluster) => {
                    self.collect_nodes(self.clusters[cluster.index].members(), nodes)
                }
            }
        }
    }

    /// The first node nested under `cluster`, if any.
    pub fn first_node(&self, cluster: ClusterRef) -> Option<NodeRef> {
        self.descendants(cluster).into_iter().next()
    }

    /// Whether `node` was created while `cluster` (or one of its sub-clusters) was open.
    pub fn contains(&self, cluster: ClusterRef, node: NodeRef) -> bool {
        let mut current = self.node(node).and_then(Node::parent);
        while let Some(parent) = current {
            if parent == cluster {
                return true;
            }
            current = self.clusters[parent.index].parent();
        }
        false
    }

    /// The clusters enclosing `node`, innermost first.
    pub fn ancestors(&self, node: NodeRef) -> Vec<ClusterRef> {
        let mut ancestors = Vec::new();
        let mut current = self.node(node).and_then(Node::parent);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.clusters[parent.index].parent();
        }
        ancestors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_is_derived_from_title() {
        let header = Header::new("CSYE6225 Cloud  Architecture with CI/CD");
        assert_eq!(header.filename(), "csye6225_cloud_architecture_with_ci_cd");
    }

    #[test]
    fn test_explicit_filename_wins_over_title() {
        let header = Header::new("Anything at all").with_filename("cloud_architecture_diagram");
        assert_eq!(header.filename(), "cloud_architecture_diagram");
    }

    #[test]
    fn test_empty_title_falls_back() {
        assert_eq!(Header::new("  ").filename(), FALLBACK_FILENAME);
    }

    #[test]
    fn test_blank_filename_uses_title() {
        let header = Header::new("CSYE6225 Cloud Architecture").with_filename("");
        assert_eq!(header.filename(), "csye6225_cloud_architecture");

        let header = header.with_filename("   ");
        assert_eq!(header.filename(), "csye6225_cloud_architecture");
    }

    #[test]
    fn test_rank_direction_from_str() {
        assert_eq!("lr".parse(), Ok(RankDirection::LeftRight));
        assert_eq!("TB".parse(), Ok(RankDirection::TopBottom));
        assert!("diagonal".parse::<RankDirection>().is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("jpeg".parse(), Ok(OutputFormat::Jpg));
        assert_eq!("dot".parse(), Ok(OutputFormat::Dot));
        assert_eq!(OutputFormat::Svg.extension(), "svg");
        assert!("bmp".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_nodes_are_registered_in_parent() {
        let mut diagram = Diagram::new(Header::new("t"));
        let aws = diagram.add_cluster(None, "AWS Cloud").unwrap();
        let vpc = diagram.add_cluster(Some(aws), "VPC").unwrap();
        let route53 = diagram.add_node(Some(aws), "Route53", Category::Dns).unwrap();
        let elb = diagram
            .add_node(Some(vpc), "Application Load Balancer", Category::LoadBalancer)
            .unwrap();
        let users = diagram.add_node(None, "Users", Category::Actor).unwrap();

        assert_eq!(diagram.node_count(), 3);
        assert_eq!(diagram.members(), &[Member::Cluster(aws), Member::Node(users)]);
        assert_eq!(
            diagram.cluster(aws).unwrap().members(),
            &[Member::Cluster(vpc), Member::Node(route53)]
        );
        assert!(diagram.contains(aws, elb));
        assert!(diagram.contains(vpc, elb));
        assert!(!diagram.contains(vpc, route53));
        assert!(!diagram.contains(aws, users));
        assert_eq!(diagram.ancestors(elb), vec![vpc, aws]);
        assert_eq!(diagram.descendants(aws), vec![elb, route53]);
    }

    #[test]
    fn test_cluster_path_and_depth() {
        let mut diagram = Diagram::new(Header::new("t"));
        let aws = diagram.add_cluster(None, "AWS Cloud").unwrap();
        let vpc = diagram.add_cluster(Some(aws), "VPC").unwrap();
        let public = diagram.add_cluster(Some(vpc), "Public Subnets").unwrap();

        let public = diagram.cluster(public).unwrap();
        assert_eq!(public.path(), "AWS Cloud::VPC::Public Subnets");
        assert_eq!(public.depth(), 2);
        assert_eq!(public.id(), "cluster_2");
    }

    #[test]
    fn test_handles_from_another_diagram_are_rejected() {
        let mut first = Diagram::new(Header::new("first"));
        let mut second = Diagram::new(Header::new("second"));
        let foreign = first.add_node(None, "Users", Category::Actor).unwrap();
        let local = second.add_node(None, "Route53", Category::Dns).unwrap();
        let foreign_cluster = first.add_cluster(None, "GitHub").unwrap();

        assert_eq!(
            second.connect(foreign, local, Link::forward()),
            Err(ModelError::UnknownNode(0))
        );
        assert_eq!(
            second.add_node(Some(foreign_cluster), "x", Category::Compute),
            Err(ModelError::UnknownCluster(0))
        );
        assert!(second.node(foreign).is_none());
        assert_eq!(second.edge_count(), 0);
    }

    #[test]
    fn test_failed_connection_adds_nothing() {
        let mut diagram = Diagram::new(Header::new("t"));
        let left: Vec<_> = (0..3)
            .map(|i| diagram.add_node(None, format!("l{i}"), Category::Compute).unwrap())
            .collect();
        let right: Vec<_> = (0..2)
            .map(|i| diagram.add_node(None, format!("r{i}"), Category::Database).unwrap())
            .collect();

        let result = diagram.connect(&left, &right, Link::forward());
        assert_eq!(
            result,
            Err(ModelError::EndpointMismatch {
                sources: 3,
                targets: 2
            })
        );
        assert_eq!(diagram.edge_count(), 0);
    }

    #[test]
    fn test_labels_are_kept_per_edge() {
        let mut diagram = Diagram::new(Header::new("t"));
        let elb = diagram.add_node(None, "ELB", Category::LoadBalancer).unwrap();
        let asg = diagram.add_node(None, "ASG", Category::AutoScaling).unwrap();
        let route53 = diagram.add_node(None, "Route53", Category::Dns).unwrap();

        let https = diagram
            .connect(elb, asg, Link::forward().with_label("HTTPS"))
            .unwrap();
        let plain = diagram.connect(route53, elb, Link::forward()).unwrap();

        assert_eq!(diagram.edge(https[0]).unwrap().label(), Some("HTTPS"));
        assert_eq!(diagram.edge(plain[0]).unwrap().label(), None);
    }

    #[test]
    fn test_first_node_of_empty_cluster() {
        let mut diagram = Diagram::new(Header::new("t"));
        let outer = diagram.add_cluster(None, "outer").unwrap();
        let inner = diagram.add_cluster(Some(outer), "inner").unwrap();
        assert_eq!(diagram.first_node(outer), None);

        let node = diagram.add_node(Some(inner), "n", Category::Compute).unwrap();
        assert_eq!(diagram.first_node(outer), Some(node));
    }
}
