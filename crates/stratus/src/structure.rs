//! Graph view of a diagram.
//!
//! [`DiagramGraph`] flattens a [`Diagram`] into a petgraph [`DiGraph`] whose
//! vertices are the diagram nodes and whose edges are the declared edges with
//! cluster endpoints resolved to concrete nodes. It is the validation pass
//! run before export, and the basis for comparing two diagrams structurally.
//!
//! Cluster endpoints resolve to the first node nested in the cluster; the
//! exporter then clips the drawn edge at the cluster border.

use log::debug;
use petgraph::{
    Direction,
    algo::is_isomorphic_matching,
    graph::{DiGraph, NodeIndex},
};

use stratus_core::semantic::{
    ArrowDirection, Category, ClusterRef, Diagram, EdgeRef, Endpoint, NodeRef,
};

use crate::StratusError;

/// Vertex weight: what identifies a node when comparing diagrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    label: String,
    category: Category,
    /// Path of the enclosing cluster, so that moving a node between clusters
    /// changes the graph.
    cluster_path: Option<String>,
}

impl GraphNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn cluster_path(&self) -> Option<&str> {
        self.cluster_path.as_deref()
    }
}

/// Edge weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    label: Option<String>,
    direction: ArrowDirection,
}

impl GraphEdge {
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn direction(&self) -> ArrowDirection {
        self.direction
    }
}

/// An edge with both endpoints resolved to nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEdge {
    edge: EdgeRef,
    source: NodeRef,
    target: NodeRef,
    source_cluster: Option<ClusterRef>,
    target_cluster: Option<ClusterRef>,
}

impl ResolvedEdge {
    /// The declared edge.
    pub fn edge(&self) -> EdgeRef {
        self.edge
    }

    pub fn source(&self) -> NodeRef {
        self.source
    }

    pub fn target(&self) -> NodeRef {
        self.target
    }

    /// The cluster the edge leaves from, when declared on a cluster.
    pub fn source_cluster(&self) -> Option<ClusterRef> {
        self.source_cluster
    }

    /// The cluster the edge points at, when declared on a cluster.
    pub fn target_cluster(&self) -> Option<ClusterRef> {
        self.target_cluster
    }
}

/// Flattened, validated graph of a diagram.
#[derive(Debug, Clone)]
pub struct DiagramGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    edges: Vec<ResolvedEdge>,
}

impl DiagramGraph {
    /// Builds the graph of `diagram`.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Graph`] when an edge is declared on a cluster
    /// that contains no node.
    pub fn from_diagram(diagram: &Diagram) -> Result<Self, StratusError> {
        let mut graph = DiGraph::with_capacity(diagram.node_count(), diagram.edge_count());

        for (_, node) in diagram.nodes() {
            let cluster_path = node
                .parent()
                .and_then(|parent| diagram.cluster(parent))
                .map(|cluster| cluster.path().to_string());
            graph.add_node(GraphNode {
                label: node.label().to_string(),
                category: node.category(),
                cluster_path,
            });
        }

        let mut edges = Vec::with_capacity(diagram.edge_count());
        for (edge_ref, edge) in diagram.edges() {
            let (source, source_cluster) = resolve_endpoint(diagram, edge.source())?;
            let (target, target_cluster) = resolve_endpoint(diagram, edge.target())?;

            graph.add_edge(
                NodeIndex::new(source.index()),
                NodeIndex::new(target.index()),
                GraphEdge {
                    label: edge.label().map(str::to_string),
                    direction: edge.direction(),
                },
            );
            edges.push(ResolvedEdge {
                edge: edge_ref,
                source,
                target,
                source_cluster,
                target_cluster,
            });
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            clusters = diagram.cluster_count();
            "Diagram graph built"
        );

        Ok(Self { graph, edges })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges in declaration order with resolved endpoints.
    pub fn resolved_edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    /// Nodes with no incoming edge, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph
            .externals(Direction::Incoming)
            .map(|index| &self.graph[index])
    }

    /// Nodes directly reachable from `node` along declared edges.
    pub fn successors(&self, node: NodeRef) -> impl Iterator<Item = &GraphNode> {
        self.graph
            .neighbors_directed(NodeIndex::new(node.index()), Direction::Outgoing)
            .map(|index| &self.graph[index])
    }

    /// Whether both graphs have the same shape, node labels, categories,
    /// cluster placement and edge labels and directions.
    pub fn is_isomorphic(&self, other: &DiagramGraph) -> bool {
        is_isomorphic_matching(&self.graph, &other.graph, |a, b| a == b, |a, b| a == b)
    }
}

fn resolve_endpoint(
    diagram: &Diagram,
    endpoint: Endpoint,
) -> Result<(NodeRef, Option<ClusterRef>), StratusError> {
    match endpoint {
        Endpoint::Node(node) => Ok((node, None)),
        Endpoint::Cluster(cluster) => {
            let node = diagram.first_node(cluster).ok_or_else(|| {
                let title = diagram
                    .cluster(cluster)
                    .map(|cluster| cluster.title().to_string())
                    .unwrap_or_default();
                StratusError::Graph(format!(
                    "cluster `{title}` is used as an edge endpoint but contains no node"
                ))
            })?;
            Ok((node, Some(cluster)))
        }
    }
}

#[cfg(test)]
mod tests {
    use stratus_core::semantic::{Header, Link};

    use super::*;

    fn three_tier(label: &str) -> Diagram {
        let mut diagram = Diagram::new(Header::new("t"));
        let vpc = diagram.add_cluster(None, "VPC").unwrap();
        let elb = diagram
            .add_node(Some(vpc), "ELB", Category::LoadBalancer)
            .unwrap();
        let web = diagram.add_node(Some(vpc), "Web", Category::Compute).unwrap();
        let db = diagram.add_node(None, "DB", Category::Database).unwrap();
        diagram.connect(elb, web, Link::forward()).unwrap();
        diagram
            .connect(web, db, Link::forward().with_label(label))
            .unwrap();
        diagram
    }

    #[test]
    fn test_counts_and_roots() {
        let graph = DiagramGraph::from_diagram(&three_tier("SQL")).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let roots: Vec<_> = graph.roots().map(GraphNode::label).collect();
        assert_eq!(roots, vec!["ELB"]);
    }

    #[test]
    fn test_same_construction_is_isomorphic() {
        let first = DiagramGraph::from_diagram(&three_tier("SQL")).unwrap();
        let second = DiagramGraph::from_diagram(&three_tier("SQL")).unwrap();
        assert!(first.is_isomorphic(&second));
    }

    #[test]
    fn test_edge_label_breaks_isomorphism() {
        let first = DiagramGraph::from_diagram(&three_tier("SQL")).unwrap();
        let second = DiagramGraph::from_diagram(&three_tier("JDBC")).unwrap();
        assert!(!first.is_isomorphic(&second));
    }

    #[test]
    fn test_cluster_endpoint_resolves_to_first_node() {
        let mut diagram = Diagram::new(Header::new("t"));
        let users = diagram.add_node(None, "Users", Category::Actor).unwrap();
        let aws = diagram.add_cluster(None, "AWS").unwrap();
        let route53 = diagram.add_node(Some(aws), "Route53", Category::Dns).unwrap();
        diagram.connect(users, aws, Link::forward()).unwrap();

        let graph = DiagramGraph::from_diagram(&diagram).unwrap();
        let resolved = graph.resolved_edges()[0];

        assert_eq!(resolved.source(), users);
        assert_eq!(resolved.target(), route53);
        assert_eq!(resolved.target_cluster(), Some(aws));
        assert_eq!(resolved.source_cluster(), None);
        let successors: Vec<_> = graph.successors(users).map(GraphNode::label).collect();
        assert_eq!(successors, vec!["Route53"]);
    }

    #[test]
    fn test_empty_cluster_endpoint_fails() {
        let mut diagram = Diagram::new(Header::new("t"));
        let users = diagram.add_node(None, "Users", Category::Actor).unwrap();
        let empty = diagram.add_cluster(None, "Empty").unwrap();
        diagram.connect(users, empty, Link::forward()).unwrap();

        let err = DiagramGraph::from_diagram(&diagram).unwrap_err();
        assert!(matches!(err, StratusError::Graph(msg) if msg.contains("Empty")));
    }
}
