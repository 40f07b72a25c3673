//! Handles and edge endpoint pairing.

use std::fmt;

use super::diagram::{DiagramKey, ModelError};

/// Handle to a node stored in a [`Diagram`](super::Diagram).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub(super) diagram: DiagramKey,
    pub(super) index: usize,
}

impl NodeRef {
    /// Position of the node in its diagram, in creation order.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Handle to a cluster stored in a [`Diagram`](super::Diagram).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterRef {
    pub(super) diagram: DiagramKey,
    pub(super) index: usize,
}

impl ClusterRef {
    /// Position of the cluster in its diagram, in creation order.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Handle to an edge stored in a [`Diagram`](super::Diagram).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    pub(super) diagram: DiagramKey,
    pub(super) index: usize,
}

impl EdgeRef {
    /// Position of the edge in its diagram, in declaration order.
    pub fn index(self) -> usize {
        self.index
    }
}

/// One end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Node(NodeRef),
    /// A whole cluster; drawn against its first node and clipped at its border.
    Cluster(ClusterRef),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => write!(f, "node #{}", node.index),
            Self::Cluster(cluster) => write!(f, "cluster #{}", cluster.index),
        }
    }
}

impl From<NodeRef> for Endpoint {
    fn from(node: NodeRef) -> Self {
        Self::Node(node)
    }
}

impl From<ClusterRef> for Endpoint {
    fn from(cluster: ClusterRef) -> Self {
        Self::Cluster(cluster)
    }
}

/// One side of a connection: a single endpoint or an ordered list of them.
///
/// Built implicitly from node and cluster handles, slices, arrays and
/// vectors of node handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoints {
    One(Endpoint),
    Many(Vec<Endpoint>),
}

impl Endpoints {
    /// Number of endpoints on this side.
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(endpoints) => endpoints.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the endpoints in order.
    pub fn iter(&self) -> impl Iterator<Item = Endpoint> + '_ {
        let endpoints: &[Endpoint] = match self {
            Self::One(endpoint) => std::slice::from_ref(endpoint),
            Self::Many(endpoints) => endpoints,
        };
        endpoints.iter().copied()
    }
}

impl From<NodeRef> for Endpoints {
    fn from(node: NodeRef) -> Self {
        Self::One(Endpoint::Node(node))
    }
}

impl From<ClusterRef> for Endpoints {
    fn from(cluster: ClusterRef) -> Self {
        Self::One(Endpoint::Cluster(cluster))
    }
}

impl From<Endpoint> for Endpoints {
    fn from(endpoint: Endpoint) -> Self {
        Self::One(endpoint)
    }
}

impl From<&[NodeRef]> for Endpoints {
    fn from(nodes: &[NodeRef]) -> Self {
        Self::Many(nodes.iter().copied().map(Endpoint::Node).collect())
    }
}

impl From<&Vec<NodeRef>> for Endpoints {
    fn from(nodes: &Vec<NodeRef>) -> Self {
        Self::from(nodes.as_slice())
    }
}

impl From<Vec<NodeRef>> for Endpoints {
    fn from(nodes: Vec<NodeRef>) -> Self {
        Self::from(nodes.as_slice())
    }
}

impl<const N: usize> From<[NodeRef; N]> for Endpoints {
    fn from(nodes: [NodeRef; N]) -> Self {
        Self::from(nodes.as_slice())
    }
}

impl<const N: usize> From<&[NodeRef; N]> for Endpoints {
    fn from(nodes: &[NodeRef; N]) -> Self {
        Self::from(nodes.as_slice())
    }
}

/// Expands two sides of a connection into the concrete `(source, target)` pairs.
///
/// - one to one yields a single pair;
/// - one to many fans out, many to one fans in, one pair per list element;
/// - many to many pairs element-wise and requires equal lengths.
///
/// # Errors
///
/// Returns [`ModelError::EndpointMismatch`] when both sides are lists of
/// different lengths. Nothing is truncated.
pub fn pair_endpoints(
    source: &Endpoints,
    target: &Endpoints,
) -> Result<Vec<(Endpoint, Endpoint)>, ModelError> {
    match (source, target) {
        (Endpoints::One(source), Endpoints::One(target)) => Ok(vec![(*source, *target)]),
        (Endpoints::One(source), Endpoints::Many(targets)) => {
            Ok(targets.iter().map(|target| (*source, *target)).collect())
        }
        (Endpoints::Many(sources), Endpoints::One(target)) => {
            Ok(sources.iter().map(|source| (*source, *target)).collect())
        }
        (Endpoints::Many(sources), Endpoints::Many(targets)) => {
            if sources.len() != targets.len() {
                return Err(ModelError::EndpointMismatch {
                    sources: sources.len(),
                    targets: targets.len(),
                });
            }
            Ok(sources.iter().copied().zip(targets.iter().copied()).collect())
        }
    }
}
