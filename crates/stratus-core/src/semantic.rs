//! Semantic model for architecture diagrams.
//!
//! The model is append-only: a [`Diagram`] hands out handles ([`NodeRef`],
//! [`ClusterRef`], [`EdgeRef`]) for everything added to it and never removes
//! anything. Handles remember the diagram that issued them, so a handle used
//! against the wrong diagram is reported instead of silently aliasing.
//!
//! - [`Diagram`] and [`Header`] - The root container and its output settings
//! - [`Node`], [`Cluster`], [`Edge`] - The stored elements
//! - [`Category`] - Service category tag of a node
//! - [`Link`] - Edge template applied to every pair of a connection
//! - [`Endpoints`] and [`pair_endpoints`] - Fan-out, fan-in and element-wise pairing

mod category;
mod diagram;
mod element;
mod endpoint;

pub use category::Category;
pub use diagram::{Diagram, Header, ModelError, OutputFormat, RankDirection};
pub use element::{ArrowDirection, Cluster, Edge, LineStyle, Link, Member, Node};
pub use endpoint::{ClusterRef, EdgeRef, Endpoint, Endpoints, NodeRef, pair_endpoints};
