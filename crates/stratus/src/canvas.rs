//! Scoped construction of a diagram.
//!
//! A [`Canvas`] is the open diagram context handed to the body passed to
//! [`DiagramBuilder::build`](crate::DiagramBuilder::build) or
//! [`DiagramBuilder::draw`](crate::DiagramBuilder::draw). It keeps a stack of
//! open clusters: nodes and clusters created on the canvas are registered
//! in the innermost open cluster, or the diagram root when none is open.

use std::path::PathBuf;

use log::debug;

use stratus_core::semantic::{
    Category, ClusterRef, Diagram, EdgeRef, Endpoints, Header, Link, NodeRef,
};

use crate::StratusError;

/// The open diagram context.
///
/// # Examples
///
/// ```rust
/// use stratus::{DiagramBuilder, semantic::{Category, Header, Link}};
///
/// let diagram = DiagramBuilder::default()
///     .build(Header::new("Web Service"), |canvas| {
///         let users = canvas.node("Users", Category::Actor);
///         let (elb, web) = canvas.cluster("AWS", |canvas| {
///             let elb = canvas.node("ELB", Category::LoadBalancer);
///             let web = canvas.node("Web", Category::Compute);
///             Ok((elb, web))
///         })?;
///
///         canvas.link(users, elb)?;
///         canvas.connect(elb, web, Link::forward().with_label("HTTPS"))?;
///         Ok(())
///     })
///     .expect("Failed to build diagram");
///
/// assert_eq!(diagram.node_count(), 3);
/// assert_eq!(diagram.edge_count(), 2);
/// ```
#[derive(Debug)]
pub struct Canvas {
    diagram: Diagram,
    open_clusters: Vec<ClusterRef>,
}

impl Canvas {
    pub(crate) fn new(header: Header) -> Self {
        Self {
            diagram: Diagram::new(header),
            open_clusters: Vec::new(),
        }
    }

    /// Creates a node tagged with `category` in the innermost open cluster.
    pub fn node(&mut self, label: impl Into<String>, category: Category) -> NodeRef {
        let parent = self.current_cluster();
        self.diagram
            .add_node(parent, label, category)
            .expect("Open clusters always belong to the canvas diagram")
    }

    /// Creates a node drawn with the image at `icon`.
    ///
    /// Relative paths are resolved against the configured icon root when
    /// rendering. The file is only checked at render time.
    pub fn custom(&mut self, label: impl Into<String>, icon: impl Into<PathBuf>) -> NodeRef {
        let parent = self.current_cluster();
        self.diagram
            .add_custom_node(parent, label, icon)
            .expect("Open clusters always belong to the canvas diagram")
    }

    /// Opens a cluster titled `title` for the duration of `body`.
    ///
    /// Everything created in `body` is nested under the cluster. The cluster
    /// is closed when `body` returns, whether it succeeded or not, and the
    /// value returned by `body` is passed through.
    ///
    /// # Errors
    ///
    /// Returns whatever error `body` returns.
    pub fn cluster<T, F>(&mut self, title: impl Into<String>, body: F) -> Result<T, StratusError>
    where
        F: FnOnce(&mut Canvas) -> Result<T, StratusError>,
    {
        let title = title.into();
        let parent = self.current_cluster();
        let cluster = self
            .diagram
            .add_cluster(parent, title.as_str())
            .expect("Open clusters always belong to the canvas diagram");
        debug!(title = title.as_str(), depth = self.open_clusters.len(); "Opening cluster");

        self.open_clusters.push(cluster);
        let result = body(self);
        let closed = self.open_clusters.pop();
        debug_assert_eq!(closed, Some(cluster), "Cluster stack out of balance");

        result
    }

    /// The innermost open cluster, `None` at the diagram root.
    pub fn current_cluster(&self) -> Option<ClusterRef> {
        self.open_clusters.last().copied()
    }

    /// Declares edges from `source` to `target` using `link` as template.
    ///
    /// A single endpoint against a list fans out (or in) to every element of
    /// the list; two lists are paired element-wise.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Model`] when a handle was not created on this
    /// canvas, or when two lists differ in length. No edge is added then.
    pub fn connect(
        &mut self,
        source: impl Into<Endpoints>,
        target: impl Into<Endpoints>,
        link: Link,
    ) -> Result<Vec<EdgeRef>, StratusError> {
        Ok(self.diagram.connect(source, target, link)?)
    }

    /// Declares forward, unlabeled edges. Shorthand for [`Canvas::connect`].
    ///
    /// # Errors
    ///
    /// See [`Canvas::connect`].
    pub fn link(
        &mut self,
        source: impl Into<Endpoints>,
        target: impl Into<Endpoints>,
    ) -> Result<Vec<EdgeRef>, StratusError> {
        self.connect(source, target, Link::forward())
    }

    /// Declares plain connectors without arrow heads. Shorthand for [`Canvas::connect`].
    ///
    /// # Errors
    ///
    /// See [`Canvas::connect`].
    pub fn line(
        &mut self,
        source: impl Into<Endpoints>,
        target: impl Into<Endpoints>,
    ) -> Result<Vec<EdgeRef>, StratusError> {
        self.connect(source, target, Link::plain())
    }

    /// The diagram built so far.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub(crate) fn finish(self) -> Diagram {
        self.diagram
    }
}

#[cfg(test)]
mod tests {
    use stratus_core::semantic::{ArrowDirection, Member};

    use super::*;

    #[test]
    fn test_nodes_land_in_innermost_cluster() {
        let mut canvas = Canvas::new(Header::new("t"));
        let (aws, vpc, elb) = canvas
            .cluster("AWS Cloud", |canvas| {
                let aws = canvas.current_cluster().unwrap();
                canvas.cluster("VPC", |canvas| {
                    let vpc = canvas.current_cluster().unwrap();
                    let elb = canvas.node("ELB", Category::LoadBalancer);
                    Ok((aws, vpc, elb))
                })
            })
            .unwrap();

        let diagram = canvas.diagram();
        assert_eq!(diagram.node(elb).unwrap().parent(), Some(vpc));
        assert!(diagram.contains(aws, elb));
        assert_eq!(canvas.current_cluster(), None);
    }

    #[test]
    fn test_cluster_closes_on_error() {
        let mut canvas = Canvas::new(Header::new("t"));
        let result: Result<(), _> = canvas.cluster("GitHub", |canvas| {
            canvas.node("Repository", Category::SourceControl);
            Err(StratusError::Graph("early exit".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(canvas.current_cluster(), None);

        let users = canvas.node("Users", Category::Actor);
        let diagram = canvas.finish();
        assert_eq!(diagram.node(users).unwrap().parent(), None);
        assert_eq!(diagram.members().last(), Some(&Member::Node(users)));
    }

    #[test]
    fn test_nodes_after_close_are_outside() {
        let mut canvas = Canvas::new(Header::new("t"));
        let api = canvas
            .cluster("API Routes", |canvas| {
                canvas.custom("GET /", "postman.svg");
                Ok(canvas.current_cluster().unwrap())
            })
            .unwrap();
        let after = canvas.node("Node.js App", Category::Runtime);

        assert!(!canvas.diagram().contains(api, after));
        assert_eq!(canvas.diagram().descendants(api).len(), 1);
    }

    #[test]
    fn test_line_is_plain() {
        let mut canvas = Canvas::new(Header::new("t"));
        let asg = canvas.node("Auto Scaling", Category::AutoScaling);
        let ec2: Vec<_> = (1..=3)
            .map(|n| canvas.node(format!("EC2 Instance {n}"), Category::Compute))
            .collect();

        let edges = canvas.line(asg, &ec2).unwrap();

        assert_eq!(edges.len(), 3);
        for edge in edges {
            let edge = canvas.diagram().edge(edge).unwrap();
            assert_eq!(edge.direction(), ArrowDirection::Plain);
        }
    }

    #[test]
    fn test_custom_node_keeps_icon() {
        let mut canvas = Canvas::new(Header::new("t"));
        let packer = canvas.custom("Packer Check", "my_resources/packer.svg");

        let node = canvas.diagram().node(packer).unwrap();
        assert_eq!(node.category(), Category::Custom);
        assert_eq!(
            node.icon(),
            Some(std::path::Path::new("my_resources/packer.svg"))
        );
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn containment_follows_scope(inside in 0usize..8, after in 0usize..8) {
                let mut canvas = Canvas::new(Header::new("t"));
                let (cluster, nested) = canvas
                    .cluster("Auto Scaling Group", |canvas| {
                        let nested: Vec<_> = (0..inside)
                            .map(|n| canvas.node(format!("EC2 Instance {n}"), Category::Compute))
                            .collect();
                        Ok((canvas.current_cluster().unwrap(), nested))
                    })
                    .unwrap();
                let outside: Vec<_> = (0..after)
                    .map(|n| canvas.node(format!("Lambda {n}"), Category::Serverless))
                    .collect();

                let diagram = canvas.diagram();
                prop_assert_eq!(diagram.node_count(), inside + after);
                prop_assert_eq!(diagram.descendants(cluster), nested.clone());
                prop_assert!(nested.iter().all(|node| diagram.contains(cluster, *node)));
                prop_assert!(!outside.iter().any(|node| diagram.contains(cluster, *node)));
            }

            #[test]
            fn fan_in_adds_one_edge_per_source(sources in 0usize..16) {
                let mut canvas = Canvas::new(Header::new("t"));
                let nat = canvas.node("NAT Gateway", Category::Gateway);
                let subnets: Vec<_> = (0..sources)
                    .map(|n| canvas.node(format!("Public Subnet {n}"), Category::Network))
                    .collect();

                let edges = canvas.link(&subnets, nat).unwrap();

                prop_assert_eq!(edges.len(), sources);
                prop_assert_eq!(canvas.diagram().edge_count(), sources);
            }
        }
    }
}
