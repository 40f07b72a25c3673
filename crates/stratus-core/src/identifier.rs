//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type. Every node and cluster of a diagram
//! carries an [`Id`] that doubles as its DOT identifier, and clusters carry a
//! nested path built with [`Id::create_nested`].

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use stratus_core::identifier::Id;
///
/// let node = Id::node(3);
/// assert_eq!(node, "node_3");
///
/// let path = Id::new("AWS Cloud").create_nested(Id::new("VPC"));
/// assert_eq!(path, "AWS Cloud::VPC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the identifier of the node stored at `idx` in its diagram.
    pub fn node(idx: usize) -> Self {
        Self::new(&format!("node_{idx}"))
    }

    /// Creates the identifier of the cluster stored at `idx` in its diagram.
    ///
    /// The `cluster_` prefix is what makes Graphviz draw a subgraph as a box.
    pub fn cluster(idx: usize) -> Self {
        Self::new(&format!("cluster_{idx}"))
    }

    /// Creates a nested ID by combining parent ID and child ID with '::' separator.
    ///
    /// # Arguments
    ///
    /// * `child_id` - The child identifier to append.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratus_core::identifier::Id;
    ///
    /// let parent = Id::new("VPC");
    /// let child = Id::new("Public Subnets");
    /// assert_eq!(parent.create_nested(child), "VPC::Public Subnets");
    /// ```
    pub fn create_nested(&self, child_id: Id) -> Self {
        let mut interner = interner();
        let parent_str = interner
            .resolve(self.0)
            .expect("Parent ID should exist in interner");
        let child_str = interner
            .resolve(child_id.0)
            .expect("Child ID should exist in interner");
        let nested_name = format!("{parent_str}::{child_str}");
        Self(interner.get_or_intern(&nested_name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("Route53");
        let id2 = Id::new("Route53");
        let id3 = Id::new("ELB");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "Route53");
    }

    #[test]
    fn test_node_and_cluster_ids_do_not_collide() {
        assert_eq!(Id::node(0), "node_0");
        assert_eq!(Id::cluster(0), "cluster_0");
        assert_ne!(Id::node(0), Id::cluster(0));
        assert_eq!(Id::node(7), Id::node(7));
    }

    #[test]
    fn test_deep_nesting() {
        let level1 = Id::new("AWS Cloud");
        let level2 = level1.create_nested(Id::new("VPC"));
        let level3 = level2.create_nested(Id::new("Public Subnets"));

        assert_eq!(level3, "AWS Cloud::VPC::Public Subnets");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{id}"), "display_test");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str_ref() {
        let id = Id::new("Component");
        let name = String::from("Component");

        assert!(id == name.as_str());
        assert!(id != "Element");
    }
}
