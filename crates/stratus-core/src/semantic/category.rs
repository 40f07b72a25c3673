//! Service category tags for diagram nodes.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// The kind of infrastructure element a node stands for.
///
/// The names match external configuration strings (snake_case), so a
/// category can be restyled from a config file:
///
/// ```toml
/// [style.categories.database]
/// fill_color = "#c7d2fe"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// A virtual machine or container host.
    Compute,
    /// A managed relational or NoSQL database.
    Database,
    /// Object or blob storage.
    Storage,
    LoadBalancer,
    /// Internet, NAT or API gateway.
    Gateway,
    AutoScaling,
    /// Function-as-a-service.
    Serverless,
    /// Pub/sub topic or queue.
    Topic,
    /// Users, roles and permissions.
    Identity,
    Monitoring,
    /// A person or external system outside the architecture.
    Actor,
    /// Virtual networks and subnets.
    Network,
    Dns,
    /// Certificates and other security services.
    Security,
    SourceControl,
    Pipeline,
    /// A language runtime or application framework.
    Runtime,
    /// A node drawn with its own icon image.
    Custom,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 18] = [
        Self::Compute,
        Self::Database,
        Self::Storage,
        Self::LoadBalancer,
        Self::Gateway,
        Self::AutoScaling,
        Self::Serverless,
        Self::Topic,
        Self::Identity,
        Self::Monitoring,
        Self::Actor,
        Self::Network,
        Self::Dns,
        Self::Security,
        Self::SourceControl,
        Self::Pipeline,
        Self::Runtime,
        Self::Custom,
    ];

    /// Returns the configuration name of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Database => "database",
            Self::Storage => "storage",
            Self::LoadBalancer => "load_balancer",
            Self::Gateway => "gateway",
            Self::AutoScaling => "auto_scaling",
            Self::Serverless => "serverless",
            Self::Topic => "topic",
            Self::Identity => "identity",
            Self::Monitoring => "monitoring",
            Self::Actor => "actor",
            Self::Network => "network",
            Self::Dns => "dns",
            Self::Security => "security",
            Self::SourceControl => "source_control",
            Self::Pipeline => "pipeline",
            Self::Runtime => "runtime",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or("Unsupported node category")
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_every_category() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("mainframe".parse::<Category>().is_err());
    }

    #[test]
    fn test_display_matches_config_name() {
        assert_eq!(Category::LoadBalancer.to_string(), "load_balancer");
        assert_eq!(Category::SourceControl.to_string(), "source_control");
    }
}
