//! The categories of broker-side managed object the gateway can address.

use std::fmt;
use std::str::FromStr;

use crate::error::GatewayError;

/// Category of managed object being addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Every top-level component of a broker; discovery only
    AllComponents,
    Broker,
    Address,
    Queue,
    Acceptor,
    ClusterConnection,
}

impl ResourceKind {
    /// All kinds, in registry order
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::AllComponents,
        ResourceKind::Broker,
        ResourceKind::Address,
        ResourceKind::Queue,
        ResourceKind::Acceptor,
        ResourceKind::ClusterConnection,
    ];

    /// Stable name used in routes and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::AllComponents => "broker-components",
            ResourceKind::Broker => "broker",
            ResourceKind::Address => "address",
            ResourceKind::Queue => "queue",
            ResourceKind::Acceptor => "acceptor",
            ResourceKind::ClusterConnection => "cluster-connection",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GatewayError::invalid_request(format!("Unknown resource kind: {}", s)))
    }
}
