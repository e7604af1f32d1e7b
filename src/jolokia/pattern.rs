//! Static management-object patterns for every resource kind.
//!
//! Each kind maps to up to three templates:
//! - a *search* pattern containing a wildcard, used for discovery
//! - a *detail* pattern naming one object plus the `/`-separated member path
//!   the schema listing should descend into
//! - an *identity* pattern naming exactly one object, used for attribute
//!   reads and operation calls
//!
//! Placeholder tokens are spelled out inside the pattern text. Every template
//! declares the placeholders it contains, so rendering never has to guess.

use std::fmt;

use super::kind::ResourceKind;
use crate::error::{GatewayError, Result};

/// JMX domain of every broker-side object
pub const DOMAIN: &str = "org.apache.activemq.artemis";

/// A named hole in a pattern template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    BrokerName,
    AddressName,
    QueueName,
    RoutingType,
    AcceptorName,
    ClusterConnectionName,
}

impl Placeholder {
    pub const ALL: [Placeholder; 6] = [
        Placeholder::BrokerName,
        Placeholder::AddressName,
        Placeholder::QueueName,
        Placeholder::RoutingType,
        Placeholder::AcceptorName,
        Placeholder::ClusterConnectionName,
    ];

    /// The literal token as it appears in pattern text
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::BrokerName => "BROKER_NAME",
            Placeholder::AddressName => "ADDRESS_NAME",
            Placeholder::QueueName => "QUEUE_NAME",
            Placeholder::RoutingType => "ROUTING_TYPE",
            Placeholder::AcceptorName => "ACCEPTOR_NAME",
            Placeholder::ClusterConnectionName => "CLUSTER_CONNECTION_NAME",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One placeholder a template contains, and what to do when it is not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub placeholder: Placeholder,
    /// Value used when the caller leaves the placeholder out; `None` means required
    pub default: Option<&'static str>,
}

impl Slot {
    const fn required(placeholder: Placeholder) -> Self {
        Self { placeholder, default: None }
    }

    const fn defaulted(placeholder: Placeholder, default: &'static str) -> Self {
        Self { placeholder, default: Some(default) }
    }
}

/// Which of a kind's templates is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    Search,
    Detail,
    Identity,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Search => "search",
            Purpose::Detail => "detail",
            Purpose::Identity => "identity",
        }
    }
}

/// Pattern text plus the placeholders it declares.
#[derive(Debug, PartialEq, Eq)]
pub struct PatternTemplate {
    text: &'static str,
    slots: &'static [Slot],
}

impl PatternTemplate {
    const fn new(text: &'static str, slots: &'static [Slot]) -> Self {
        Self { text, slots }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn slots(&self) -> &'static [Slot] {
        self.slots
    }

    pub fn slot(&self, placeholder: Placeholder) -> Option<&'static Slot> {
        self.slots.iter().find(|slot| slot.placeholder == placeholder)
    }

    /// Whether rendering this template needs the session's broker name
    pub fn needs_broker_name(&self) -> bool {
        self.slot(Placeholder::BrokerName).is_some()
    }
}

const BROKER: Slot = Slot::required(Placeholder::BrokerName);
const ADDRESS: Slot = Slot::required(Placeholder::AddressName);
const QUEUE: Slot = Slot::required(Placeholder::QueueName);
const ROUTING: Slot = Slot::required(Placeholder::RoutingType);
const ACCEPTOR: Slot = Slot::required(Placeholder::AcceptorName);
const CLUSTER_CONNECTION: Slot = Slot::required(Placeholder::ClusterConnectionName);

static BROKER_SEARCH: PatternTemplate =
    PatternTemplate::new("org.apache.activemq.artemis:broker=*", &[]);
static ALL_COMPONENTS_SEARCH: PatternTemplate =
    PatternTemplate::new("org.apache.activemq.artemis:broker=\"BROKER_NAME\",*", &[BROKER]);
static ADDRESS_SEARCH: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:broker=\"BROKER_NAME\",component=addresses,address=*",
    &[BROKER],
);
// Queues are searched across brokers; the address narrows the result when given.
static QUEUE_SEARCH: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:broker=*,component=addresses,address=\"ADDRESS_NAME\",subcomponent=queues,*",
    &[Slot::defaulted(Placeholder::AddressName, "*")],
);
static ACCEPTOR_SEARCH: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:broker=\"BROKER_NAME\",component=acceptors,name=*",
    &[BROKER],
);
static CLUSTER_CONNECTION_SEARCH: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:broker=\"BROKER_NAME\",component=cluster-connections,name=*",
    &[BROKER],
);

static BROKER_DETAIL: PatternTemplate =
    PatternTemplate::new("org.apache.activemq.artemis/broker=\"BROKER_NAME\"", &[BROKER]);
static ADDRESS_DETAIL: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:address=\"ADDRESS_NAME\",broker=\"BROKER_NAME\"/component=addresses",
    &[ADDRESS, BROKER],
);
static QUEUE_DETAIL: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:address=\"ADDRESS_NAME\",broker=\"BROKER_NAME\",component=addresses,queue=\"QUEUE_NAME\",routing-type=\"ROUTING_TYPE\"/subcomponent=queues",
    &[ADDRESS, BROKER, QUEUE, ROUTING],
);
static ACCEPTOR_DETAIL: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:name=\"ACCEPTOR_NAME\",broker=\"BROKER_NAME\"/component=acceptors",
    &[ACCEPTOR, BROKER],
);
static CLUSTER_CONNECTION_DETAIL: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:name=\"CLUSTER_CONNECTION_NAME\",broker=\"BROKER_NAME\"/component=cluster-connections",
    &[CLUSTER_CONNECTION, BROKER],
);

static BROKER_IDENTITY: PatternTemplate =
    PatternTemplate::new("org.apache.activemq.artemis:broker=\"BROKER_NAME\"", &[BROKER]);
static ADDRESS_IDENTITY: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:broker=\"BROKER_NAME\",component=addresses,address=\"ADDRESS_NAME\"",
    &[BROKER, ADDRESS],
);
static QUEUE_IDENTITY: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:address=\"ADDRESS_NAME\",broker=\"BROKER_NAME\",component=addresses,queue=\"QUEUE_NAME\",routing-type=\"ROUTING_TYPE\",subcomponent=queues",
    &[ADDRESS, BROKER, QUEUE, ROUTING],
);
static ACCEPTOR_IDENTITY: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:broker=\"BROKER_NAME\",component=acceptors,name=\"ACCEPTOR_NAME\"",
    &[BROKER, ACCEPTOR],
);
static CLUSTER_CONNECTION_IDENTITY: PatternTemplate = PatternTemplate::new(
    "org.apache.activemq.artemis:broker=\"BROKER_NAME\",component=cluster-connections,name=\"CLUSTER_CONNECTION_NAME\"",
    &[BROKER, CLUSTER_CONNECTION],
);

/// Look up the template for a kind and purpose.
///
/// Fails only for combinations that are intentionally absent: the
/// all-components kind is discovery-only and has no detail or identity form.
pub fn template_for(kind: ResourceKind, purpose: Purpose) -> Result<&'static PatternTemplate> {
    let template = match (kind, purpose) {
        (ResourceKind::AllComponents, Purpose::Search) => Some(&ALL_COMPONENTS_SEARCH),
        (ResourceKind::AllComponents, _) => None,

        (ResourceKind::Broker, Purpose::Search) => Some(&BROKER_SEARCH),
        (ResourceKind::Broker, Purpose::Detail) => Some(&BROKER_DETAIL),
        (ResourceKind::Broker, Purpose::Identity) => Some(&BROKER_IDENTITY),

        (ResourceKind::Address, Purpose::Search) => Some(&ADDRESS_SEARCH),
        (ResourceKind::Address, Purpose::Detail) => Some(&ADDRESS_DETAIL),
        (ResourceKind::Address, Purpose::Identity) => Some(&ADDRESS_IDENTITY),

        (ResourceKind::Queue, Purpose::Search) => Some(&QUEUE_SEARCH),
        (ResourceKind::Queue, Purpose::Detail) => Some(&QUEUE_DETAIL),
        (ResourceKind::Queue, Purpose::Identity) => Some(&QUEUE_IDENTITY),

        (ResourceKind::Acceptor, Purpose::Search) => Some(&ACCEPTOR_SEARCH),
        (ResourceKind::Acceptor, Purpose::Detail) => Some(&ACCEPTOR_DETAIL),
        (ResourceKind::Acceptor, Purpose::Identity) => Some(&ACCEPTOR_IDENTITY),

        (ResourceKind::ClusterConnection, Purpose::Search) => Some(&CLUSTER_CONNECTION_SEARCH),
        (ResourceKind::ClusterConnection, Purpose::Detail) => Some(&CLUSTER_CONNECTION_DETAIL),
        (ResourceKind::ClusterConnection, Purpose::Identity) => Some(&CLUSTER_CONNECTION_IDENTITY),
    };

    template.ok_or(GatewayError::TemplateNotFound {
        kind: kind.as_str(),
        purpose: purpose.as_str(),
    })
}

/// The placeholder an operation's instance id fills in, if the kind has one
pub fn name_placeholder(kind: ResourceKind) -> Option<Placeholder> {
    match kind {
        ResourceKind::Address => Some(Placeholder::AddressName),
        ResourceKind::Queue => Some(Placeholder::QueueName),
        ResourceKind::Acceptor => Some(Placeholder::AcceptorName),
        ResourceKind::ClusterConnection => Some(Placeholder::ClusterConnectionName),
        ResourceKind::Broker | ResourceKind::AllComponents => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_templates() -> Vec<(ResourceKind, Purpose, &'static PatternTemplate)> {
        let mut templates = Vec::new();
        for kind in ResourceKind::ALL {
            for purpose in [Purpose::Search, Purpose::Detail, Purpose::Identity] {
                if let Ok(template) = template_for(kind, purpose) {
                    templates.push((kind, purpose, template));
                }
            }
        }
        templates
    }

    #[test]
    fn test_declared_slots_match_pattern_text() {
        for (kind, purpose, template) in all_templates() {
            for placeholder in Placeholder::ALL {
                let in_text = template.text().contains(placeholder.token());
                let declared = template.slot(placeholder).is_some();
                assert_eq!(
                    in_text, declared,
                    "{} {} template: {} declared={} in_text={}",
                    kind.as_str(),
                    purpose.as_str(),
                    placeholder,
                    declared,
                    in_text
                );
            }
        }
    }

    #[test]
    fn test_all_templates_share_domain() {
        for (_, _, template) in all_templates() {
            assert!(template.text().starts_with(DOMAIN));
        }
    }

    #[test]
    fn test_all_components_is_discovery_only() {
        assert!(template_for(ResourceKind::AllComponents, Purpose::Search).is_ok());

        let err = template_for(ResourceKind::AllComponents, Purpose::Identity).unwrap_err();
        assert!(matches!(err, GatewayError::TemplateNotFound { kind: "broker-components", purpose: "identity" }));
        assert!(template_for(ResourceKind::AllComponents, Purpose::Detail).is_err());
    }

    #[test]
    fn test_every_concrete_kind_has_all_purposes() {
        for kind in ResourceKind::ALL.into_iter().filter(|k| *k != ResourceKind::AllComponents) {
            for purpose in [Purpose::Search, Purpose::Detail, Purpose::Identity] {
                assert!(template_for(kind, purpose).is_ok(), "{} {}", kind, purpose.as_str());
            }
        }
    }

    #[test]
    fn test_search_patterns_carry_wildcard() {
        for kind in ResourceKind::ALL {
            let template = template_for(kind, Purpose::Search).unwrap();
            assert!(template.text().contains('*') || template.slots().iter().any(|s| s.default == Some("*")));
        }
    }

    #[test]
    fn test_broker_discovery_is_independent_of_broker_name() {
        assert!(!template_for(ResourceKind::Broker, Purpose::Search).unwrap().needs_broker_name());
        assert!(!template_for(ResourceKind::Queue, Purpose::Search).unwrap().needs_broker_name());
        assert!(template_for(ResourceKind::Address, Purpose::Search).unwrap().needs_broker_name());
    }

    #[test]
    fn test_only_queue_detail_descends_into_subcomponent() {
        let queue = template_for(ResourceKind::Queue, Purpose::Detail).unwrap();
        assert!(queue.text().ends_with("/subcomponent=queues"));
        let address = template_for(ResourceKind::Address, Purpose::Detail).unwrap();
        assert!(!address.text().contains("subcomponent"));
    }

    #[test]
    fn test_placeholder_tokens_are_distinct() {
        let tokens: std::collections::HashSet<&str> = Placeholder::ALL.iter().map(|p| p.token()).collect();
        assert_eq!(tokens.len(), Placeholder::ALL.len());
        for token in &tokens {
            assert!(!DOMAIN.contains(token), "{}", token);
        }
    }

    #[test]
    fn test_name_placeholder() {
        assert_eq!(name_placeholder(ResourceKind::Queue), Some(Placeholder::QueueName));
        assert_eq!(name_placeholder(ResourceKind::Broker), None);
    }
}
