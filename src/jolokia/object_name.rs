//! Parsed management object names (`domain:key="value",key=value,...`).

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::GatewayError;

/// One broker-side object name as returned by a search.
///
/// Property order is kept as received; lookups are by key. Quotes around
/// values are stripped, and a trailing `*` wildcard marks the name as a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    raw: String,
    properties: Vec<(String, String)>,
    pattern: bool,
}

impl ObjectName {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Value of a key property, unquoted
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_pattern(&self) -> bool {
        self.pattern
    }
}

impl FromStr for ObjectName {
    type Err = GatewayError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (_, list) = raw
            .split_once(':')
            .ok_or_else(|| GatewayError::invalid_request(format!("Object name has no domain: {}", raw)))?;

        let mut properties = Vec::new();
        let mut pattern = false;

        for entry in split_properties(list) {
            if entry == "*" {
                pattern = true;
                continue;
            }
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                GatewayError::invalid_request(format!("Malformed key property '{}' in {}", entry, raw))
            })?;
            if value == "*" {
                pattern = true;
            }
            properties.push((key.to_string(), unquote(value).to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            properties,
            pattern,
        })
    }
}

/// Split on commas that are not inside a quoted value
fn split_properties(list: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut quoted = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                entries.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < list.len() {
        entries.push(&list[start..]);
    }
    entries
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ObjectName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_broker_name() {
        let name: ObjectName = "org.apache.activemq.artemis:broker=\"amq-broker\"".parse().unwrap();
        assert_eq!(name.get("broker"), Some("amq-broker"));
        assert!(!name.is_pattern());
    }

    #[test]
    fn test_parse_queue_name() {
        let raw = "org.apache.activemq.artemis:address=\"DLQ\",broker=\"amq-broker\",component=addresses,queue=\"DLQ\",routing-type=\"anycast\",subcomponent=queues";
        let name: ObjectName = raw.parse().unwrap();
        assert_eq!(name.get("address"), Some("DLQ"));
        assert_eq!(name.get("queue"), Some("DLQ"));
        assert_eq!(name.get("routing-type"), Some("anycast"));
        assert_eq!(name.get("component"), Some("addresses"));
        assert_eq!(name.get("subcomponent"), Some("queues"));
        assert_eq!(name.properties().count(), 6);
        assert_eq!(name.to_string(), raw);
    }

    #[test]
    fn test_parse_patterns() {
        let name: ObjectName = "org.apache.activemq.artemis:broker=*".parse().unwrap();
        assert!(name.is_pattern());

        let name: ObjectName = "org.apache.activemq.artemis:broker=\"b\",*".parse().unwrap();
        assert!(name.is_pattern());
        assert_eq!(name.get("broker"), Some("b"));
        assert_eq!(name.properties().count(), 1);
    }

    #[test]
    fn test_quoted_comma_stays_in_value() {
        let name: ObjectName = "d:name=\"a,b\",type=x".parse().unwrap();
        assert_eq!(name.get("name"), Some("a,b"));
        assert_eq!(name.get("type"), Some("x"));
    }

    #[test]
    fn test_malformed_names() {
        assert!("no-domain".parse::<ObjectName>().is_err());
        assert!("d:keyonly".parse::<ObjectName>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let name: ObjectName = "d:k=\"v\"".parse().unwrap();
        assert_eq!(serde_json::to_value(&name).unwrap(), serde_json::json!("d:k=\"v\""));
    }
}
