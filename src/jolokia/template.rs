//! Rendering pattern templates into concrete object names and paths.
//!
//! Rendering is a single left-to-right pass over the pattern text: each
//! declared placeholder token is replaced by its value and substituted values
//! are never rescanned. So a queue literally named `QUEUE_NAME` cannot
//! collide with the token.

use std::collections::BTreeMap;

use super::pattern::{PatternTemplate, Placeholder};
use crate::error::{GatewayError, Result};

/// Caller-supplied values for a template's placeholders.
///
/// The broker name is never taken from here; it always comes from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<Placeholder, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.set(placeholder, value);
        self
    }

    pub fn set(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.values.insert(placeholder, value.into());
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Placeholder, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (Placeholder, String)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

/// Reject values that would change the field boundaries of an object name.
///
/// Values are substituted verbatim between the quotes already present in the
/// pattern, so a quote or comma would split or terminate the field.
pub fn check_field_value(placeholder: Placeholder, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(GatewayError::invalid_request(format!("{} must not be empty", placeholder)));
    }
    if value.contains(['"', ',']) {
        return Err(GatewayError::invalid_request(format!(
            "{} must not contain '\"' or ',': {}",
            placeholder, value
        )));
    }
    Ok(())
}

/// Render a template into one concrete string.
///
/// `broker_name` is the session's resolved broker name; it is only consulted
/// when the template declares the broker placeholder.
pub fn resolve(template: &PatternTemplate, params: &Params, broker_name: Option<&str>) -> Result<String> {
    let values = slot_values(template, params, broker_name)?;
    Ok(render(template.text(), &values))
}

/// Render a detail template into its `/`-separated path segments.
///
/// The separators are taken from the pattern text before substitution, so a
/// `/` inside a value stays part of its segment.
pub fn resolve_path(template: &PatternTemplate, params: &Params, broker_name: Option<&str>) -> Result<Vec<String>> {
    let values = slot_values(template, params, broker_name)?;
    Ok(template
        .text()
        .split('/')
        .map(|segment| render(segment, &values))
        .collect())
}

/// Pick the value for every slot the template declares.
fn slot_values<'a>(
    template: &PatternTemplate,
    params: &'a Params,
    broker_name: Option<&'a str>,
) -> Result<Vec<(&'static str, &'a str)>> {
    template
        .slots()
        .iter()
        .map(|slot| {
            let value = match slot.placeholder {
                Placeholder::BrokerName => broker_name.filter(|name| !name.is_empty()),
                other => params.get(other).or(slot.default),
            };
            value
                .map(|value| (slot.placeholder.token(), value))
                .ok_or(GatewayError::UnresolvedPlaceholder {
                    placeholder: slot.placeholder.token(),
                })
        })
        .collect()
}

fn render(text: &str, values: &[(&'static str, &str)]) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut rest = text;

    'outer: while !rest.is_empty() {
        for (token, value) in values {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(value);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}
