//! Outbound request shapes for the Jolokia management protocol.
//!
//! Three request forms exist:
//! - `GET <base>/search/<pattern>` discovers object names
//! - `GET <base>/list/<path>` fetches one object's attribute/operation schema
//! - `POST <base>/` with a JSON array runs a batch of `read`/`exec` requests
//!
//! Building a request is pure; sending it is the client's job.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

/// Builds request URLs against one endpoint's agent base URL.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base: Url,
}

impl RequestBuilder {
    /// `base` is the agent root, e.g. `https://broker-0:8161/console/jolokia/`
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `GET <base>/search/<pattern>`
    pub fn search(&self, pattern: &str) -> Url {
        self.with_path("search", &[pattern])
    }

    /// `GET <base>/list/<segment>/<segment>...`
    pub fn list(&self, segments: &[String]) -> Url {
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        self.with_path("list", &segments)
    }

    /// Target of batch POSTs
    pub fn batch(&self) -> Url {
        self.base.clone()
    }

    fn with_path(&self, command: &str, segments: &[&str]) -> Url {
        let mut path = String::from(self.base.path());
        path.push_str(command);
        for segment in segments {
            path.push('/');
            path.push_str(&escape_segment(segment));
        }
        let mut url = self.base.clone();
        // set_path percent-encodes quotes, spaces, '?' and '#'; '/' stays structural.
        url.set_path(&path);
        url
    }
}

/// Jolokia path escaping: `!` escapes itself and `/` inside a segment.
/// `%` is pre-encoded because `set_path` keeps existing percent escapes.
fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '!' => out.push_str("!!"),
            '/' => out.push_str("!/"),
            '%' => out.push_str("%25"),
            other => out.push(other),
        }
    }
    out
}

/// One element of a batch POST body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BatchItem {
    Read {
        mbean: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        attribute: Option<String>,
    },
    Exec {
        mbean: String,
        operation: String,
        arguments: Vec<String>,
    },
}

/// One `read` element per attribute; no attributes means "read them all".
pub fn read_items(mbean: &str, attributes: &[String]) -> Vec<BatchItem> {
    if attributes.is_empty() {
        return vec![BatchItem::Read {
            mbean: mbean.to_string(),
            attribute: None,
        }];
    }
    attributes
        .iter()
        .map(|attribute| BatchItem::Read {
            mbean: mbean.to_string(),
            attribute: Some(attribute.clone()),
        })
        .collect()
}

/// Exactly one `exec` element for an operation call.
pub fn exec_item(mbean: &str, signature: &OperationSignature) -> BatchItem {
    BatchItem::Exec {
        mbean: mbean.to_string(),
        operation: signature.to_string(),
        arguments: signature.argument_values(),
    }
}

/// Java types an operation argument may be declared with.
///
/// Only used to build the dispatch signature; values are not checked against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JavaType {
    #[serde(rename = "java.lang.Object")]
    Object,
    #[serde(rename = "java.lang.String")]
    String,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "java.util.Map")]
    Map,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "void")]
    Void,
}

impl JavaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JavaType::Object => "java.lang.Object",
            JavaType::String => "java.lang.String",
            JavaType::Boolean => "boolean",
            JavaType::Map => "java.util.Map",
            JavaType::Int => "int",
            JavaType::Long => "long",
            JavaType::Double => "double",
            JavaType::Void => "void",
        }
    }
}

/// A positional operation argument: declared type plus value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationArgument {
    #[serde(rename = "type")]
    pub java_type: JavaType,
    #[serde(default)]
    pub value: Value,
}

impl OperationArgument {
    pub fn new(java_type: JavaType, value: impl Into<Value>) -> Self {
        Self {
            java_type,
            value: value.into(),
        }
    }

    /// The wire form of the value: strings as-is, null as empty, the rest as JSON text
    pub fn value_string(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Operation name plus its arguments, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSignature {
    pub name: String,
    #[serde(default)]
    pub args: Vec<OperationArgument>,
}

impl OperationSignature {
    pub fn new(name: impl Into<String>, args: Vec<OperationArgument>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn argument_values(&self) -> Vec<String> {
        self.args.iter().map(OperationArgument::value_string).collect()
    }
}

/// `name(type1,type2)`: overloads dispatch on argument types, never names.
impl fmt::Display for OperationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&str> = self.args.iter().map(|arg| arg.java_type.as_str()).collect();
        write!(f, "{}({})", self.name, types.join(","))
    }
}

/// Envelope of every single-request reply.
#[derive(Debug, Clone, Deserialize)]
pub struct JolokiaReply<T> {
    #[serde(default)]
    pub request: Value,
    pub value: Option<T>,
    #[serde(default)]
    pub timestamp: Option<u64>,
    pub status: u16,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
}

/// One element of a batch reply, passed through to callers unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReplyItem {
    #[serde(default)]
    pub request: Value,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl BatchReplyItem {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Result of reading one attribute
pub type AttributeReadResult = BatchReplyItem;

/// Result of executing one operation
pub type OperationResult = BatchReplyItem;

/// Attribute/operation schema of one managed object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Overloaded operations share a name; single signatures are lifted to a list
    #[serde(default, deserialize_with = "one_or_many")]
    pub op: BTreeMap<String, Vec<OperationInfo>>,
    #[serde(default)]
    pub attr: BTreeMap<String, AttributeInfo>,
    #[serde(default, rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationInfo {
    #[serde(default)]
    pub args: Vec<ArgumentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret: Option<String>,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub java_type: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub rw: bool,
    #[serde(rename = "type")]
    pub java_type: String,
    #[serde(default)]
    pub desc: String,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<OperationInfo>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<OperationInfo>),
        One(OperationInfo),
    }

    let raw = BTreeMap::<String, OneOrMany>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, ops)| {
            let ops = match ops {
                OneOrMany::Many(ops) => ops,
                OneOrMany::One(op) => vec![op],
            };
            (name, ops)
        })
        .collect())
}
