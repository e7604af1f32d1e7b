//! Addressing and session layer for broker management over Jolokia.
//!
//! A REST call names a resource kind plus identifying parameters. This module
//! turns that into a concrete management object name, issues the matching
//! search/list/read/exec request against one broker endpoint, and hands the
//! reply back unchanged.
//!
//! Layers, leaves first:
//! - [`pattern`]: static templates per resource kind and purpose
//! - [`template`]: renders a template with caller parameters and the broker name
//! - [`request`]: builds the outbound request shapes and wire types
//! - [`client`]: one endpoint, its credentials and its lazily resolved broker name
//! - [`session`]: one client per endpoint for the life of the process

pub mod client;
pub mod kind;
pub mod object_name;
pub mod pattern;
pub mod request;
pub mod session;
pub mod template;

pub use client::{ClientOptions, Credentials, EndpointIdentity, ManagementClient};
pub use kind::ResourceKind;
pub use object_name::ObjectName;
pub use pattern::{Placeholder, Purpose};
pub use request::{
    AttributeReadResult, JavaType, ObjectSchema, OperationArgument, OperationResult, OperationSignature,
};
pub use session::SessionCache;
pub use template::Params;
