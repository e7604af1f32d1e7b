//! REST gateway for Artemis broker management.
//!
//! Each REST call is translated into a Jolokia request against one broker
//! endpoint; see [`jolokia`] for the addressing and session layer and
//! [`http_server`] for the REST surface.

pub mod config;
pub mod error;
pub mod http_server;
pub mod jolokia;

pub use error::{GatewayError, Result};
