//! Process-wide registry of management clients, one per endpoint.
//!
//! Lookups go through a shared read lock; a miss takes the write lock and
//! re-checks before creating, so two concurrent first requests for the same
//! endpoint always end up with the same client.
//!
//! Credentials carried in a target URL are part of the key: callers naming the
//! same host with different userinfo get separate clients and never borrow
//! each other's authentication.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use super::client::{ClientOptions, Credentials, EndpointIdentity, ManagementClient};
use crate::config::JolokiaConfig;
use crate::error::{GatewayError, Result};

/// Endpoint identity plus the credentials the target URL carried, if any
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    identity: EndpointIdentity,
    userinfo: Option<Credentials>,
}

/// Maps endpoints to their long-lived clients.
pub struct SessionCache {
    clients: RwLock<HashMap<SessionKey, Arc<ManagementClient>>>,
    /// Configured endpoint name -> URL
    aliases: HashMap<String, Url>,
    /// Reverse of `aliases`, for display names
    alias_names: HashMap<EndpointIdentity, String>,
    options: ClientOptions,
    http: reqwest::Client,
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("aliases", &self.aliases.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}

impl SessionCache {
    /// Create an empty cache; configured endpoint names are validated here
    pub fn new(config: &JolokiaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("artemis-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;
        Self::with_http_client(config, http)
    }

    pub fn with_http_client(config: &JolokiaConfig, http: reqwest::Client) -> Result<Self> {
        let mut aliases = HashMap::new();
        let mut alias_names = HashMap::new();

        for (name, raw) in &config.endpoints {
            let url = Url::parse(raw)
                .map_err(|e| GatewayError::config(format!("Endpoint '{}' has invalid URL '{}': {}", name, raw, e)))?;
            let identity = EndpointIdentity::from_url(&url)
                .map_err(|e| GatewayError::config(format!("Endpoint '{}': {}", name, e)))?;
            alias_names.insert(identity, name.clone());
            aliases.insert(name.clone(), url);
        }

        Ok(Self {
            clients: RwLock::new(HashMap::new()),
            aliases,
            alias_names,
            options: config.client_options(),
            http,
        })
    }

    /// The client for `target`, an endpoint name or URL; created on first use.
    ///
    /// Repeated calls naming the same endpoint return the same instance.
    pub async fn get(&self, target: &str) -> Result<Arc<ManagementClient>> {
        let url = match self.aliases.get(target) {
            Some(url) => url.clone(),
            None => Url::parse(target)
                .map_err(|e| GatewayError::invalid_endpoint(format!("'{}': {}", target, e)))?,
        };
        let key = SessionKey {
            identity: EndpointIdentity::from_url(&url)?,
            userinfo: Credentials::from_userinfo(&url),
        };

        if let Some(client) = self.clients.read().await.get(&key) {
            return Ok(client.clone());
        }

        let mut clients = self.clients.write().await;
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        let identity = &key.identity;
        let name = self
            .alias_names
            .get(identity)
            .cloned()
            .unwrap_or_else(|| identity.to_string());
        debug!(endpoint = %identity, userinfo = key.userinfo.is_some(), "Creating management client");
        let client = Arc::new(ManagementClient::new(&url, name, &self.options, self.http.clone())?);
        info!(endpoint = %identity, name = %client.name(), "Registered management endpoint");

        clients.insert(key, client.clone());
        Ok(client)
    }

    /// Every client created so far, one per display name, sorted by name
    pub async fn list_known_endpoints(&self) -> Vec<Arc<ManagementClient>> {
        let clients = self.clients.read().await;
        let mut by_name: BTreeMap<&str, Arc<ManagementClient>> = BTreeMap::new();
        for client in clients.values() {
            by_name.entry(client.name()).or_insert_with(|| client.clone());
        }
        by_name.into_values().collect()
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }
}
