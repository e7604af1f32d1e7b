//! Configuration management for the gateway.

use crate::error::{GatewayError, Result};
use crate::jolokia::client::{ClientOptions, Credentials, DEFAULT_PATH_PREFIX};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default, rename = "httpServer")]
    pub http_server: HttpServerConfig,
    #[serde(default)]
    pub jolokia: JolokiaConfig,
}

/// Configuration for the HTTP server that serves the REST API
#[derive(Clone, Debug, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind the HTTP server to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP server to (default: 9443)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to enable CORS support (default: true)
    #[serde(default = "default_cors_enabled", rename = "corsEnabled")]
    pub cors_enabled: bool,

    /// List of allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins", rename = "corsOrigins")]
    pub cors_origins: Vec<String>,

    /// Timeout in seconds for graceful shutdown (default: 5)
    #[serde(default = "default_shutdown_timeout", rename = "shutdownTimeout")]
    pub shutdown_timeout: u64,

    /// Log every inbound request (default: false)
    #[serde(default, rename = "requestLog")]
    pub request_log: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9443
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_shutdown_timeout() -> u64 {
    5
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_cors_enabled(),
            cors_origins: default_cors_origins(),
            shutdown_timeout: default_shutdown_timeout(),
            request_log: false,
        }
    }
}

/// How the gateway reaches management endpoints
#[derive(Clone, Debug, Deserialize)]
pub struct JolokiaConfig {
    /// Agent path on every endpoint (default: "/console/jolokia")
    #[serde(default = "default_path_prefix", rename = "pathPrefix")]
    pub path_prefix: String,

    /// Credentials for endpoints whose URL carries none
    #[serde(default)]
    pub auth: Option<Credentials>,

    /// Named endpoints; a request may target either the name or a URL
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

fn default_path_prefix() -> String {
    DEFAULT_PATH_PREFIX.to_string()
}

impl Default for JolokiaConfig {
    fn default() -> Self {
        Self {
            path_prefix: default_path_prefix(),
            auth: None,
            endpoints: HashMap::new(),
        }
    }
}

impl JolokiaConfig {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            path_prefix: self.path_prefix.clone(),
            credentials: self.auth.clone(),
        }
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &str) -> Result<GatewayConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GatewayError::config(format!("Failed to read config file '{}': {}", path, e)))?;
    let config: GatewayConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json_data = r#"
        {
          "httpServer": {
            "host": "127.0.0.1",
            "port": 9000,
            "requestLog": true
          },
          "jolokia": {
            "pathPrefix": "/jolokia",
            "auth": { "type": "basic", "username": "admin", "password": "admin" },
            "endpoints": {
              "broker-0": "https://broker-0.test:8161"
            }
          }
        }
        "#;

        let config: GatewayConfig = serde_json::from_str(json_data).expect("Failed to parse config");

        assert_eq!(config.http_server.host, "127.0.0.1");
        assert_eq!(config.http_server.port, 9000);
        assert!(config.http_server.request_log);
        assert!(config.http_server.cors_enabled);

        assert_eq!(config.jolokia.path_prefix, "/jolokia");
        assert_eq!(
            config.jolokia.auth,
            Some(Credentials::Basic {
                username: "admin".to_string(),
                password: "admin".to_string()
            })
        );
        assert_eq!(config.jolokia.endpoints["broker-0"], "https://broker-0.test:8161");
    }

    #[test]
    fn test_bearer_auth() {
        let json_data = r#"{ "jolokia": { "auth": { "type": "bearer", "token": "sha256~abc" } } }"#;
        let config: GatewayConfig = serde_json::from_str(json_data).expect("Failed to parse config");
        assert_eq!(config.jolokia.auth, Some(Credentials::Bearer { token: "sha256~abc".to_string() }));
    }

    #[test]
    fn test_default_values() {
        let config: GatewayConfig = serde_json::from_str("{}").expect("Failed to parse config");

        assert_eq!(config.http_server.host, "0.0.0.0");
        assert_eq!(config.http_server.port, 9443);
        assert_eq!(config.http_server.cors_origins, vec!["*"]);
        assert_eq!(config.http_server.shutdown_timeout, 5);
        assert!(!config.http_server.request_log);

        assert_eq!(config.jolokia.path_prefix, "/console/jolokia");
        assert!(config.jolokia.auth.is_none());
        assert!(config.jolokia.endpoints.is_empty());
    }

    #[test]
    fn test_client_options() {
        let config = JolokiaConfig {
            auth: Some(Credentials::Bearer { token: "t".to_string() }),
            ..JolokiaConfig::default()
        };
        let options = config.client_options();
        assert_eq!(options.path_prefix, "/console/jolokia");
        assert_eq!(options.credentials, Some(Credentials::Bearer { token: "t".to_string() }));
    }

    #[test]
    fn test_unknown_auth_type_rejected() {
        let json_data = r#"{ "jolokia": { "auth": { "type": "kerberos" } } }"#;
        assert!(serde_json::from_str::<GatewayConfig>(json_data).is_err());
    }

    #[test]
    fn test_load_config_success() {
        let config_content = r#"
        {
          "jolokia": {
            "endpoints": { "broker-0": "https://broker-0.test:8161" }
          }
        }
        "#;

        let temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), config_content).expect("Failed to write temp file");

        let config = load_config(temp_file.path().to_str().unwrap()).expect("Failed to load config");
        assert_eq!(config.jolokia.endpoints.len(), 1);
        assert_eq!(config.http_server.port, 9443);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config("non_existent_file.json");
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_load_config_malformed() {
        let temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), "{ not json").expect("Failed to write temp file");
        let result = load_config(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(GatewayError::Json(_))));
    }
}
