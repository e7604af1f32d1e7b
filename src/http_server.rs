//! HTTP server module exposing broker management as a REST API
//!
//! Every route under `/api/v1` names its management endpoint with
//! `?targetEndpoint=<name|url>` and is a thin translation onto
//! [`ManagementClient`]:
//! - list routes search for instances and reshape the object names
//! - detail routes return the instance schema
//! - read routes return the batch read results unchanged
//! - exec routes take `{"signature": {"name", "args"}}` in the body
//!
//! Caller mistakes answer 400, management endpoint failures 502; the body is
//! always `{"status": "failed", "message": ...}`.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{RawQuery, Request, State},
    http::{header, HeaderValue, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, info_span};
use url::form_urlencoded;
use uuid::Uuid;

use crate::{
    config::HttpServerConfig,
    error::{GatewayError, Result},
    jolokia::{
        pattern,
        template::check_field_value,
        AttributeReadResult, ManagementClient, ObjectName, ObjectSchema, OperationResult, OperationSignature,
        Params, Placeholder, ResourceKind, SessionCache,
    },
};

const API_PREFIX: &str = "/api/v1";

/// Route table served by `api-info`: method, path, summary
const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/brokers", "List brokers"),
    ("GET", "/brokerDetails", "Broker attributes and operations"),
    ("GET", "/readBrokerAttributes", "Read broker attributes (names=...)"),
    ("POST", "/execBrokerOperation", "Invoke a broker operation"),
    ("GET", "/brokerComponents", "List every component object name"),
    ("GET", "/addresses", "List addresses"),
    ("GET", "/addressDetails", "Address attributes and operations (name=...)"),
    ("GET", "/readAddressAttributes", "Read address attributes (name=, attrs=...)"),
    ("POST", "/execAddressOperation", "Invoke an address operation (name=...)"),
    ("GET", "/queues", "List queues, optionally of one address (address=...)"),
    ("GET", "/queueDetails", "Queue attributes and operations (name=, addressName=, routingType=)"),
    ("GET", "/readQueueAttributes", "Read queue attributes (name=, address=, routing-type=, attrs=...)"),
    ("POST", "/execQueueOperation", "Invoke a queue operation (name=, address=, routing-type=)"),
    ("GET", "/acceptors", "List acceptors"),
    ("GET", "/acceptorDetails", "Acceptor attributes and operations (name=...)"),
    ("GET", "/readAcceptorAttributes", "Read acceptor attributes (name=, attrs=...)"),
    ("POST", "/execAcceptorOperation", "Invoke an acceptor operation (name=...)"),
    ("GET", "/clusterConnections", "List cluster connections"),
    ("GET", "/clusterConnectionDetails", "Cluster connection attributes and operations (name=...)"),
    ("GET", "/readClusterConnectionAttributes", "Read cluster connection attributes (name=, attrs=...)"),
    ("POST", "/execClusterConnectionOperation", "Invoke a cluster connection operation (name=...)"),
    ("GET", "/endpoints", "Management endpoints contacted so far"),
    ("GET", "/server/login", "Check that the target endpoint accepts the gateway"),
    ("GET", "/api-info", "This route table"),
];

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionCache>,
}

/// Body of every exec route
#[derive(Debug, Deserialize)]
struct OperationRequest {
    signature: OperationSignature,
}

/// Create the HTTP router for the gateway
pub fn create_router(sessions: Arc<SessionCache>, http_config: &HttpServerConfig) -> Router {
    // Configure CORS based on config
    let cors = if http_config.cors_enabled {
        let mut cors_layer = CorsLayer::new();

        if http_config.cors_origins.iter().any(|origin| origin == "*") {
            cors_layer = cors_layer.allow_origin(Any);
        } else {
            let origins: Vec<HeaderValue> = http_config
                .cors_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors_layer = cors_layer.allow_origin(origins);
        }

        cors_layer
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        CorsLayer::new()
    };

    let api = Router::new()
        .route("/brokers", get(|s: State<AppState>, q: RawQuery| list_components(ResourceKind::Broker, s, q)))
        .route("/brokerDetails", get(|s: State<AppState>, q: RawQuery| component_details(ResourceKind::Broker, s, q)))
        .route(
            "/readBrokerAttributes",
            get(|s: State<AppState>, q: RawQuery| read_component_attributes(ResourceKind::Broker, s, q)),
        )
        .route(
            "/execBrokerOperation",
            post(|s: State<AppState>, q: RawQuery, b: Json<OperationRequest>| {
                exec_component_operation(ResourceKind::Broker, s, q, b)
            }),
        )
        .route(
            "/brokerComponents",
            get(|s: State<AppState>, q: RawQuery| list_components(ResourceKind::AllComponents, s, q)),
        )
        .route("/addresses", get(|s: State<AppState>, q: RawQuery| list_components(ResourceKind::Address, s, q)))
        .route(
            "/addressDetails",
            get(|s: State<AppState>, q: RawQuery| component_details(ResourceKind::Address, s, q)),
        )
        .route(
            "/readAddressAttributes",
            get(|s: State<AppState>, q: RawQuery| read_component_attributes(ResourceKind::Address, s, q)),
        )
        .route(
            "/execAddressOperation",
            post(|s: State<AppState>, q: RawQuery, b: Json<OperationRequest>| {
                exec_component_operation(ResourceKind::Address, s, q, b)
            }),
        )
        .route("/queues", get(|s: State<AppState>, q: RawQuery| list_components(ResourceKind::Queue, s, q)))
        .route("/queueDetails", get(|s: State<AppState>, q: RawQuery| component_details(ResourceKind::Queue, s, q)))
        .route(
            "/readQueueAttributes",
            get(|s: State<AppState>, q: RawQuery| read_component_attributes(ResourceKind::Queue, s, q)),
        )
        .route(
            "/execQueueOperation",
            post(|s: State<AppState>, q: RawQuery, b: Json<OperationRequest>| {
                exec_component_operation(ResourceKind::Queue, s, q, b)
            }),
        )
        .route("/acceptors", get(|s: State<AppState>, q: RawQuery| list_components(ResourceKind::Acceptor, s, q)))
        .route(
            "/acceptorDetails",
            get(|s: State<AppState>, q: RawQuery| component_details(ResourceKind::Acceptor, s, q)),
        )
        .route(
            "/readAcceptorAttributes",
            get(|s: State<AppState>, q: RawQuery| read_component_attributes(ResourceKind::Acceptor, s, q)),
        )
        .route(
            "/execAcceptorOperation",
            post(|s: State<AppState>, q: RawQuery, b: Json<OperationRequest>| {
                exec_component_operation(ResourceKind::Acceptor, s, q, b)
            }),
        )
        .route(
            "/clusterConnections",
            get(|s: State<AppState>, q: RawQuery| list_components(ResourceKind::ClusterConnection, s, q)),
        )
        .route(
            "/clusterConnectionDetails",
            get(|s: State<AppState>, q: RawQuery| component_details(ResourceKind::ClusterConnection, s, q)),
        )
        .route(
            "/readClusterConnectionAttributes",
            get(|s: State<AppState>, q: RawQuery| read_component_attributes(ResourceKind::ClusterConnection, s, q)),
        )
        .route(
            "/execClusterConnectionOperation",
            post(|s: State<AppState>, q: RawQuery, b: Json<OperationRequest>| {
                exec_component_operation(ResourceKind::ClusterConnection, s, q, b)
            }),
        )
        .route("/endpoints", get(list_endpoints))
        .route("/server/login", get(login))
        .route("/api-info", get(api_info));

    let router = Router::new()
        .nest(API_PREFIX, api)
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(AppState { sessions });

    if http_config.request_log {
        router.layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
    } else {
        router
    }
}

/// Parse bind address from HTTP config
pub fn parse_bind_address(http_config: &HttpServerConfig) -> std::result::Result<SocketAddr, String> {
    // Convert hostname to IP address for SocketAddr parsing
    let host_ip = if http_config.host == "localhost" {
        "127.0.0.1"
    } else {
        &http_config.host
    };

    let bind_address_str = format!("{}:{}", host_ip, http_config.port);
    debug!(
        "Parsed HTTP config - host: '{}', port: {}, bind_address: '{}'",
        http_config.host, http_config.port, bind_address_str
    );

    bind_address_str
        .parse()
        .map_err(|e| format!("Invalid bind address '{}': {}", bind_address_str, e))
}

/// Decoded query string; repeated keys are kept in order.
#[derive(Debug, Default)]
struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value under any of `keys`, trying them in order
    fn first(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| {
            self.pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value.as_str())
        })
    }

    /// Every non-empty value under any of `keys`
    fn all(&self, keys: &[&str]) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, value)| keys.contains(&k.as_str()) && !value.is_empty())
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn required(&self, keys: &[&str]) -> Result<&str> {
        self.first(keys).ok_or_else(|| {
            GatewayError::invalid_request(format!("missing query parameter '{}'", keys.first().unwrap_or(&"")))
        })
    }

    /// A required value destined for an object-name field
    fn field(&self, keys: &[&str], placeholder: Placeholder) -> Result<String> {
        let value = self.required(keys)?;
        check_field_value(placeholder, value)?;
        Ok(value.to_string())
    }
}

async fn target_client(state: &AppState, query: &QueryParams) -> Result<Arc<ManagementClient>> {
    let target = query.required(&["targetEndpoint"])?;
    state.sessions.get(target).await
}

/// Identifying parameters of one instance of `kind`
fn instance_params(kind: ResourceKind, query: &QueryParams) -> Result<Params> {
    let mut params = Params::new();
    if let Some(placeholder) = pattern::name_placeholder(kind) {
        params.set(placeholder, query.field(&["name"], placeholder)?);
    }

    if kind == ResourceKind::Queue {
        let address = match query.first(&["address", "addressName"]) {
            Some(address) => address.to_string(),
            // A queue usually lives on the address of the same name.
            None => params.get(Placeholder::QueueName).unwrap_or_default().to_string(),
        };
        check_field_value(Placeholder::AddressName, &address)?;
        params.set(Placeholder::AddressName, address);
        params.set(
            Placeholder::RoutingType,
            query.field(&["routing-type", "routingType"], Placeholder::RoutingType)?,
        );
    }
    Ok(params)
}

/// Reshape a search hit into the listing form of its kind
fn summarize(kind: ResourceKind, name: &ObjectName) -> Value {
    let broker = json!({ "name": name.get("broker") });
    match kind {
        ResourceKind::AllComponents => json!(name.as_str()),
        ResourceKind::Broker => broker,
        ResourceKind::Address => json!({
            "name": name.get("address"),
            "broker": broker,
        }),
        ResourceKind::Queue => json!({
            "name": name.get("queue"),
            "routing-type": name.get("routing-type"),
            "address": { "name": name.get("address"), "broker": broker.clone() },
            "broker": broker,
        }),
        ResourceKind::Acceptor | ResourceKind::ClusterConnection => json!({
            "name": name.get("name"),
            "broker": broker,
        }),
    }
}

async fn list_components(
    kind: ResourceKind,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Value>>> {
    let query = QueryParams::parse(raw.as_deref());
    let mut params = Params::new();
    if kind == ResourceKind::Queue {
        if let Some(address) = query.first(&["address"]).filter(|address| !address.is_empty()) {
            check_field_value(Placeholder::AddressName, address)?;
            params.set(Placeholder::AddressName, address);
        }
    }

    let client = target_client(&state, &query).await?;
    let names = client.list_instances(kind, &params).await?;
    debug!(kind = %kind, endpoint = %client.identity(), count = names.len(), "Listed components");
    Ok(Json(names.iter().map(|name| summarize(kind, name)).collect()))
}

async fn component_details(
    kind: ResourceKind,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ObjectSchema>> {
    let query = QueryParams::parse(raw.as_deref());
    let params = instance_params(kind, &query)?;
    let client = target_client(&state, &query).await?;
    Ok(Json(client.get_schema(kind, &params).await?))
}

async fn read_component_attributes(
    kind: ResourceKind,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<AttributeReadResult>>> {
    let query = QueryParams::parse(raw.as_deref());
    let params = instance_params(kind, &query)?;
    let attributes = query.all(&["attrs", "names"]);
    let client = target_client(&state, &query).await?;
    Ok(Json(client.read_attributes(kind, &params, &attributes).await?))
}

async fn exec_component_operation(
    kind: ResourceKind,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    Json(body): Json<OperationRequest>,
) -> Result<Json<OperationResult>> {
    let query = QueryParams::parse(raw.as_deref());
    let params = instance_params(kind, &query)?;
    if body.signature.name.is_empty() {
        return Err(GatewayError::invalid_request("operation name must not be empty"));
    }
    let client = target_client(&state, &query).await?;
    let result = client.invoke_operation(kind, None, &params, &body.signature).await?;
    info!(kind = %kind, endpoint = %client.identity(), operation = %body.signature, "Operation invoked");
    Ok(Json(result))
}

async fn list_endpoints(State(state): State<AppState>) -> Json<Vec<Value>> {
    let endpoints = state
        .sessions
        .list_known_endpoints()
        .await
        .iter()
        .map(|client| {
            json!({
                "name": client.name(),
                "url": client.identity().to_string(),
                "broker": client.resolved_broker_name(),
            })
        })
        .collect();
    Json(endpoints)
}

/// Resolving the broker name proves the endpoint is reachable and accepts our credentials
async fn login(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Result<Json<Value>> {
    let query = QueryParams::parse(raw.as_deref());
    let client = target_client(&state, &query).await?;
    let broker = client.broker_name().await?;
    info!(endpoint = %client.identity(), broker = %broker, "Login succeeded");
    Ok(Json(json!({ "message": "ok", "status": "successful" })))
}

async fn api_info() -> Json<Value> {
    let paths: Vec<Value> = ROUTES
        .iter()
        .map(|(method, path, summary)| {
            json!({
                "method": method,
                "path": format!("{}{}", API_PREFIX, path),
                "summary": summary,
            })
        })
        .collect();

    Json(json!({
        "message": {
            "name": "artemis-gateway",
            "version": env!("CARGO_PKG_VERSION"),
            "paths": paths,
        },
        "status": "successful",
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "artemis-gateway"
    }))
}
