use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use dashboard_app::edits::EditSession;
use dashboard_app::refresh::{refresh, SharedState};
use dashboard_app::selection::SelectionError;
use dashboard_app::state::SessionState;
use dashboard_app::view::{build_view, DashboardView};
use injector::directory::{fetch_directory, DirectoryOption, ADDRESSBOOK_URL};
use injector::networks::{self, NetworkError};
use injector::payload::{build_batch_payload, BatchPayload};
use injector::{InjectorReader, RpcClient};

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub supported_networks: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayloadRequest {
    /// Target network name (e.g. "polygon")
    pub network: String,

    /// Injector contract address
    pub address: String,

    /// Staged recipient rows; when empty the payload clears the watch list
    #[serde(default)]
    pub entries: Vec<PayloadRequestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadRequestEntry {
    pub address: String,
    /// Human-unit decimal amount per period
    pub amount_per_period: String,
    pub max_periods: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid staged input: {0}")]
    InvalidInput(String),

    #[error("Upstream read failed: {0}")]
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::UnsupportedNetwork(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(ErrorResponse {
            error: error_message.clone(),
            details: None,
        });

        (status, body).into_response()
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::Network(NetworkError::Unsupported(name)) => {
                ApiError::UnsupportedNetwork(name)
            }
            other => ApiError::InvalidRequest(other.to_string()),
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
struct AppState {
    /// Shared HTTP client for the address-book fetch
    http: reqwest::Client,
}

// ============================================================================
// API Handlers
// ============================================================================

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_networks: networks::supported_networks()
            .iter()
            .map(|name| name.to_string())
            .collect(),
    })
}

/// Address directory endpoint. An unreachable address book is non-fatal and
/// yields an empty list, matching the dashboard's selector behavior.
async fn directory(State(state): State<Arc<AppState>>) -> Json<Vec<DirectoryOption>> {
    match fetch_directory(&state.http, ADDRESSBOOK_URL).await {
        Ok(options) => Json(options),
        Err(err) => {
            warn!("address book fetch failed: {err}");
            Json(Vec::new())
        }
    }
}

/// Dashboard endpoint: the `/:network/:address` routing surface. Fetches the
/// watch list and renders the full view; rows whose reads failed stay in the
/// pending state rather than failing the request.
async fn dashboard(
    Path((network, address)): Path<(String, String)>,
) -> Result<Json<DashboardView>, ApiError> {
    info!("dashboard request: network={network} address={address}");

    let mut session = SessionState::new();
    let selection = session.select(&network, &address)?;

    let reader = InjectorReader::new(
        RpcClient::new(selection.network.rpc_url),
        selection.contract,
    );
    let session: SharedState = Arc::new(Mutex::new(session));

    refresh(&reader, &session, selection.id)
        .await
        .map_err(|err| ApiError::Upstream(err.to_string()))?;

    let guard = session.lock().await;
    let view = build_view(&guard)
        .ok_or_else(|| ApiError::InvalidRequest("no selection bound".to_string()))?;
    Ok(Json(view))
}

/// Batch payload endpoint: validates the staged rows and returns the
/// batch-transaction document for the multisig tool.
async fn payload(Json(request): Json<PayloadRequest>) -> Result<Json<BatchPayload>, ApiError> {
    info!(
        "payload request: network={} address={} rows={}",
        request.network,
        request.address,
        request.entries.len()
    );

    let descriptor = networks::descriptor(&request.network)
        .map_err(|NetworkError::Unsupported(name)| ApiError::UnsupportedNetwork(name))?;
    let contract = request
        .address
        .parse()
        .map_err(|_| ApiError::InvalidRequest(format!("invalid address {:?}", request.address)))?;

    // Token decimals come from the on-chain token when reachable, 18 otherwise.
    let reader = InjectorReader::new(RpcClient::new(descriptor.rpc_url), contract);
    let decimals = match reader.inject_token().await {
        Ok(token) => networks::token_decimals(token),
        Err(err) => {
            warn!("inject token lookup failed, assuming 18 decimals: {err}");
            networks::DEFAULT_TOKEN_DECIMALS
        }
    };

    // Run the rows through the edit layer so validation matches the UI path.
    let mut edits = EditSession::default();
    for entry in &request.entries {
        let key = edits.add_row().key.clone();
        edits
            .set_address(&key, entry.address.clone())
            .and_then(|_| edits.set_amount(&key, entry.amount_per_period.clone()))
            .and_then(|_| edits.set_max_periods(&key, entry.max_periods.clone()))
            .map_err(|err| ApiError::InvalidInput(err.to_string()))?;
    }
    let entries = edits
        .validated_entries()
        .map_err(|err| ApiError::InvalidInput(err.to_string()))?;

    let document = build_batch_payload(&descriptor, contract, decimals, &entries)
        .map_err(|err| ApiError::InvalidInput(err.to_string()))?;
    Ok(Json(document))
}

// ============================================================================
// Main Application
// ============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Starting Injector Dashboard API Server");

    let state = Arc::new(AppState {
        http: reqwest::Client::new(),
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .route("/health", get(health))
        .route("/directory", get(directory))
        .route("/payload", post(payload))
        .route("/:network/:address", get(dashboard))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Get port from environment or use default
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = format!("0.0.0.0:{}", port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    info!("Injector Dashboard API is ready!");
    info!("  - Health check: http://{}:{}/health", "localhost", port);
    info!("  - Directory: http://{}:{}/directory", "localhost", port);
    info!(
        "  - Dashboard: http://{}:{}/<network>/<address>",
        "localhost", port
    );
    info!(
        "  - Payload endpoint: POST http://{}:{}/payload",
        "localhost", port
    );

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_network_maps_to_bad_request() {
        let err: ApiError =
            SelectionError::Network(NetworkError::Unsupported("fantom".to_string())).into();
        assert!(matches!(err, ApiError::UnsupportedNetwork(_)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_error_maps_to_bad_gateway() {
        let response = ApiError::Upstream("rpc down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_payload_request_entries_default_empty() {
        let request: PayloadRequest = serde_json::from_str(
            r#"{"network":"polygon","address":"0xab8254016ba286d0c51a92b2a1b0acec1dc2d7cb"}"#,
        )
        .unwrap();
        assert!(request.entries.is_empty());
    }
}
