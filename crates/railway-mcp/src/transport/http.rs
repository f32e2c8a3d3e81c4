//! HTTP Front Door
//!
//! Single listener for both HTTP transports. Every request gets CORS
//! headers and credential extraction before the route table dispatches to
//! the health endpoint, the stateless adapter (`POST`/`DELETE /mcp`), or
//! the event-stream adapter (`GET /mcp/sse`, `POST /mcp/messages`). Any
//! unmatched path or method answers a structured 404.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use crate::server::McpServer;
use crate::session::SessionRegistry;
use crate::transport::sse;
use crate::{SERVER_NAME, SERVER_VERSION};
use railway_cli::{credentials::env_tokens_present, CredentialStore};
use railway_core::Result;
use railway_tools::ToolRegistry;

/// Shared state behind every HTTP handler
pub struct AppState {
    registry: Arc<ToolRegistry>,
    /// Single server instance shared by all stateless request cycles
    stateless: Arc<McpServer>,
    pub sessions: Arc<SessionRegistry>,
    pub credentials: Arc<CredentialStore>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(registry: Arc<ToolRegistry>, credentials: Arc<CredentialStore>) -> SharedState {
        let stateless = Arc::new(McpServer::new(registry.clone()));
        Arc::new(Self {
            registry,
            stateless,
            sessions: Arc::new(SessionRegistry::new()),
            credentials,
        })
    }

    /// Fresh server instance for a new event-stream session.
    pub fn create_server(&self) -> McpServer {
        McpServer::new(self.registry.clone())
    }
}

/// Build the front-door route table.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(health_handler).fallback(not_found_handler))
        .route("/health", get(health_handler).fallback(not_found_handler))
        .route(
            "/mcp",
            post(stateless_post_handler)
                .delete(stateless_delete_handler)
                .fallback(not_found_handler),
        )
        .route(
            "/mcp/sse",
            get(sse::sse_open_handler).fallback(not_found_handler),
        )
        .route(
            "/mcp/messages",
            post(sse::message_post_handler).fallback(not_found_handler),
        )
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            extract_credentials,
        ))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Bind the listener and serve until the process exits. A bind failure is
/// the only fatal error.
pub async fn serve(state: SharedState, addr: &str) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Railway MCP Server running on http://{addr}");
    info!("SSE endpoint: http://{addr}/mcp/sse");
    info!("Messages endpoint: http://{addr}/mcp/messages");

    axum::serve(listener, app).await?;
    Ok(())
}

// === Middleware ===

/// Unconditional CORS headers plus the OPTIONS preflight short-circuit.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET, POST, OPTIONS, DELETE"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static(
            "Content-Type, Accept, Authorization, Mcp-Session-Id, X-Railway-Token, \
             Railway-Token, X-Railway-Api-Token, Railway-Api-Token",
        ),
    );
}

/// Pull caller credentials out of the request headers into the active slot.
/// Runs for every request; absent headers overwrite the slot with "no
/// override", so stale credentials never outlive the requests that follow.
async fn extract_credentials(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let token = first_header(headers, &["x-railway-token", "railway-token"]);
    let api_token = first_header(headers, &["x-railway-api-token", "railway-api-token"]);

    state.credentials.set_active(token, api_token);
    next.run(request).await
}

fn first_header(headers: &HeaderMap, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

// === Health ===

async fn health_handler() -> Json<serde_json::Value> {
    let (env_token_set, env_api_token_set) = env_tokens_present();

    Json(json!({
        "status": "ok",
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "transport": "http",
        "endpoints": {
            "mcp": "/mcp",
            "sse": "/mcp/sse",
            "messages": "/mcp/messages",
            "health": "/health"
        },
        "auth": {
            "envTokenSet": env_token_set,
            "envApiTokenSet": env_api_token_set,
            "headerTokenSupported": true,
            "headerTokenInstructions":
                "Pass X-Railway-Token (project token) or X-Railway-Api-Token (account/team \
                 token) with each request to override the server's default credentials."
        }
    }))
}

// === Stateless adapter ===

async fn stateless_post_handler(State(state): State<SharedState>, body: String) -> Response {
    let request: McpRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Rejecting unparseable request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(McpResponse::error(
                    None,
                    JsonRpcError::parse_error(e.to_string()),
                )),
            )
                .into_response();
        }
    };

    match state.stateless.handle_request(request).await {
        Some(response) => Json(response).into_response(),
        // Notification: accepted, nothing to answer.
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Protocol-level session teardown. This adapter keeps no per-session
/// state, so the teardown is acknowledged as-is.
async fn stateless_delete_handler() -> Response {
    debug!("Session teardown requested on stateless endpoint");
    Json(json!({ "status": "ok" })).into_response()
}

// === Errors ===

async fn not_found_handler(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "path": uri.path() })),
    )
        .into_response()
}

/// Structured 500 for failures caught before any response bytes went out.
pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
