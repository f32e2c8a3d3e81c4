//! Event-Stream Adapter
//!
//! `GET /mcp/sse` opens a long-lived SSE connection backed by a fresh
//! server instance; the first event names the companion message-post
//! endpoint, and every relayed request's response is pushed as a `message`
//! event. `POST /mcp/messages?sessionId=<id>` feeds follow-up requests
//! into the matching open session.

use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info};

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use crate::session::{spawn_session, SessionStream};
use crate::transport::http::{internal_error, SharedState};

/// Path clients post follow-up messages to
pub const MESSAGES_PATH: &str = "/mcp/messages";

/// Response header exposing the generated session identifier
pub const SESSION_ID_HEADER: &str = "mcp-session-id";

/// Open a new event-stream session.
pub async fn sse_open_handler(State(state): State<SharedState>) -> Response {
    let server = state.create_server();
    let (session_id, outbound_rx, guard) = spawn_session(server, &state.sessions);

    info!(session_id = %session_id, "SSE connection established");

    let header_value = match HeaderValue::from_str(&session_id) {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "Generated session id is not a valid header value");
            return internal_error();
        }
    };

    let endpoint = format!("{MESSAGES_PATH}?sessionId={session_id}");
    let initial = stream::iter(vec![Ok::<_, Infallible>(
        Event::default().event("endpoint").data(endpoint),
    )]);
    let responses = ReceiverStream::new(outbound_rx)
        .map(|frame| Ok(Event::default().event("message").data(frame)));

    let sse = Sse::new(SessionStream::new(initial.chain(responses), guard)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    );

    let mut response = sse.into_response();
    response.headers_mut().insert(SESSION_ID_HEADER, header_value);
    response
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Relay a posted message into its open session.
pub async fn message_post_handler(
    State(state): State<SharedState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(session_id) = query.session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing sessionId parameter" })),
        )
            .into_response();
    };

    let Some(handle) = state.sessions.resolve(&session_id) else {
        return session_not_found();
    };

    let request: McpRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
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

    // The session can close between resolve and relay; treat that the same
    // as an unknown id.
    if handle.relay(request).await.is_err() {
        return session_not_found();
    }

    StatusCode::ACCEPTED.into_response()
}

fn session_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Session not found" })),
    )
        .into_response()
}
