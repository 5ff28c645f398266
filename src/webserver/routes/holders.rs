/// Holder count endpoints
///
/// `GET /api/holders` is the public read and always answers 200 with a
/// number. Admin routes need `Authorization: Bearer <admin_token>`.
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    holders::{format_holder_count, HolderSource, SourceError},
    logger::{self, LogTag},
    webserver::{
        state::AppState,
        utils::{error_response, success_response},
    },
};

const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// Compact storefront view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayResponse {
    pub holders: u64,
    pub formatted: String,
    pub source: HolderSource,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRequest {
    pub holder_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub holders: u64,
    pub last_updated: DateTime<Utc>,
    pub written: Vec<&'static str>,
    pub skipped: Vec<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holders", get(get_holders))
        .route("/holders/display", get(get_holders_display))
        .route("/holders/status", get(get_holders_status))
        .route("/holders/diagnostics", get(get_holders_diagnostics))
        .route("/admin/holders", post(seed_holders))
}

fn with_no_store(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

/// Byte comparison whose timing does not depend on where the inputs differ
fn tokens_match(provided: &str, expected: &str) -> bool {
    let (provided, expected) = (provided.as_bytes(), expected.as_bytes());
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Admin gate: 403 when no token is configured, 401 on a missing or wrong one
fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "ADMIN_DISABLED",
            "Admin endpoints are disabled",
            None,
        ));
    };

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match provided {
        Some(token) if tokens_match(token, expected) => Ok(()),
        _ => {
            logger::warning(LogTag::Webserver, "Rejected admin request with bad token");
            Err(error_response(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing or invalid bearer token",
                None,
            ))
        }
    }
}

/// GET /api/holders
async fn get_holders(State(state): State<Arc<AppState>>) -> Response {
    let response = state.service.resolve().await;
    logger::debug(
        LogTag::Webserver,
        &format!(
            "GET /api/holders -> {} ({})",
            response.holders,
            response.source.as_str()
        ),
    );
    with_no_store((StatusCode::OK, Json(response)).into_response())
}

/// GET /api/holders/display
async fn get_holders_display(State(state): State<Arc<AppState>>) -> Response {
    let response = state.service.resolve().await;
    with_no_store(success_response(DisplayResponse {
        holders: response.holders,
        formatted: format_holder_count(response.holders),
        source: response.source,
        last_updated: response.last_updated,
    }))
}

/// GET /api/holders/status
async fn get_holders_status(State(state): State<Arc<AppState>>) -> Response {
    success_response(state.service.status(Utc::now()))
}

/// GET /api/holders/diagnostics
async fn get_holders_diagnostics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = require_admin(&state, &headers) {
        return rejection;
    }
    with_no_store(success_response(state.service.diagnose(Utc::now()).await))
}

/// POST /api/admin/holders
async fn seed_holders(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SeedRequest>,
) -> Response {
    if let Err(rejection) = require_admin(&state, &headers) {
        return rejection;
    }

    match state
        .service
        .seed_manual(request.holder_count, Utc::now())
        .await
    {
        Ok((record, report)) => success_response(SeedResponse {
            holders: record.count,
            last_updated: record.timestamp,
            written: report.written,
            skipped: report
                .skipped
                .into_iter()
                .map(|(tier, reason)| format!("{}: {}", tier, reason))
                .collect(),
        }),
        Err(SourceError::OutOfRange(value)) => error_response(
            StatusCode::BAD_REQUEST,
            "OUT_OF_RANGE",
            &format!(
                "holderCount {} is outside 1..{}",
                value,
                state.service.bounds().max_exclusive
            ),
            None,
        ),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SEED_FAILED",
            &e.to_string(),
            None,
        ),
    }
}
