use crate::endpoint::{Changes, Endpoint};
use crate::provider::AdjustError;
use crate::webhook::headers::{check_header, HeaderKind};
use crate::webhook::health::health;
use crate::webhook::request_log::RequestLog;
use crate::webhook::server::AppState;
use crate::webhook::webhook_error::{WebhookError, TEXT_PLAIN};
use anyhow::anyhow;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, VARY};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::future::Future;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub const NEGOTIATE_PATH: &str = "/";
pub const RECORDS_PATH: &str = "/records";
pub const ADJUST_ENDPOINTS_PATH: &str = "/adjustendpoints";

const VARY_CONTENT_TYPE: &str = "Content-Type";

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route(NEGOTIATE_PATH, get(negotiate))
        .route(RECORDS_PATH, get(records).post(apply_changes))
        .route(ADJUST_ENDPOINTS_PATH, post(adjust_endpoints))
        .fallback(not_found)
        .layer(middleware::from_fn(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Await a provider call, failing it once `limit` elapses. Expiry drops the call.
async fn within<F: Future>(limit: Option<Duration>, call: F) -> Result<F::Output, WebhookError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            WebhookError::Provider(anyhow!("provider call did not finish within {limit:?}"))
        }),
        None => Ok(call.await),
    }
}

/// Buffer a request body. Callers check headers first so rejected requests are never read.
async fn read_body(body: Body, log: &RequestLog) -> Result<Bytes, WebhookError> {
    hyper::body::to_bytes(body)
        .await
        .map_err(|err| log.reject(WebhookError::ReadBody(err), "failed to read request body"))
}

#[allow(clippy::unused_async)]
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn negotiate(
    State(state): State<AppState>,
    log: RequestLog,
    headers: HeaderMap,
) -> Result<Response, WebhookError> {
    let media_type = check_header(HeaderKind::Accept, &headers, &state.media_types)
        .map_err(|err| log.reject(err, "accept header check failed"))?;

    let body = serde_json::to_vec(&state.provider.domain_filter())
        .map_err(|err| log.reject(WebhookError::Encode(err), "failed to marshal domain filter"))?;
    Ok(([(CONTENT_TYPE, media_type.as_str())], body).into_response())
}

async fn records(
    State(state): State<AppState>,
    log: RequestLog,
    headers: HeaderMap,
) -> Result<Response, WebhookError> {
    let media_type = check_header(HeaderKind::Accept, &headers, &state.media_types)
        .map_err(|err| log.reject(err, "accept header check failed"))?;

    log.debug("requesting records");
    let records = within(state.provider_timeout, state.provider.records())
        .await
        .and_then(|result| result.map_err(WebhookError::Provider))
        .map_err(|err| log.reject(err, "error getting records"))?;
    log.debug(format_args!("returning records count: {}", records.len()));

    let body = serde_json::to_vec(&records)
        .map_err(|err| log.reject(WebhookError::Encode(err), "error encoding records"))?;
    Ok((
        [
            (CONTENT_TYPE, media_type.as_str()),
            (VARY, VARY_CONTENT_TYPE),
        ],
        body,
    )
        .into_response())
}

async fn apply_changes(
    State(state): State<AppState>,
    log: RequestLog,
    request: Request<Body>,
) -> Result<StatusCode, WebhookError> {
    let (parts, body) = request.into_parts();
    check_header(HeaderKind::ContentType, &parts.headers, &state.media_types)
        .map_err(|err| log.reject(err, "content type header check failed"))?;
    let body = read_body(body, &log).await?;

    let changes: Changes = serde_json::from_slice(&body).map_err(|source| {
        let err = WebhookError::Decode {
            context: "error decoding changes",
            source,
        };
        log.reject(err, "rejected change set")
    })?;
    log.debug(format_args!(
        "requesting apply changes, create: {}, updateOld: {}, updateNew: {}, delete: {}",
        changes.create.len(),
        changes.update_old.len(),
        changes.update_new.len(),
        changes.delete.len(),
    ));

    within(state.provider_timeout, state.provider.apply_changes(changes))
        .await
        .and_then(|result| result.map_err(WebhookError::Provider))
        .map_err(|err| log.reject(err, "error applying changes"))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn adjust_endpoints(
    State(state): State<AppState>,
    log: RequestLog,
    request: Request<Body>,
) -> Result<Response, WebhookError> {
    let (parts, body) = request.into_parts();
    check_header(HeaderKind::ContentType, &parts.headers, &state.media_types)
        .map_err(|err| log.reject(err, "content type header check failed"))?;
    let media_type = check_header(HeaderKind::Accept, &parts.headers, &state.media_types)
        .map_err(|err| log.reject(err, "accept header check failed"))?;
    let body = read_body(body, &log).await?;

    let endpoints: Vec<Endpoint> = serde_json::from_slice(&body).map_err(|source| {
        let err = WebhookError::Decode {
            context: "failed to decode request body",
            source,
        };
        log.reject(err, "rejected endpoints")
    })?;
    log.debug(format_args!("requesting adjust endpoints count: {}", endpoints.len()));

    let adjusted = within(state.provider_timeout, state.provider.adjust_endpoints(endpoints))
        .await
        .map_err(|err| log.reject(err, "failed to call adjust endpoints"))?;
    match adjusted {
        Ok(adjusted) => {
            log.debug(format_args!(
                "return adjust endpoints response, resultEndpointCount: {}",
                adjusted.len()
            ));
            let body = serde_json::to_vec(&adjusted).map_err(|err| {
                log.reject(WebhookError::Encode(err), "error encoding endpoints")
            })?;
            Ok((
                [
                    (CONTENT_TYPE, media_type.as_str()),
                    (VARY, VARY_CONTENT_TYPE),
                ],
                body,
            )
                .into_response())
        }
        // The controller still receives whatever the provider salvaged, flagged by the status.
        Err(AdjustError { endpoints, error }) => {
            log.error(&error, "failed to call adjust endpoints");
            let body = serde_json::to_vec(&endpoints).map_err(|err| {
                log.reject(WebhookError::Encode(err), "error encoding endpoints")
            })?;
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, TEXT_PLAIN)],
                body,
            )
                .into_response())
        }
    }
}
