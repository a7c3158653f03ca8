//! Demo routes used to exercise the metrics middleware.

use std::time::Duration;

use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestMetrics;
use crate::tags::HandlerRef;

/// Upper bound for `/slow?ms=` so a request cannot pin a connection forever.
const MAX_SLOW_MS: u64 = 10_000;

#[derive(Serialize)]
struct IndexResponse {
    service: &'static str,
    status: &'static str,
}

#[derive(Serialize)]
struct ItemResponse {
    id: u64,
    name: String,
}

#[derive(Deserialize)]
struct SlowParams {
    ms: Option<u64>,
}

#[derive(Serialize)]
struct SlowResponse {
    slept_ms: u64,
}

type Tagged<T> = (Extension<HandlerRef>, Json<T>);

fn tagged<T>(handler: &'static str, body: T) -> Tagged<T> {
    (Extension(HandlerRef::new(handler)), Json(body))
}

async fn index() -> Tagged<IndexResponse> {
    tagged(
        "index",
        IndexResponse {
            service: "web-metrics-demo",
            status: "ok",
        },
    )
}

async fn show_item(Path(id): Path<String>) -> AppResult<Tagged<ItemResponse>> {
    let id: u64 = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid item id: {id}")))?;

    Ok(tagged(
        "show_item",
        ItemResponse {
            id,
            name: format!("item {id}"),
        },
    ))
}

#[derive(Debug, thiserror::Error)]
#[error("simulated failure")]
struct SimulatedFailure;

async fn fail() -> AppResult<Json<()>> {
    Err(AppError::internal(SimulatedFailure))
}

async fn slow(Query(params): Query<SlowParams>) -> Tagged<SlowResponse> {
    let slept_ms = params.ms.unwrap_or(250).min(MAX_SLOW_MS);
    tokio::time::sleep(Duration::from_millis(slept_ms)).await;
    tagged("slow", SlowResponse { slept_ms })
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Create the demo router.
pub fn router() -> Router<RequestMetrics> {
    Router::new()
        .route("/", get(index))
        .route("/items/{id}", get(show_item))
        .route("/items/{id}/", get(show_item))
        .route("/fail", get(fail))
        .route("/slow", get(slow))
        .fallback(not_found)
}
