//! REST router: thin HTTP adaptation of the engine's read queries.
//!
//! Used by the binary and by integration tests; create with
//! [`create_router`]. Uses Extension for state so the router is `Router<()>`
//! and works with `into_make_service()`. The engine is immutable, so
//! handlers share it without locking.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::history::{is_date_format, Close};
use crate::{DateMatch, Engine};

/// Shared app state: one engine per process.
#[derive(Clone)]
pub struct AppState {
    pub(crate) engine: Arc<Engine>,
}

/// Builds the REST router around a loaded engine.
pub fn create_router(engine: Arc<Engine>) -> Router<()> {
    let state = AppState { engine };
    Router::new()
        .route("/health", get(health))
        .route("/btc-price", get(btc_price))
        .route("/btc-range", get(btc_range))
        .route("/match", get(match_date))
        .layer(Extension(state))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[derive(serde::Deserialize)]
struct DateQuery {
    date: Option<String>,
}

fn invalid_date() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": "Invalid or missing date. Use ?date=YYYY-MM-DD" })),
    )
        .into_response()
}

fn no_data() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "No BTC data available for that date" })),
    )
        .into_response()
}

async fn btc_price(
    Extension(state): Extension<AppState>,
    Query(query): Query<DateQuery>,
) -> Response {
    let Some(date) = query.date.filter(|d| is_date_format(d)) else {
        return invalid_date();
    };
    match state.engine.close_as_of(&date) {
        Some(close) => {
            #[derive(serde::Serialize)]
            #[serde(rename_all = "camelCase")]
            struct Out {
                date_requested: String,
                #[serde(flatten)]
                close: Close,
            }
            (
                StatusCode::OK,
                Json(Out {
                    date_requested: date,
                    close,
                }),
            )
                .into_response()
        }
        None => no_data(),
    }
}

async fn btc_range(Extension(state): Extension<AppState>) -> Response {
    match state.engine.range() {
        Some(range) => (StatusCode::OK, Json(range)).into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "BTC history dataset unavailable" })),
        )
            .into_response(),
    }
}

async fn match_date(
    Extension(state): Extension<AppState>,
    Query(query): Query<DateQuery>,
) -> Response {
    let Some(date) = query.date.filter(|d| is_date_format(d)) else {
        return invalid_date();
    };
    match state.engine.match_on_date(&date) {
        Some(matched) => {
            #[derive(serde::Serialize)]
            #[serde(rename_all = "camelCase")]
            struct Out {
                date_requested: String,
                #[serde(flatten)]
                matched: DateMatch,
            }
            (
                StatusCode::OK,
                Json(Out {
                    date_requested: date,
                    matched,
                }),
            )
                .into_response()
        }
        None => no_data(),
    }
}
