// src/server/handlers.rs

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tracing::{debug, error};

use crate::render::{self, html, Format};
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    /// Explicit format name; takes precedence over `Accept`.
    pub format: Option<String>,
}

/// `GET /`
pub async fn get_info(State(state): State<AppState>) -> Html<String> {
    Html(html::index_page(&state.registry.keys()))
}

/// `GET /api/*key`
///
/// - 404 with an empty body when no dataset is registered under `key`. This
///   is decided before the query string or `Accept` is looked at.
/// - 400 when the query string is malformed, or when neither `?format=` nor
///   `Accept` names something we produce.
/// - 500 when rendering fails.
pub async fn get_data(
    State(state): State<AppState>,
    Path(key): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let key = key.trim_start_matches('/');

    let Some(dataset) = state.registry.get(key) else {
        debug!(key, "unknown dataset");
        return StatusCode::NOT_FOUND.into_response();
    };

    let query = match Query::<DataQuery>::try_from_uri(&uri) {
        Ok(Query(query)) => query,
        Err(rejection) => {
            debug!(key, error = %rejection, "malformed query string");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let format = match query.format.as_deref() {
        Some(name) => Format::from_name(name),
        None => {
            let accept = headers
                .get(header::ACCEPT)
                .and_then(|v| v.to_str().ok());
            Format::negotiate(accept)
        }
    };
    let Some(format) = format else {
        debug!(key, format = ?query.format, "no acceptable response format");
        return StatusCode::BAD_REQUEST.into_response();
    };

    match render::render(format, key, &dataset, &state.registry) {
        Ok(rendered) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, rendered.content_type)],
            rendered.body,
        )
            .into_response(),
        Err(e) => {
            error!(key, ?format, error = %e, "failed to render dataset");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
