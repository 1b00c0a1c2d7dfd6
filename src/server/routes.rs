//! HTTP handlers. Each one delegates to [`VisualMatcher`] and maps errors
//! through [`ApiError`].

use crate::application::match_products::MatchQuery;
use crate::domain::error::DomainError;
use crate::server::error::{ApiError, ApiResult};
use crate::VisualMatcher;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub type AppState = Arc<VisualMatcher>;

pub async fn health(State(matcher): State<AppState>) -> impl IntoResponse {
    let stats = matcher.stats();
    Json(json!({
        "status": "ok",
        "model": matcher.model_descriptor(),
        "products": stats.total_items,
        "embedded": stats.embedded_items,
        "dimension": stats.dimension,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductsParams {
    pub limit: Option<usize>,
}

pub async fn products(
    State(matcher): State<AppState>,
    params: Result<Query<ProductsParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) =
        params.map_err(|e| DomainError::InvalidInput(e.body_text()))?;
    Ok(Json(matcher.products(params.limit)))
}

pub async fn image(
    State(matcher): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    // Names that cannot even be decoded are as absent as missing files.
    let Path(name) = name.map_err(|e| {
        tracing::debug!(rejection = %e.body_text(), "undecodable image name");
        DomainError::NotFound("Image not found".into())
    })?;
    let asset = matcher.asset(&name).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, asset.content_type)],
        asset.bytes,
    ))
}

pub async fn match_products(
    State(matcher): State<AppState>,
    body: Result<Json<MatchQuery>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(query) = body.map_err(reject_body)?;
    let results = matcher.match_query(query).await?;
    Ok(Json(results))
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(rejection.body_text());
    }
    DomainError::InvalidInput(format!("malformed request body: {}", rejection.body_text())).into()
}
