//! Legal template endpoints.
//!
//! - `GET /api/legal-templates/:kind`
//! - `PUT /api/legal-templates/:kind`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::{get_legal_template, upsert_legal_template};

#[derive(Debug, Deserialize)]
pub struct TemplateBody {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub kind: String,
    pub content: String,
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Path(kind): Path<String>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let lookup = kind.clone();
    let content = ctx
        .with_db(move |conn, _| Ok(get_legal_template(conn, &lookup)?))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Legal template not found: {kind}")))?;
    Ok(Json(TemplateResponse { kind, content }))
}

/// Replaces the boilerplate; the next generated document picks it up.
pub async fn put(
    State(ctx): State<ApiContext>,
    Path(kind): Path<String>,
    Json(body): Json<TemplateBody>,
) -> Result<StatusCode, ApiError> {
    ctx.with_db(move |conn, _| Ok(upsert_legal_template(conn, &kind, &body.content)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
