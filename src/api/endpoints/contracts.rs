//! Contract dispatch endpoint.
//!
//! - `POST /api/contracts/dispatch` — full payload or `{ orderId }`

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::contract::{DispatchOutcome, DispatchRequest, DocumentSource};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub sent: bool,
    pub order_id: Option<String>,
    pub source: DocumentSource,
    pub message_id: String,
}

impl From<DispatchOutcome> for DispatchResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            sent: true,
            order_id: outcome.order_id,
            source: outcome.source,
            message_id: outcome.message_id,
        }
    }
}

/// `POST /api/contracts/dispatch` — acquire both documents and email them.
pub async fn dispatch(
    State(ctx): State<ApiContext>,
    Json(request): Json<DispatchRequest>,
) -> Result<Json<DispatchResponse>, ApiError> {
    let outcome = ctx
        .with_db(move |conn, dispatcher| dispatcher.dispatch(conn, request).map_err(ApiError::from))
        .await?;
    Ok(Json(outcome.into()))
}
