//! Order endpoints.
//!
//! - `POST /api/orders` — place an order, then dispatch its contracts
//! - `GET /api/orders/:id/contracts/:kind` — stored PDF
//! - `DELETE /api/orders/:id` — soft delete
//! - `POST /api/orders/:id/restore`

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::contract::{load_document, ContractInput, DispatchInput, DispatchRequest};
use crate::db::{insert_order, restore_order, soft_delete_order};
use crate::models::{DocumentKind, NewOrder, OrderStatus};

/// Checkout / admin payload: the dispatch payload plus order-only fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    pub contract: DispatchRequest,
    pub package_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub contract_email_sent: bool,
}

/// `POST /api/orders` — the order is kept even when the contract email fails.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), ApiError> {
    let status = match request.status.as_deref() {
        Some(raw) => OrderStatus::from_str(raw)
            .map_err(|_| ApiError::BadRequest(format!("unknown status: {raw}")))?,
        None => OrderStatus::Completed,
    };
    let mut contract = request.contract;
    contract.order_id = None;
    let input = match contract.validate()? {
        DispatchInput::Full { input, .. } => input,
        DispatchInput::ByOrder { .. } => {
            return Err(ApiError::BadRequest(
                "customerData and packageData are required".into(),
            ))
        }
    };
    let new_order = new_order_from(&input, request.package_type, status);

    let response = ctx
        .with_db(move |conn, dispatcher| {
            let order_id = insert_order(conn, &new_order)?;
            tracing::info!(order_id = %order_id, "Order created");

            let dispatched = dispatcher.dispatch_input(
                conn,
                DispatchInput::Full {
                    order_id: Some(order_id.clone()),
                    input,
                },
            );
            let contract_email_sent = match dispatched {
                Ok(_) => true,
                Err(e) => {
                    tracing::error!(
                        order_id = %order_id,
                        error = %e,
                        "Contract dispatch failed for new order"
                    );
                    false
                }
            };
            Ok(CreateOrderResponse {
                order_id,
                contract_email_sent,
            })
        })
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

fn new_order_from(
    input: &ContractInput,
    package_type: Option<String>,
    status: OrderStatus,
) -> NewOrder {
    let customer = &input.customer;
    NewOrder {
        customer_name: customer.full_name(),
        customer_email: customer.email.clone(),
        customer_phone: customer.phone.clone(),
        customer_tc_no: customer.tc_no.clone(),
        customer_address: customer.address.clone(),
        customer_city: customer.city.clone(),
        customer_postal_code: customer.postal_code.clone(),
        customer_type: customer.customer_type,
        company_name: customer.company_name.clone(),
        tax_no: customer.tax_no.clone(),
        tax_office: customer.tax_office.clone(),
        package_name: input.package.name.clone(),
        package_price: input.package.price,
        package_original_price: input.package.original_price,
        package_type: package_type.filter(|t| !t.trim().is_empty()),
        payment_method: Some(input.payment_method),
        status,
        client_ip: Some(input.client_ip.clone()),
    }
}

/// `GET /api/orders/:id/contracts/:kind` — `kind` is `pre_info` or `distance_sales`.
pub async fn contract_pdf(
    State(ctx): State<ApiContext>,
    Path((order_id, kind)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let kind = DocumentKind::from_str(&kind.replace('-', "_"))
        .map_err(|_| ApiError::BadRequest(format!("unknown document kind: {kind}")))?;

    let lookup = order_id.clone();
    let bytes = ctx
        .with_db(move |conn, _| Ok(load_document(conn, &lookup, kind)?))
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Contracts not generated yet for order {order_id}"))
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", kind.filename()),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(order_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.with_db(move |conn, _| Ok(soft_delete_order(conn, &order_id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore(
    State(ctx): State<ApiContext>,
    Path(order_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.with_db(move |conn, _| Ok(restore_order(conn, &order_id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
