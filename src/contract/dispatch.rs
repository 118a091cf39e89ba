//! Dispatch orchestration: acquire both documents, then send one email.
//!
//! Acquisition prefers the copies stored on the order. On a miss the
//! pre-info template is fetched, both kinds are rendered, and the pair is
//! written with a conditional update. A writer that loses the race adopts
//! the winner's documents so every send for an order carries the same PDFs.

use rusqlite::Connection;
use serde::Serialize;

use super::content::RenderStamp;
use super::email::EmailTransport;
use super::notification::{compose, NotificationConfig};
use super::renderer::ContractRenderer;
use super::resolver::resolve;
use super::store::{self, ContractBlobs, SaveOutcome, StoredContracts, CONTRACT_STAMP_FORMAT};
use super::types::{ContractInput, DispatchInput, DispatchRequest};
use super::ContractError;
use crate::db::{get_legal_template, PRE_INFO_TEMPLATE_KIND};
use crate::models::DocumentKind;

/// Where the attached documents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    /// Reused from the order row, nothing rendered.
    Stored,
    /// Rendered and saved on the order row.
    Generated,
    /// Rendered but not saved (no order id, or the save failed).
    GeneratedUnsaved,
    /// Rendered, but a concurrent dispatch saved first; its copies were sent.
    AdoptedConcurrent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub order_id: Option<String>,
    pub source: DocumentSource,
    pub message_id: String,
}

/// Base64 pair as attached and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DocumentPair {
    pre_info: String,
    distance_sales: String,
}

pub struct ContractDispatcher {
    renderer: Box<dyn ContractRenderer>,
    transport: Box<dyn EmailTransport>,
    notification: NotificationConfig,
}

impl ContractDispatcher {
    pub fn new(
        renderer: Box<dyn ContractRenderer>,
        transport: Box<dyn EmailTransport>,
        notification: NotificationConfig,
    ) -> Self {
        Self {
            renderer,
            transport,
            notification,
        }
    }

    /// Validates a raw trigger payload and dispatches it.
    pub fn dispatch(
        &self,
        conn: &Connection,
        request: DispatchRequest,
    ) -> Result<DispatchOutcome, ContractError> {
        let input = request.validate()?;
        self.dispatch_input(conn, input)
    }

    pub fn dispatch_input(
        &self,
        conn: &Connection,
        input: DispatchInput,
    ) -> Result<DispatchOutcome, ContractError> {
        let (order_id, contract_input) = match input {
            DispatchInput::Full { order_id, input } => (order_id, input),
            DispatchInput::ByOrder { order_id } => {
                let input = resolve(conn, &order_id)?;
                (Some(order_id), input)
            }
        };

        let (documents, source) = match order_id.as_deref() {
            Some(id) => self.acquire(conn, id, &contract_input)?,
            None => (
                self.render_pair(conn, &contract_input, &RenderStamp::now())?,
                DocumentSource::GeneratedUnsaved,
            ),
        };

        let email = compose(
            &self.notification,
            &contract_input,
            &[
                (DocumentKind::PreInfo, documents.pre_info.as_str()),
                (DocumentKind::DistanceSales, documents.distance_sales.as_str()),
            ],
        );

        let message_id = self.transport.send(&email).map_err(|e| {
            tracing::error!(
                order_id = order_id.as_deref().unwrap_or("-"),
                error = %e,
                "Contract email send failed"
            );
            e
        })?;

        tracing::info!(
            order_id = order_id.as_deref().unwrap_or("-"),
            source = ?source,
            message_id = %message_id,
            "Contract email sent"
        );

        Ok(DispatchOutcome {
            order_id,
            source,
            message_id,
        })
    }

    fn acquire(
        &self,
        conn: &Connection,
        order_id: &str,
        input: &ContractInput,
    ) -> Result<(DocumentPair, DocumentSource), ContractError> {
        let expected = match store::try_load(conn, order_id)? {
            StoredContracts::Hit(docs) => {
                tracing::debug!(order_id, "Reusing stored contracts");
                return Ok((
                    DocumentPair {
                        pre_info: docs.pre_info,
                        distance_sales: docs.distance_sales,
                    },
                    DocumentSource::Stored,
                ));
            }
            StoredContracts::Miss { generated_at } => generated_at,
        };

        let stamp = RenderStamp::now();
        let documents = self.render_pair(conn, input, &stamp)?;
        let blobs = ContractBlobs {
            pre_info: documents.pre_info.clone(),
            distance_sales: documents.distance_sales.clone(),
            generated_at: stamp.rendered_at.format(CONTRACT_STAMP_FORMAT).to_string(),
            client_ip: input.client_ip.clone(),
        };

        match store::save(conn, order_id, &blobs, expected.as_deref()) {
            Ok(SaveOutcome::Saved) => {
                tracing::info!(order_id, "Contracts generated and stored");
                Ok((documents, DocumentSource::Generated))
            }
            Ok(SaveOutcome::Superseded) => match store::try_load(conn, order_id)? {
                StoredContracts::Hit(docs) => {
                    tracing::info!(
                        order_id,
                        "Concurrent dispatch stored contracts first, adopting them"
                    );
                    Ok((
                        DocumentPair {
                            pre_info: docs.pre_info,
                            distance_sales: docs.distance_sales,
                        },
                        DocumentSource::AdoptedConcurrent,
                    ))
                }
                StoredContracts::Miss { .. } => {
                    tracing::warn!(
                        order_id,
                        "Contracts superseded but not readable, sending fresh copies"
                    );
                    Ok((documents, DocumentSource::GeneratedUnsaved))
                }
            },
            Err(e) => {
                let err = ContractError::Persistence(e);
                tracing::warn!(order_id, error = %err, "Sending contracts without storing them");
                Ok((documents, DocumentSource::GeneratedUnsaved))
            }
        }
    }

    fn render_pair(
        &self,
        conn: &Connection,
        input: &ContractInput,
        stamp: &RenderStamp,
    ) -> Result<DocumentPair, ContractError> {
        let legal_text = match get_legal_template(conn, PRE_INFO_TEMPLATE_KIND) {
            Ok(text) => text,
            Err(e) => {
                let err = ContractError::TemplateUnavailable(e.to_string());
                tracing::warn!(error = %err, "Rendering pre-info form with default heading");
                None
            }
        };

        let pre_info = self
            .renderer
            .render(DocumentKind::PreInfo, input, legal_text.as_deref(), stamp)?;
        let distance_sales = self
            .renderer
            .render(DocumentKind::DistanceSales, input, None, stamp)?;

        Ok(DocumentPair {
            pre_info: pre_info.to_base64(),
            distance_sales: distance_sales.to_base64(),
        })
    }
}
