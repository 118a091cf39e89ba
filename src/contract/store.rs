//! Contract persistence on the order row.
//!
//! Both documents live as base64 TEXT columns next to `contract_generated_at`.
//! Writes are conditional on the `contract_generated_at` value observed at load
//! time, so two first dispatches for the same order cannot both win.

use base64::Engine;
use rusqlite::{params, Connection, OptionalExtension};

use super::ContractError;
use crate::db::DatabaseError;
use crate::models::DocumentKind;

/// Millisecond resolution keeps successive generations distinguishable.
pub const CONTRACT_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocuments {
    pub pre_info: String,
    pub distance_sales: String,
    pub generated_at: Option<String>,
}

impl StoredDocuments {
    pub fn base64_for(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::PreInfo => &self.pre_info,
            DocumentKind::DistanceSales => &self.distance_sales,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredContracts {
    /// Both documents present and non-empty.
    Hit(StoredDocuments),
    /// Anything less. `generated_at` is the CAS token for `save`.
    Miss { generated_at: Option<String> },
}

/// A freshly rendered pair, ready to write.
#[derive(Debug, Clone)]
pub struct ContractBlobs {
    pub pre_info: String,
    pub distance_sales: String,
    pub generated_at: String,
    pub client_ip: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Another writer stored a generation after our load.
    Superseded,
}

pub fn try_load(conn: &Connection, order_id: &str) -> Result<StoredContracts, ContractError> {
    let row = conn
        .query_row(
            "SELECT pre_info_document, distance_sales_document, contract_generated_at
             FROM orders WHERE id = ?1",
            params![order_id],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()
        .map_err(DatabaseError::from)?;

    let Some((pre_info, distance_sales, generated_at)) = row else {
        return Err(ContractError::OrderNotFound(order_id.to_string()));
    };

    match (non_empty(pre_info), non_empty(distance_sales)) {
        (Some(pre_info), Some(distance_sales)) => Ok(StoredContracts::Hit(StoredDocuments {
            pre_info,
            distance_sales,
            generated_at,
        })),
        _ => Ok(StoredContracts::Miss { generated_at }),
    }
}

/// Writes both documents in one statement if `contract_generated_at` still
/// equals `expected`.
pub fn save(
    conn: &Connection,
    order_id: &str,
    blobs: &ContractBlobs,
    expected: Option<&str>,
) -> Result<SaveOutcome, DatabaseError> {
    let changed = conn.execute(
        "UPDATE orders
         SET pre_info_document = ?1, distance_sales_document = ?2,
             contract_generated_at = ?3, contract_client_ip = ?4
         WHERE id = ?5 AND contract_generated_at IS ?6",
        params![
            blobs.pre_info,
            blobs.distance_sales,
            blobs.generated_at,
            blobs.client_ip,
            order_id,
            expected,
        ],
    )?;
    if changed == 1 {
        return Ok(SaveOutcome::Saved);
    }

    let exists = conn
        .query_row("SELECT 1 FROM orders WHERE id = ?1", params![order_id], |_| Ok(()))
        .optional()?
        .is_some();
    if exists {
        Ok(SaveOutcome::Superseded)
    } else {
        Err(DatabaseError::NotFound {
            entity_type: "Order".into(),
            id: order_id.into(),
        })
    }
}

/// Decoded PDF bytes of one stored document, `None` when not generated yet.
pub fn load_document(
    conn: &Connection,
    order_id: &str,
    kind: DocumentKind,
) -> Result<Option<Vec<u8>>, ContractError> {
    let StoredContracts::Hit(docs) = try_load(conn, order_id)? else {
        return Ok(None);
    };
    base64::engine::general_purpose::STANDARD
        .decode(docs.base64_for(kind))
        .map(Some)
        .map_err(|e| {
            ContractError::Database(DatabaseError::ConstraintViolation(format!(
                "stored {} document for order {order_id} is not valid base64: {e}",
                kind.as_str()
            )))
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
