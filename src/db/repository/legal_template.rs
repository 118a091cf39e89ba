use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::DB_DATETIME_FORMAT;
use crate::db::DatabaseError;

/// Tag of the only externally editable template.
pub const PRE_INFO_TEMPLATE_KIND: &str = "pre_info";

/// Current legal boilerplate for a document-type tag, if one was ever saved.
pub fn get_legal_template(conn: &Connection, kind: &str) -> Result<Option<String>, DatabaseError> {
    conn.query_row(
        "SELECT content FROM legal_templates WHERE kind = ?1",
        params![kind],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Inserts or replaces the boilerplate for a tag.
pub fn upsert_legal_template(
    conn: &Connection,
    kind: &str,
    content: &str,
) -> Result<(), DatabaseError> {
    if kind.trim().is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "legal template kind must not be empty".into(),
        ));
    }
    let now = Utc::now().naive_utc().format(DB_DATETIME_FORMAT).to_string();
    conn.execute(
        "INSERT INTO legal_templates (kind, content, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(kind) DO UPDATE SET content = excluded.content,
                                         updated_at = excluded.updated_at",
        params![kind, content, now],
    )?;
    Ok(())
}
