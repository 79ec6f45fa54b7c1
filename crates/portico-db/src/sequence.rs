//! Integer id allocation.
//!
//! Each table draws ids from its own counter row in `_sequence`. The
//! increment is a single-row UPSERT, so allocation is atomic at the
//! store level.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SequenceRow {
    value: i64,
}

/// Allocate the next id for `table`.
pub(crate) async fn next_id<C: Connection>(db: &Surreal<C>, table: &str) -> Result<i64, DbError> {
    let mut result = db
        .query("UPSERT type::record('_sequence', $table) SET value += 1 RETURN AFTER")
        .bind(("table", table.to_string()))
        .await?;

    let rows: Vec<SequenceRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(|r| r.value)
        .ok_or_else(|| DbError::Decode(format!("sequence allocation returned no row for {table}")))
}
