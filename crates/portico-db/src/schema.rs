//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! Record ids are integers allocated from the `_sequence` table.
//! The code/domain indexes on `tenant` are deliberately non-unique:
//! uniqueness holds only among *active* tenants and is owned by the
//! provisioning collaborator.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Integer id allocation (one counter row per table)
-- =======================================================================
DEFINE TABLE _sequence SCHEMAFULL;
DEFINE FIELD value ON TABLE _sequence TYPE int DEFAULT 0;

-- =======================================================================
-- Tenants (branded properties; read-only to this core)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD code ON TABLE tenant TYPE string;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD primary_domain ON TABLE tenant TYPE string;
DEFINE FIELD active ON TABLE tenant TYPE bool DEFAULT true;
DEFINE FIELD metadata ON TABLE tenant TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_code ON TABLE tenant COLUMNS code;
DEFINE INDEX idx_tenant_domain ON TABLE tenant COLUMNS primary_domain;

-- =======================================================================
-- Admin users
-- =======================================================================
DEFINE TABLE admin_user SCHEMAFULL;
DEFINE FIELD email ON TABLE admin_user TYPE string;
DEFINE FIELD password_hash ON TABLE admin_user TYPE string;
DEFINE FIELD name ON TABLE admin_user TYPE string;
DEFINE FIELD role ON TABLE admin_user TYPE string;
-- Absent tenant_id marks a super admin (authorized everywhere).
DEFINE FIELD tenant_id ON TABLE admin_user TYPE option<int>;
DEFINE FIELD active ON TABLE admin_user TYPE bool DEFAULT true;
DEFINE FIELD last_login_at ON TABLE admin_user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE admin_user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE admin_user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_admin_user_email ON TABLE admin_user COLUMNS email;

-- =======================================================================
-- Admin-user-to-tenant bindings (record id: '<user_id>:<tenant_id>')
-- =======================================================================
DEFINE TABLE admin_user_tenant SCHEMAFULL;
DEFINE FIELD user_id ON TABLE admin_user_tenant TYPE int;
DEFINE FIELD tenant_id ON TABLE admin_user_tenant TYPE int;
DEFINE FIELD role ON TABLE admin_user_tenant TYPE string;
DEFINE INDEX idx_binding_user ON TABLE admin_user_tenant \
    COLUMNS user_id;

-- =======================================================================
-- Sessions (opaque bearer tokens, stored as SHA-256 hashes)
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE int;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD ip_address ON TABLE session TYPE option<string>;
DEFINE FIELD user_agent ON TABLE session TYPE option<string>;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
