//! Tenant domain model.
//!
//! A tenant is one independently branded property sharing the backend
//! and database. Every inbound request is attributed to exactly one
//! tenant before any business logic runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One branded property served by the shared backend.
///
/// Tenants are created and deactivated by an out-of-scope provisioning
/// process; this core only ever reads them. At most one *active* tenant
/// exists per `code` and per `primary_domain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Stable integer identifier.
    pub id: i64,
    /// Short stable code, unique among active tenants (e.g., `acme`).
    pub code: String,
    /// Human-readable display name.
    pub name: String,
    /// Hostname used for origin-based resolution (e.g., `acme.example`).
    pub primary_domain: String,
    pub active: bool,
    /// Arbitrary display metadata (branding, theming).
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to provision a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub code: String,
    pub name: String,
    pub primary_domain: String,
    pub metadata: Option<serde_json::Value>,
}
