//! Admin-user-to-tenant binding domain model.

use serde::{Deserialize, Serialize};

/// Grants one admin user one role within one tenant.
///
/// A user/tenant pair has at most one binding; re-granting replaces
/// the role. Super admins bypass this table entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantBinding {
    pub user_id: i64,
    pub tenant_id: i64,
    /// Per-tenant role (e.g., `editor`).
    pub role: String,
}
