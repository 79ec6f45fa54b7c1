//! Portico Tenancy — request signal extraction, the tenant directory,
//! the prioritized tenant resolver, and admin-tenant authorization.
//!
//! Every inbound request passes through [`TenantResolver::resolve`] to
//! establish a tenant context; protected endpoints additionally pass
//! through [`AccessControl::authorize`] to bind a caller identity to
//! the resolved tenant and role.

pub mod authz;
pub mod directory;
pub mod resolver;
pub mod signals;

pub use authz::{AccessControl, AccessError, AdminContext};
pub use directory::TenantDirectory;
pub use resolver::{DEFAULT_TENANT_CODE, FALLBACK_TENANT_ID, TenantResolver};
pub use signals::TenantSignals;
