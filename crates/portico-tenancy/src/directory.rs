//! Tenant Directory — read-only tenant lookups.
//!
//! The single source of truth for "is this tenant active". Holds no
//! cached state: every call is a fresh lookup, trading a little
//! latency for correctness under concurrent tenant activation and
//! deactivation.

use portico_core::error::{PorticoError, PorticoResult};
use portico_core::models::tenant::Tenant;
use portico_core::repository::TenantRepository;

fn not_found_to_none<T>(result: PorticoResult<T>) -> PorticoResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(PorticoError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Read-only lookups of tenant records. Absence is an explicit `None`,
/// never an error; all lookups see active tenants only.
#[derive(Clone)]
pub struct TenantDirectory<T: TenantRepository> {
    repo: T,
}

impl<T: TenantRepository> TenantDirectory<T> {
    pub fn new(repo: T) -> Self {
        Self { repo }
    }

    pub async fn find_by_code(&self, code: &str) -> PorticoResult<Option<Tenant>> {
        not_found_to_none(self.repo.get_by_code(code).await)
    }

    pub async fn find_by_id(&self, id: i64) -> PorticoResult<Option<Tenant>> {
        Ok(not_found_to_none(self.repo.get_by_id(id).await)?.filter(|t| t.active))
    }

    pub async fn find_by_domain(&self, domain: &str) -> PorticoResult<Option<Tenant>> {
        not_found_to_none(self.repo.get_by_domain(domain).await)
    }

    /// All active tenants, for public tenant-discovery endpoints.
    pub async fn list_active(&self) -> PorticoResult<Vec<Tenant>> {
        self.repo.list_active().await
    }
}
