//! Tenant Resolver — maps an inbound request to exactly one tenant.
//!
//! The resolution chain is evaluated in strict priority order and the
//! first successful match wins:
//!
//! 1. explicit tenant code header;
//! 2. explicit legacy tenant id header;
//! 3. hostname of the Origin (then Referer) header matched against
//!    tenants' primary domains;
//! 4. the configured default tenant code, and finally a hard-coded
//!    fallback id.
//!
//! Steps 1–2 let a centralized admin console override tenant context
//! explicitly while public-facing properties rely on domain inference.
//! An unrecognized signal at any step never errors and never
//! short-circuits to the default — it falls through to the next step.

use portico_core::models::tenant::Tenant;
use portico_core::repository::TenantRepository;
use tracing::{debug, warn};
use url::Url;

use crate::directory::TenantDirectory;
use crate::signals::TenantSignals;

/// Well-known code of the default tenant (priority 4).
pub const DEFAULT_TENANT_CODE: &str = "main";
/// Returned when even the default tenant is missing or inactive, so
/// that resolution is total.
pub const FALLBACK_TENANT_ID: i64 = 1;

fn hostname_of(raw: &str) -> Option<String> {
    Url::parse(raw)
        .ok()?
        .host_str()
        .map(|h| h.to_ascii_lowercase())
}

/// Resolves every request to a tenant id. Total: degrades to the
/// default tenant rather than erroring, so downstream code never
/// handles "no tenant" as a case. Read-only — no writes, no blocking
/// on other requests.
#[derive(Clone)]
pub struct TenantResolver<T: TenantRepository> {
    directory: TenantDirectory<T>,
    default_code: String,
}

impl<T: TenantRepository> TenantResolver<T> {
    pub fn new(directory: TenantDirectory<T>) -> Self {
        Self {
            directory,
            default_code: DEFAULT_TENANT_CODE.into(),
        }
    }

    pub fn with_default_code(directory: TenantDirectory<T>, code: impl Into<String>) -> Self {
        Self {
            directory,
            default_code: code.into(),
        }
    }

    pub fn directory(&self) -> &TenantDirectory<T> {
        &self.directory
    }

    /// Resolve the tenant for one request. Never fails.
    pub async fn resolve(&self, signals: &TenantSignals) -> i64 {
        if let Some(id) = self.from_code_header(signals).await {
            return id;
        }
        if let Some(id) = self.from_id_header(signals).await {
            return id;
        }
        if let Some(id) = self.from_origin(signals).await {
            return id;
        }
        self.default_tenant().await
    }

    /// Priority 1: explicit tenant code. A code that does not resolve
    /// to an active tenant is treated as not having matched.
    async fn from_code_header(&self, signals: &TenantSignals) -> Option<i64> {
        let code = signals.tenant_code.as_deref()?;
        match self.directory.find_by_code(code).await {
            Ok(Some(tenant)) => {
                debug!(code, tenant_id = tenant.id, "resolved tenant from code header");
                Some(tenant.id)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(code, error = %e, "tenant code lookup failed, falling through");
                None
            }
        }
    }

    /// Priority 2: legacy numeric tenant id. Unparsable or unknown ids
    /// fall through.
    async fn from_id_header(&self, signals: &TenantSignals) -> Option<i64> {
        let id = signals.tenant_id.as_deref()?.parse::<i64>().ok()?;
        match self.directory.find_by_id(id).await {
            Ok(Some(tenant)) => {
                debug!(tenant_id = tenant.id, "resolved tenant from legacy id header");
                Some(tenant.id)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(id, error = %e, "tenant id lookup failed, falling through");
                None
            }
        }
    }

    /// Priority 3: hostname of the declared origin or referring URL,
    /// matched against tenants' primary domains.
    async fn from_origin(&self, signals: &TenantSignals) -> Option<i64> {
        let candidates = [signals.origin.as_deref(), signals.referer.as_deref()];
        for raw in candidates.into_iter().flatten() {
            let Some(host) = hostname_of(raw) else {
                continue;
            };
            match self.directory.find_by_domain(&host).await {
                Ok(Some(tenant)) => {
                    debug!(host, tenant_id = tenant.id, "resolved tenant from origin");
                    return Some(tenant.id);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(host, error = %e, "tenant domain lookup failed, falling through");
                }
            }
        }
        None
    }

    /// Priority 4: the default tenant, degrading to the hard-coded
    /// fallback id if even the default is missing or inactive.
    async fn default_tenant(&self) -> i64 {
        match self.directory.find_by_code(&self.default_code).await {
            Ok(Some(tenant)) => tenant.id,
            Ok(None) => {
                warn!(
                    code = %self.default_code,
                    "default tenant missing or inactive, using fallback id"
                );
                FALLBACK_TENANT_ID
            }
            Err(e) => {
                warn!(error = %e, "default tenant lookup failed, using fallback id");
                FALLBACK_TENANT_ID
            }
        }
    }

    /// Resolve and fetch the full tenant record in one step.
    pub async fn resolve_tenant(&self, signals: &TenantSignals) -> Option<Tenant> {
        let id = self.resolve(signals).await;
        self.directory.find_by_id(id).await.ok().flatten()
    }
}
