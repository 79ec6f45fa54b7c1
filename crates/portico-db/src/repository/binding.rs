//! SurrealDB implementation of [`BindingRepository`].
//!
//! Binding records are keyed by the composite `'<user_id>:<tenant_id>'`
//! record id, which makes `grant` a natural single-row upsert.

use portico_core::error::PorticoResult;
use portico_core::models::binding::TenantBinding;
use portico_core::repository::BindingRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct BindingRow {
    user_id: i64,
    tenant_id: i64,
    role: String,
}

impl BindingRow {
    fn into_binding(self) -> TenantBinding {
        TenantBinding {
            user_id: self.user_id,
            tenant_id: self.tenant_id,
            role: self.role,
        }
    }
}

fn binding_key(user_id: i64, tenant_id: i64) -> String {
    format!("{user_id}:{tenant_id}")
}

/// SurrealDB implementation of the Binding repository.
#[derive(Clone)]
pub struct SurrealBindingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBindingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BindingRepository for SurrealBindingRepository<C> {
    async fn grant(&self, user_id: i64, tenant_id: i64, role: &str) -> PorticoResult<TenantBinding> {
        let key = binding_key(user_id, tenant_id);

        let result = self
            .db
            .query(
                "UPSERT type::record('admin_user_tenant', $key) SET \
                 user_id = $user_id, \
                 tenant_id = $tenant_id, \
                 role = $role",
            )
            .bind(("key", key.clone()))
            .bind(("user_id", user_id))
            .bind(("tenant_id", tenant_id))
            .bind(("role", role.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<BindingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_user_tenant".into(),
            id: key,
        })?;

        Ok(row.into_binding())
    }

    async fn revoke(&self, user_id: i64, tenant_id: i64) -> PorticoResult<()> {
        self.db
            .query("DELETE type::record('admin_user_tenant', $key)")
            .bind(("key", binding_key(user_id, tenant_id)))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn get(&self, user_id: i64, tenant_id: i64) -> PorticoResult<TenantBinding> {
        let key = binding_key(user_id, tenant_id);

        let mut result = self
            .db
            .query("SELECT * FROM type::record('admin_user_tenant', $key)")
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BindingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_user_tenant".into(),
            id: key,
        })?;

        Ok(row.into_binding())
    }

    async fn list_for_user(&self, user_id: i64) -> PorticoResult<Vec<TenantBinding>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM admin_user_tenant \
                 WHERE user_id = $user_id \
                 ORDER BY tenant_id ASC",
            )
            .bind(("user_id", user_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BindingRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(BindingRow::into_binding).collect())
    }
}
