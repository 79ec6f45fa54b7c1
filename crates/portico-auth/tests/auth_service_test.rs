//! Integration tests for the authentication service using in-memory
//! SurrealDB.

use chrono::{Duration, Utc};
use portico_auth::config::AuthConfig;
use portico_auth::service::{AuthService, LoginInput};
use portico_auth::token;
use portico_core::error::PorticoError;
use portico_core::models::admin_user::{AdminScope, CreateAdminUser};
use portico_core::models::session::CreateSession;
use portico_core::models::tenant::CreateTenant;
use portico_core::repository::{
    AdminUserRepository, BindingRepository, SessionRepository, TenantRepository,
};
use portico_db::repository::{
    SurrealAdminUserRepository, SurrealBindingRepository, SurrealSessionRepository,
    SurrealTenantRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type LocalDb = surrealdb::engine::local::Db;

type Service = AuthService<
    SurrealAdminUserRepository<LocalDb>,
    SurrealSessionRepository<LocalDb>,
    SurrealBindingRepository<LocalDb>,
    SurrealTenantRepository<LocalDb>,
>;

fn service(db: &Surreal<LocalDb>) -> Service {
    AuthService::new(
        SurrealAdminUserRepository::new(db.clone()),
        SurrealSessionRepository::new(db.clone()),
        SurrealBindingRepository::new(db.clone()),
        SurrealTenantRepository::new(db.clone()),
        AuthConfig::default(),
    )
}

fn login_input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.into(),
        password: password.into(),
        remember: false,
        ip_address: Some("127.0.0.1".into()),
        user_agent: Some("TestAgent/1.0".into()),
    }
}

/// Spin up in-memory DB, run migrations, create one tenant and one
/// tenant-scoped user (alice) with an editor binding on that tenant.
async fn setup() -> (Surreal<LocalDb>, i64, i64) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    portico_db::run_migrations(&db).await.unwrap();

    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant = tenants
        .create(CreateTenant {
            code: "acme".into(),
            name: "ACME".into(),
            primary_domain: "acme.example".into(),
            metadata: None,
        })
        .await
        .unwrap();

    let users = SurrealAdminUserRepository::new(db.clone());
    let user = users
        .create(CreateAdminUser {
            email: "a@x.com".into(),
            password: "secret123".into(),
            name: "Alice".into(),
            role: "admin".into(),
            scope: AdminScope::Tenant(tenant.id),
        })
        .await
        .unwrap();

    SurrealBindingRepository::new(db.clone())
        .grant(user.id, tenant.id, "editor")
        .await
        .unwrap();

    (db, tenant.id, user.id)
}

#[tokio::test]
async fn login_happy_path() {
    let (db, tenant_id, user_id) = setup().await;
    let svc = service(&db);

    let before = Utc::now();
    let out = svc.login(login_input("a@x.com", "secret123")).await.unwrap();

    // Opaque token: 32 bytes base64url, no padding.
    assert_eq!(out.token.len(), 43);

    // Default lifetime is one day.
    let lifetime = out.expires_at - before;
    assert!(lifetime > Duration::hours(23) && lifetime <= Duration::hours(25));

    assert_eq!(out.user.id, user_id);
    assert_eq!(out.user.email, "a@x.com");

    assert_eq!(out.tenants.len(), 1);
    assert_eq!(out.tenants[0].tenant_id, tenant_id);
    assert_eq!(out.tenants[0].role, "editor");

    // last_login_at is stamped.
    let users = SurrealAdminUserRepository::new(db);
    let user = users.get_by_id(user_id).await.unwrap();
    assert!(user.last_login_at.is_some());
}

#[tokio::test]
async fn remember_extends_session_lifetime() {
    let (db, _, _) = setup().await;
    let svc = service(&db);

    let before = Utc::now();
    let out = svc
        .login(LoginInput {
            remember: true,
            ..login_input("a@x.com", "secret123")
        })
        .await
        .unwrap();

    let lifetime = out.expires_at - before;
    assert!(lifetime > Duration::days(6) && lifetime <= Duration::days(8));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (db, _, user_id) = setup().await;

    let wrong_password = service(&db)
        .login(login_input("a@x.com", "wrong"))
        .await
        .unwrap_err();
    let unknown_email = service(&db)
        .login(login_input("nobody@x.com", "secret123"))
        .await
        .unwrap_err();

    SurrealAdminUserRepository::new(db.clone())
        .deactivate(user_id)
        .await
        .unwrap();
    let inactive = service(&db)
        .login(login_input("a@x.com", "secret123"))
        .await
        .unwrap_err();

    // All three collapse to one generic failure with one message, so a
    // caller cannot probe which accounts exist.
    for err in [&wrong_password, &unknown_email, &inactive] {
        assert!(
            matches!(err, PorticoError::AuthenticationFailed { .. }),
            "expected AuthenticationFailed, got: {err:?}"
        );
    }
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.to_string(), inactive.to_string());
}

#[tokio::test]
async fn login_works_after_email_is_reregistered() {
    let (db, _, user_id) = setup().await;

    // Retire alice, then register a fresh account under her email.
    SurrealAdminUserRepository::new(db.clone())
        .deactivate(user_id)
        .await
        .unwrap();
    let new_user = SurrealAdminUserRepository::new(db.clone())
        .create(CreateAdminUser {
            email: "a@x.com".into(),
            password: "new-secret-123".into(),
            name: "Alice II".into(),
            role: "admin".into(),
            scope: AdminScope::Tenant(1),
        })
        .await
        .unwrap();

    // The dead row must not shadow the live account.
    let svc = service(&db);
    let out = svc
        .login(login_input("a@x.com", "new-secret-123"))
        .await
        .unwrap();
    assert_eq!(out.user.id, new_user.id);

    // The retired account's credential stays unusable.
    assert!(svc.login(login_input("a@x.com", "secret123")).await.is_err());
}

#[tokio::test]
async fn verify_token_resolves_owner() {
    let (db, _, user_id) = setup().await;
    let svc = service(&db);

    let out = svc.login(login_input("a@x.com", "secret123")).await.unwrap();

    let resolved = svc.verify_token(&out.token).await.unwrap();
    assert_eq!(resolved, Some(user_id));
}

#[tokio::test]
async fn verify_unknown_token_is_none() {
    let (db, _, _) = setup().await;
    let svc = service(&db);

    assert_eq!(svc.verify_token("totally-bogus").await.unwrap(), None);
}

#[tokio::test]
async fn verify_tampered_token_is_none() {
    let (db, _, _) = setup().await;
    let svc = service(&db);

    let out = svc.login(login_input("a@x.com", "secret123")).await.unwrap();
    let tampered = format!("{}x", out.token);
    assert_eq!(svc.verify_token(&tampered).await.unwrap(), None);
}

#[tokio::test]
async fn expired_session_is_deleted_on_first_use() {
    let (db, _, user_id) = setup().await;
    let svc = service(&db);

    // Plant an already-expired session directly.
    let raw_token = token::generate_session_token();
    let token_hash = token::hash_session_token(&raw_token);
    let sessions = SurrealSessionRepository::new(db.clone());
    sessions
        .create(CreateSession {
            user_id,
            token_hash: token_hash.clone(),
            ip_address: None,
            user_agent: None,
            expires_at: Utc::now() - Duration::minutes(5),
        })
        .await
        .unwrap();

    // First presentation detects the expiry and deletes the row.
    assert_eq!(svc.verify_token(&raw_token).await.unwrap(), None);
    assert!(matches!(
        sessions.get_by_token_hash(&token_hash).await,
        Err(PorticoError::NotFound { .. })
    ));

    // Repeated presentation stays a quiet None.
    assert_eq!(svc.verify_token(&raw_token).await.unwrap(), None);
}

#[tokio::test]
async fn verify_token_of_deactivated_user_is_none() {
    let (db, _, user_id) = setup().await;
    let svc = service(&db);

    let out = svc.login(login_input("a@x.com", "secret123")).await.unwrap();

    SurrealAdminUserRepository::new(db.clone())
        .deactivate(user_id)
        .await
        .unwrap();

    assert_eq!(svc.verify_token(&out.token).await.unwrap(), None);
}

#[tokio::test]
async fn logout_invalidates_token_and_is_idempotent() {
    let (db, _, _) = setup().await;
    let svc = service(&db);

    let out = svc.login(login_input("a@x.com", "secret123")).await.unwrap();
    assert!(svc.verify_token(&out.token).await.unwrap().is_some());

    svc.logout(&out.token).await.unwrap();
    assert_eq!(svc.verify_token(&out.token).await.unwrap(), None);

    // Logging out again, or logging out a token that never existed,
    // succeeds.
    svc.logout(&out.token).await.unwrap();
    svc.logout("never-issued").await.unwrap();
}

#[tokio::test]
async fn get_user_by_id_excludes_inactive() {
    let (db, _, user_id) = setup().await;
    let svc = service(&db);

    let user = svc.get_user_by_id(user_id).await.unwrap();
    assert_eq!(user.map(|u| u.id), Some(user_id));

    SurrealAdminUserRepository::new(db.clone())
        .deactivate(user_id)
        .await
        .unwrap();
    assert!(svc.get_user_by_id(user_id).await.unwrap().is_none());

    assert!(svc.get_user_by_id(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn change_password_revokes_all_sessions() {
    let (db, _, user_id) = setup().await;
    let svc = service(&db);

    let first = svc.login(login_input("a@x.com", "secret123")).await.unwrap();
    let second = svc.login(login_input("a@x.com", "secret123")).await.unwrap();

    svc.change_password(user_id, "a-brand-new-secret").await.unwrap();

    assert_eq!(svc.verify_token(&first.token).await.unwrap(), None);
    assert_eq!(svc.verify_token(&second.token).await.unwrap(), None);

    // Old credential no longer works; new one does.
    assert!(svc.login(login_input("a@x.com", "secret123")).await.is_err());
    assert!(
        svc.login(login_input("a@x.com", "a-brand-new-secret"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn super_admin_sees_every_active_tenant() {
    let (db, tenant_id, _) = setup().await;

    let tenants = SurrealTenantRepository::new(db.clone());
    let beta = tenants
        .create(CreateTenant {
            code: "beta".into(),
            name: "Beta".into(),
            primary_domain: "beta.example".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let retired = tenants
        .create(CreateTenant {
            code: "old".into(),
            name: "Old".into(),
            primary_domain: "old.example".into(),
            metadata: None,
        })
        .await
        .unwrap();
    tenants.deactivate(retired.id).await.unwrap();

    SurrealAdminUserRepository::new(db.clone())
        .create(CreateAdminUser {
            email: "root@x.com".into(),
            password: "super-secret-123".into(),
            name: "Root".into(),
            role: "superadmin".into(),
            scope: AdminScope::All,
        })
        .await
        .unwrap();

    let svc = service(&db);
    let out = svc
        .login(login_input("root@x.com", "super-secret-123"))
        .await
        .unwrap();

    // Every active tenant, carrying the global role; no binding rows.
    let ids: Vec<i64> = out.tenants.iter().map(|t| t.tenant_id).collect();
    assert_eq!(ids, vec![tenant_id, beta.id]);
    assert!(out.tenants.iter().all(|t| t.role == "superadmin"));
}

#[tokio::test]
async fn binding_to_inactive_tenant_is_hidden() {
    let (db, tenant_id, _) = setup().await;

    SurrealTenantRepository::new(db.clone())
        .deactivate(tenant_id)
        .await
        .unwrap();

    let svc = service(&db);
    let out = svc.login(login_input("a@x.com", "secret123")).await.unwrap();
    assert!(out.tenants.is_empty());
}
