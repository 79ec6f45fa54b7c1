//! Integration tests for the AdminUser repository implementation using
//! in-memory SurrealDB.

use chrono::Utc;
use portico_core::error::PorticoError;
use portico_core::models::admin_user::{AdminScope, CreateAdminUser, UpdateAdminUser};
use portico_core::repository::AdminUserRepository;
use portico_db::repository::SurrealAdminUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    portico_db::run_migrations(&db).await.unwrap();
    db
}

fn user_input(email: &str, scope: AdminScope) -> CreateAdminUser {
    CreateAdminUser {
        email: email.into(),
        password: "correct-horse-battery".into(),
        name: "Alice".into(),
        role: "admin".into(),
        scope,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let user = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(7)))
        .await
        .unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.scope, AdminScope::Tenant(7));
    assert!(user.active);
    assert!(user.last_login_at.is_none());

    let by_id = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(by_id.email, user.email);

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn password_is_stored_hashed() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let user = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(7)))
        .await
        .unwrap();

    // Argon2id PHC string, never the raw credential.
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert_ne!(user.password_hash, "correct-horse-battery");
}

#[tokio::test]
async fn super_admin_scope_round_trips() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let root = repo
        .create(user_input("root@example.com", AdminScope::All))
        .await
        .unwrap();
    assert!(root.scope.is_super_admin());

    let fetched = repo.get_by_id(root.id).await.unwrap();
    assert_eq!(fetched.scope, AdminScope::All);
}

#[tokio::test]
async fn update_changes_only_named_fields() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let user = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(7)))
        .await
        .unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateAdminUser {
                role: Some("owner".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, "owner");
    assert_eq!(updated.email, "alice@example.com"); // unchanged
    assert_eq!(updated.scope, AdminScope::Tenant(7)); // unchanged
    assert!(updated.updated_at >= user.updated_at);
}

#[tokio::test]
async fn set_password_replaces_hash() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let user = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(7)))
        .await
        .unwrap();

    repo.set_password(user.id, "a-brand-new-secret").await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_ne!(fetched.password_hash, user.password_hash);
    assert!(fetched.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn record_login_stamps_timestamp() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let user = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(7)))
        .await
        .unwrap();

    let at = Utc::now();
    repo.record_login(user.id, at).await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    let stamped = fetched.last_login_at.expect("last_login_at set");
    assert_eq!(stamped.timestamp(), at.timestamp());
}

#[tokio::test]
async fn reusing_email_after_deactivation() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let old = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(7)))
        .await
        .unwrap();
    repo.deactivate(old.id).await.unwrap();

    // Only one *active* user per email; the retired row must not
    // shadow the re-registered account.
    let new = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(8)))
        .await
        .unwrap();

    let found = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(found.id, new.id);
    assert_eq!(found.scope, AdminScope::Tenant(8));
    assert!(found.active);
}

#[tokio::test]
async fn email_of_deactivated_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let user = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(7)))
        .await
        .unwrap();
    repo.deactivate(user.id).await.unwrap();

    assert!(matches!(
        repo.get_by_email("alice@example.com").await,
        Err(PorticoError::NotFound { .. })
    ));

    // By id the record is still visible, with the flag cleared.
    let by_id = repo.get_by_id(user.id).await.unwrap();
    assert!(!by_id.active);
}

#[tokio::test]
async fn deactivate_clears_active_flag() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    let user = repo
        .create(user_input("alice@example.com", AdminScope::Tenant(7)))
        .await
        .unwrap();

    repo.deactivate(user.id).await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(!fetched.active);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealAdminUserRepository::new(db);

    assert!(matches!(
        repo.get_by_id(404).await,
        Err(PorticoError::NotFound { .. })
    ));
    assert!(matches!(
        repo.get_by_email("nobody@example.com").await,
        Err(PorticoError::NotFound { .. })
    ));
}
