//! SurrealDB repository implementations.

mod admin_user;
mod binding;
mod session;
mod tenant;

pub use admin_user::SurrealAdminUserRepository;
pub use binding::SurrealBindingRepository;
pub use session::SurrealSessionRepository;
pub use tenant::SurrealTenantRepository;
