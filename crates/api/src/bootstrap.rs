//! Startup provisioning of the first administrator.

use laurels_core::roles::ROLE_ADMIN;
use laurels_core::types::DbId;
use laurels_db::models::user::CreateUserProfile;
use laurels_db::repositories::UserRepo;
use laurels_db::DbPool;

use crate::auth::password::{hash_password, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("ADMIN_PASSWORD must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// What [`ensure_admin`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// At least one active admin already existed; nothing changed.
    AdminPresent,
    Created(DbId),
    /// A profile with the bootstrap email existed and was given the admin role.
    Promoted(DbId),
}

/// Create (or promote) the configured admin when no active admin exists.
pub async fn ensure_admin(
    pool: &DbPool,
    admin: &BootstrapAdmin,
) -> Result<BootstrapOutcome, BootstrapError> {
    if UserRepo::count_admins(pool).await? > 0 {
        return Ok(BootstrapOutcome::AdminPresent);
    }

    if let Some(existing) = UserRepo::find_by_email(pool, &admin.email).await? {
        UserRepo::set_role(pool, existing.id, ROLE_ADMIN).await?;
        tracing::info!(user_id = existing.id, "Promoted existing profile to bootstrap admin");
        return Ok(BootstrapOutcome::Promoted(existing.id));
    }

    if admin.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(BootstrapError::WeakPassword);
    }
    let password_hash =
        hash_password(&admin.password).map_err(|e| BootstrapError::Hash(e.to_string()))?;

    let user = UserRepo::create(
        pool,
        &CreateUserProfile {
            email: admin.email.trim().to_lowercase(),
            display_name: Some("Administrator".into()),
            password_hash,
            role: ROLE_ADMIN.into(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Bootstrap admin created");
    Ok(BootstrapOutcome::Created(user.id))
}
