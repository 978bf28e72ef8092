//! Role-based access control extractors.
//!
//! The role is read from `user_profiles` on every request rather than taken
//! from the token, so a demotion takes effect immediately. Any failure to
//! establish the role denies access.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use laurels_core::roles::{authorize_active, authorize_admin};
use laurels_db::repositories::UserRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an active profile with the `admin` role. Rejects with 401 without
/// a valid token and 403 otherwise.
///
/// As a parts extractor it runs before the request body is read, so a
/// rejected caller never reaches a write.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let lookup = UserRepo::find_role(&state.pool, user.user_id).await;

        authorize_admin(lookup).map_err(|e| {
            tracing::info!(user_id = user.user_id, path = %parts.uri.path(), "Admin access denied");
            AppError::Core(e)
        })?;

        Ok(RequireAdmin(user))
    }
}

/// Requires an active profile of any role. Rejects with 401 without a valid
/// token and 403 for a deactivated or missing profile.
///
/// Used where a signed-in user changes state on their own behalf, such as
/// casting a vote, so that deactivation cuts off a still-valid token.
pub struct RequireActive(pub AuthUser);

impl FromRequestParts<AppState> for RequireActive {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let lookup = UserRepo::find_role(&state.pool, user.user_id).await;

        authorize_active(lookup).map_err(|e| {
            tracing::info!(user_id = user.user_id, path = %parts.uri.path(), "Inactive account denied");
            AppError::Core(e)
        })?;

        Ok(RequireActive(user))
    }
}
