//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod academy_member_repo;
pub mod activity_repo;
pub mod category_repo;
pub mod content_repo;
pub mod dashboard_repo;
pub mod event_repo;
pub mod genre_repo;
pub mod nominee_repo;
pub mod session_repo;
pub mod site_config_repo;
pub mod user_repo;
pub mod vote_repo;

pub use academy_member_repo::AcademyMemberRepo;
pub use activity_repo::ActivityRepo;
pub use category_repo::CategoryRepo;
pub use content_repo::ContentRepo;
pub use dashboard_repo::DashboardRepo;
pub use event_repo::EventRepo;
pub use genre_repo::GenreRepo;
pub use nominee_repo::NomineeRepo;
pub use session_repo::SessionRepo;
pub use site_config_repo::SiteConfigRepo;
pub use user_repo::UserRepo;
pub use vote_repo::VoteRepo;

/// Upper bound applied to caller-supplied `limit` parameters.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Clamp an optional limit into `1..=MAX_PAGE_SIZE`, defaulting to `default`.
pub(crate) fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

/// Clamp an optional offset to be non-negative.
pub(crate) fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
