//! CSV exports for admins.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::{SecondsFormat, Utc};
use laurels_core::csv::build_csv;
use laurels_core::error::CoreError;
use laurels_db::models::vote::VoteExportFilter;
use laurels_db::repositories::VoteRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

const VOTE_EXPORT_HEADER: &[&str] = &["vote_id", "user_id", "nominee_name", "category", "created_at"];

/// GET /api/v1/admin/reports/votes?category=&from=&to=
///
/// `from` is inclusive, `to` exclusive. Both are RFC 3339 timestamps.
pub async fn export_votes(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<VoteExportFilter>,
) -> AppResult<impl IntoResponse> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from >= to {
            return Err(AppError::Core(CoreError::Validation(
                "'from' must be earlier than 'to'".into(),
            )));
        }
    }

    let rows = VoteRepo::export(&state.pool, &filter).await?;
    tracing::info!(admin_id = admin.user_id, rows = rows.len(), "Vote export generated");

    let body = build_csv(
        VOTE_EXPORT_HEADER,
        rows.iter().map(|row| {
            vec![
                row.vote_id.to_string(),
                row.user_id.to_string(),
                row.nominee_name.clone(),
                row.category.clone(),
                row.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ]
        }),
    );

    let filename = format!("votes-{}.csv", Utc::now().format("%Y%m%d-%H%M%S"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}
