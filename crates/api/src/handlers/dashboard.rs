//! Admin dashboard statistics.
//!
//! The four sections are fetched concurrently and each is fenced by its own
//! timeout. A section that fails or times out is reported as `null` with an
//! entry in `errors`; the rest of the dashboard is still returned.

use std::future::Future;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use laurels_db::models::activity::ActivityEntry;
use laurels_db::models::dashboard::{CategoryVotes, TopNominee, Totals};
use laurels_db::repositories::{ActivityRepo, DashboardRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const TOP_NOMINEES: i64 = 10;
const RECENT_ACTIVITY: i64 = 20;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub totals: Option<Totals>,
    pub top_nominees: Option<Vec<TopNominee>>,
    pub votes_by_category: Option<Vec<CategoryVotes>>,
    pub recent_activity: Option<Vec<ActivityEntry>>,
    pub errors: Vec<SectionError>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SectionError {
    pub section: &'static str,
    pub message: String,
}

/// Await one section under `limit`, recording any failure in `errors`.
async fn fenced<T, F>(
    section: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, SectionError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::warn!(section, error = %e, "Dashboard section failed");
            Err(SectionError {
                section,
                message: "failed to load".into(),
            })
        }
        Err(_) => {
            tracing::warn!(section, timeout_ms = limit.as_millis() as u64, "Dashboard section timed out");
            Err(SectionError {
                section,
                message: format!("timed out after {}ms", limit.as_millis()),
            })
        }
    }
}

fn settle<T>(result: Result<T, SectionError>, errors: &mut Vec<SectionError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

/// GET /api/v1/admin/stats
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let pool = &state.pool;
    let limit = state.config.dashboard_section_timeout();

    let (totals, top, by_category, activity) = tokio::join!(
        fenced("totals", limit, DashboardRepo::totals(pool)),
        fenced("top_nominees", limit, DashboardRepo::top_nominees(pool, Some(TOP_NOMINEES))),
        fenced("votes_by_category", limit, DashboardRepo::votes_by_category(pool)),
        fenced("recent_activity", limit, ActivityRepo::list_recent(pool, Some(RECENT_ACTIVITY))),
    );

    let mut errors = Vec::new();
    let dashboard = Dashboard {
        totals: settle(totals, &mut errors),
        top_nominees: settle(top, &mut errors),
        votes_by_category: settle(by_category, &mut errors),
        recent_activity: settle(activity, &mut errors),
        errors,
    };
    Ok(Json(DataResponse { data: dashboard }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_section_times_out_without_failing_the_rest() {
        let limit = Duration::from_millis(50);
        let slow = fenced("slow", limit, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, sqlx::Error>(1)
        });
        let fast = fenced("fast", limit, async { Ok::<_, sqlx::Error>(2) });

        let (slow, fast) = tokio::join!(slow, fast);
        let mut errors = Vec::new();
        assert_eq!(settle(slow, &mut errors), None);
        assert_eq!(settle(fast, &mut errors), Some(2));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].section, "slow");
    }

    #[tokio::test]
    async fn failing_section_is_reported() {
        let result = fenced("totals", Duration::from_secs(1), async {
            Err::<i64, _>(sqlx::Error::PoolTimedOut)
        })
        .await;
        let mut errors = Vec::new();
        assert_eq!(settle(result, &mut errors), None);
        assert_eq!(
            errors,
            vec![SectionError {
                section: "totals",
                message: "failed to load".into()
            }]
        );
    }
}
