//! Vote lifecycle rules.
//!
//! A user holds at most one vote per nominee. A vote may be withdrawn by its
//! owner only while it is younger than [`VOTE_WINDOW_SECS`]; after that it is
//! locked for good. Removal itself is decided by the repository against the
//! database clock; [`VoteState`] only reports the window to the caller.

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// How long after casting a vote its owner may still remove it.
pub const VOTE_WINDOW_SECS: i64 = 2 * 60 * 60;

pub fn vote_window() -> Duration {
    Duration::seconds(VOTE_WINDOW_SECS)
}

/// Lifecycle state of a (user, nominee) pair at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VoteState {
    NoVote,
    Removable {
        voted_at: Timestamp,
        remaining_minutes: i64,
    },
    Locked {
        voted_at: Timestamp,
    },
}

impl VoteState {
    /// Derive the state from the vote's creation time (if any) and `now`.
    pub fn at(created_at: Option<Timestamp>, now: Timestamp) -> Self {
        match created_at {
            None => VoteState::NoVote,
            Some(voted_at) if is_removable(voted_at, now) => VoteState::Removable {
                voted_at,
                remaining_minutes: remaining_minutes(voted_at, now),
            },
            Some(voted_at) => VoteState::Locked { voted_at },
        }
    }

    pub fn can_remove(&self) -> bool {
        matches!(self, VoteState::Removable { .. })
    }
}

/// Time since the vote was cast. A creation time in the future counts as zero.
fn elapsed(created_at: Timestamp, now: Timestamp) -> Duration {
    (now - created_at).max(Duration::zero())
}

/// `true` while `now - created_at` is strictly below the window.
pub fn is_removable(created_at: Timestamp, now: Timestamp) -> bool {
    elapsed(created_at, now) < vote_window()
}

/// Whole minutes left before the vote locks, floored and clamped at zero.
pub fn remaining_minutes(created_at: Timestamp, now: Timestamp) -> i64 {
    let remaining = vote_window() - elapsed(created_at, now);
    remaining.num_seconds().max(0) / 60
}

/// Fail with [`CoreError::VoteLocked`] unless the vote is still removable.
pub fn ensure_removable(
    nominee_id: DbId,
    created_at: Timestamp,
    now: Timestamp,
) -> Result<(), CoreError> {
    if is_removable(created_at, now) {
        Ok(())
    } else {
        Err(CoreError::VoteLocked { nominee_id })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, s).unwrap()
    }

    #[test]
    fn removal_just_inside_window_succeeds() {
        assert!(ensure_removable(1, at(10, 0, 0), at(11, 59, 59)).is_ok());
    }

    #[test]
    fn removal_just_after_window_is_locked() {
        assert_matches!(
            ensure_removable(1, at(10, 0, 0), at(12, 0, 1)),
            Err(CoreError::VoteLocked { nominee_id: 1 })
        );
    }

    #[test]
    fn removal_exactly_at_window_is_locked() {
        assert!(!is_removable(at(10, 0, 0), at(12, 0, 0)));
    }

    #[test]
    fn remaining_minutes_are_floored() {
        // 1h 30m 30s left.
        assert_eq!(remaining_minutes(at(10, 0, 0), at(10, 29, 30)), 90);
        // 59s left.
        assert_eq!(remaining_minutes(at(10, 0, 0), at(11, 59, 1)), 0);
        assert_eq!(remaining_minutes(at(10, 0, 0), at(10, 0, 0)), 120);
    }

    #[test]
    fn remaining_minutes_never_negative() {
        assert_eq!(remaining_minutes(at(10, 0, 0), at(15, 0, 0)), 0);
    }

    #[test]
    fn future_creation_time_counts_as_fresh() {
        assert!(is_removable(at(11, 0, 0), at(10, 0, 0)));
        assert_eq!(remaining_minutes(at(11, 0, 0), at(10, 0, 0)), 120);
    }

    #[test]
    fn state_transitions() {
        assert_eq!(VoteState::at(None, at(10, 0, 0)), VoteState::NoVote);

        let removable = VoteState::at(Some(at(10, 0, 0)), at(10, 45, 0));
        assert_eq!(
            removable,
            VoteState::Removable {
                voted_at: at(10, 0, 0),
                remaining_minutes: 75,
            }
        );
        assert!(removable.can_remove());

        let locked = VoteState::at(Some(at(10, 0, 0)), at(13, 0, 0));
        assert_eq!(
            locked,
            VoteState::Locked {
                voted_at: at(10, 0, 0)
            }
        );
        assert!(!locked.can_remove());
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(VoteState::at(Some(at(10, 0, 0)), at(10, 1, 0))).unwrap();
        assert_eq!(json["state"], "removable");
        assert_eq!(json["remaining_minutes"], 119);
        let json = serde_json::to_value(VoteState::NoVote).unwrap();
        assert_eq!(json["state"], "no_vote");
    }
}
