use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::{CardState, Phase, Rating};

/// Which queue a review event happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewKind {
    Learning,
    Review,
    Relearning,
}

/// One row of review history, captured before the transition is applied. The
/// scheduler never reads these back; the analytics side aggregates them into
/// retention curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub rating: Rating,
    /// Interval in days going into the review.
    pub interval: u32,
    /// Ease factor going into the review.
    pub ease_factor: f64,
    pub reviewed_at: DateTime<Utc>,
    pub kind: ReviewKind,
}

impl ReviewEntry {
    pub fn record(before: &CardState, rating: Rating, now: DateTime<Utc>) -> Self {
        let kind = match before.phase() {
            Phase::Review if rating == Rating::Again => ReviewKind::Relearning,
            Phase::Review => ReviewKind::Review,
            Phase::New | Phase::Learning => ReviewKind::Learning,
        };
        Self {
            rating,
            interval: before.interval,
            ease_factor: before.ease_factor,
            reviewed_at: now,
            kind,
        }
    }
}
