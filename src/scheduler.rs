use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use snafu::OptionExt;
use strum::{EnumIter, FromRepr};

use crate::error::{InvalidRatingSnafu, Result};

/// Reps count at which a card leaves the learning steps.
const GRADUATION_REPS: u32 = 2;

/// Recall quality reported by the reviewer. The numeric values are the wire
/// format used by review UIs; anything outside 1-4 is rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRepr, EnumIter,
)]
#[repr(u8)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    /// Numeric quality `q` used by the ease-factor update.
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Rating {
    type Error = crate::error::SchedulerError;

    fn try_from(rating: u8) -> Result<Self> {
        Self::from_repr(rating).context(InvalidRatingSnafu { rating })
    }
}

/// Where a card currently sits in its lifecycle. Derived from the counters,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    New,
    Learning,
    Review,
}

/// Scheduling state attached to every learnable item. The scheduler never
/// sees the item itself; callers embed this struct in their own card records
/// and hand it back with each rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    /// Earliest moment the item should be presented again.
    pub due: DateTime<Utc>,
    /// Whole days between reviews once graduated; 0 while learning.
    pub interval: u32,
    pub ease_factor: f64,
    /// Consecutive successful presentations since the last failure.
    pub reps: u32,
    /// Lifetime failure count. Never reset.
    pub lapses: u32,
    pub last_review: Option<DateTime<Utc>>,
}

impl CardState {
    /// State for a freshly seeded item: immediately due, never reviewed.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            due: now,
            interval: 0,
            ease_factor: 2.5,
            reps: 0,
            lapses: 0,
            last_review: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.reps {
            0 if self.lapses == 0 => Phase::New,
            // reps 0 with lapses counted means the card just failed and is
            // back in the minute-granularity steps.
            0 | 1 => Phase::Learning,
            _ => Phase::Review,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }
}

/// Tuning profile for the scheduler. [`SM2`] takes it at construction and
/// never mutates it; alternate profiles can run side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minutes until the next presentation after a failure.
    pub first_step_minutes: i64,
    /// Minutes until the second learning presentation.
    pub second_step_minutes: i64,
    /// Days granted when a card graduates via Hard/Good.
    pub graduating_interval_days: u32,
    /// Days granted when a card graduates via Easy.
    pub easy_interval_days: u32,
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub maximum_ease: f64,
    /// Flat ease deduction applied on failure.
    pub again_ease_penalty: f64,
    pub hard_interval_multiplier: f64,
    pub easy_interval_multiplier: f64,
    pub maximum_interval_days: u32,
    /// Hour of day (UTC) that graduated due dates are normalized to.
    pub rollover_hour: u32,
    /// Lapse count at which an item is flagged as a leech.
    pub leech_threshold: u32,
    /// Lapse count at which an item gets a soft difficulty warning.
    pub leech_warning_threshold: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            first_step_minutes: 1,
            second_step_minutes: 10,
            graduating_interval_days: 1,
            easy_interval_days: 4,
            initial_ease: 2.5,
            minimum_ease: 1.3,
            maximum_ease: 3.0,
            again_ease_penalty: 0.2,
            hard_interval_multiplier: 0.8,
            easy_interval_multiplier: 1.3,
            maximum_interval_days: 365,
            rollover_hour: 4,
            leech_threshold: 8,
            leech_warning_threshold: 5,
        }
    }
}

/// Result of applying one rating to one card.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub state: CardState,
    /// Whether the card is still in the minute-granularity learning steps.
    pub learning: bool,
    /// Delay until the next presentation while learning; `None` once the card
    /// is on whole-day intervals.
    pub next_step_minutes: Option<i64>,
}

/// The scheduler. Owns a [`SchedulerConfig`] and turns (state, rating) pairs
/// into new states; it performs no I/O and holds no per-card data.
#[derive(Debug, Clone)]
pub struct SM2 {
    config: SchedulerConfig,
}

impl Default for SM2 {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl SM2 {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Initial scheduling state for an item created at `now`.
    pub fn starting_state(&self, now: DateTime<Utc>) -> CardState {
        CardState {
            ease_factor: self.config.initial_ease,
            ..CardState::new(now)
        }
    }

    /// Apply one quality rating. Deterministic and free of I/O; everything it
    /// reads is in the arguments. Callers must serialize transitions for a
    /// single card; distinct cards are independent.
    pub fn next_state(&self, current: &CardState, rating: Rating, now: DateTime<Utc>) -> ReviewOutcome {
        let config = &self.config;
        let mut state = current.clone();
        // Persisted ease may have drifted out of the legal band; clamp on read.
        state.ease_factor = state
            .ease_factor
            .min(config.maximum_ease)
            .max(config.minimum_ease);

        let learning_at_entry = state.reps < GRADUATION_REPS;
        let mut step_minutes = None;

        if rating == Rating::Again {
            // Failure resets regardless of phase.
            state.lapses += 1;
            state.reps = 0;
            state.interval = 0;
            state.ease_factor =
                (state.ease_factor - config.again_ease_penalty).max(config.minimum_ease);
            step_minutes = Some(config.first_step_minutes);
        } else if learning_at_entry {
            if rating == Rating::Easy {
                // Well-known item: skip the remaining steps entirely.
                state.reps = GRADUATION_REPS;
                state.interval = config.easy_interval_days;
            } else if state.reps == 0 {
                state.reps = 1;
                step_minutes = Some(config.second_step_minutes);
            } else {
                state.reps = GRADUATION_REPS;
                state.interval = config.graduating_interval_days;
            }
        } else {
            state.reps += 1;
            // The fixed intervals are keyed on the post-increment rep count,
            // so they fire again whenever a lapsed card regraduates and walks
            // back through reps 2 and 3.
            state.interval = match state.reps {
                2 => {
                    if rating == Rating::Easy {
                        config.easy_interval_days
                    } else {
                        config.graduating_interval_days
                    }
                }
                3 => {
                    if rating == Rating::Easy {
                        7
                    } else {
                        3
                    }
                }
                _ => {
                    let modifier = match rating {
                        Rating::Hard => config.hard_interval_multiplier,
                        Rating::Easy => config.easy_interval_multiplier,
                        _ => 1.0,
                    };
                    (state.interval as f64 * state.ease_factor * modifier).round() as u32
                }
            };
            state.interval = state.interval.min(config.maximum_interval_days).max(1);

            // EF' = EF + (0.1 - (4 - q) * (0.08 + (4 - q) * 0.02))
            let shortfall = f64::from(4 - rating.value());
            let delta = 0.1 - shortfall * (0.08 + shortfall * 0.02);
            state.ease_factor = (state.ease_factor + delta)
                .min(config.maximum_ease)
                .max(config.minimum_ease);
        }

        state.due = match step_minutes {
            Some(minutes) => now + Duration::minutes(minutes),
            None => self.at_rollover_hour(now + Duration::days(i64::from(state.interval))),
        };
        state.last_review = Some(now);

        debug!(
            "rated {:?}: reps {} -> {}, interval {}d, ease {:.2}, due {}",
            rating, current.reps, state.reps, state.interval, state.ease_factor, state.due
        );

        ReviewOutcome {
            learning: step_minutes.is_some(),
            next_step_minutes: step_minutes,
            state,
        }
    }

    fn at_rollover_hour(&self, due: DateTime<Utc>) -> DateTime<Utc> {
        let hour = self.config.rollover_hour.min(23);
        due.date_naive()
            .and_hms_opt(hour, 0, 0)
            .map(|day_start| day_start.and_utc())
            .unwrap_or(due)
    }
}
