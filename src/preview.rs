use chrono::{DateTime, Utc};

use crate::scheduler::{CardState, Rating, ReviewOutcome, SM2};

/// What each of the four ratings would do to a card, computed against the
/// same input state without mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStates {
    pub again: ReviewOutcome,
    pub hard: ReviewOutcome,
    pub good: ReviewOutcome,
    pub easy: ReviewOutcome,
}

impl NextStates {
    pub fn get(&self, rating: Rating) -> &ReviewOutcome {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }
}

impl SM2 {
    /// Preview all four ratings for the answer buttons. The stored state is
    /// untouched; callers apply [`SM2::next_state`] once the reviewer picks.
    pub fn next_states(&self, state: &CardState, now: DateTime<Utc>) -> NextStates {
        NextStates {
            again: self.next_state(state, Rating::Again, now),
            hard: self.next_state(state, Rating::Hard, now),
            good: self.next_state(state, Rating::Good, now),
            easy: self.next_state(state, Rating::Easy, now),
        }
    }
}

/// Human-readable delay until the outcome would next show the card:
/// minutes/hours while learning, days/months/years once graduated.
pub fn describe_outcome(outcome: &ReviewOutcome) -> String {
    match outcome.next_step_minutes {
        Some(minutes) if minutes < 60 => format!("{minutes}m"),
        Some(minutes) => format!("{}h", minutes / 60),
        None => format_days(outcome.state.interval),
    }
}

fn format_days(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 30 {
        format!("{days}d")
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
