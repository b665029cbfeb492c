use chrono::{DateTime, Utc};

use crate::scheduler::CardState;

const SECONDS_PER_DAY: f64 = 86_400.0;
/// Floor for the decay denominator; fresh cards have zero stability.
const MIN_STABILITY_DAYS: f64 = 0.1;

/// Heuristic memory-stability estimate in days. Grows with interval, ease,
/// and successful reps; shrinks with accumulated lapses.
pub fn estimated_stability(state: &CardState) -> f64 {
    f64::from(state.interval) * 1.5 * (state.ease_factor / 2.5)
        * f64::from(state.reps + 1).log2()
        / (1.0 + f64::from(state.lapses) * 0.3)
}

/// Estimated probability, in percent, that the item is still recallable at
/// `now`. Analytics-only: ranks items by forgetting risk and must never feed
/// back into due/interval computation.
pub fn current_retrievability(state: &CardState, now: DateTime<Utc>) -> f64 {
    // Clock skew can put last_review in the future; elapsed time is floored
    // at zero.
    let elapsed_days = state
        .last_review
        .map(|last| (now - last).num_seconds().max(0) as f64 / SECONDS_PER_DAY)
        .unwrap_or(0.0);
    let stability = estimated_stability(state).max(MIN_STABILITY_DAYS);
    ((-elapsed_days / stability).exp() * 100.0).clamp(0.0, 100.0)
}
