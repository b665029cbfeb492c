use chrono::{DateTime, TimeZone, Utc};

use crate::scheduler::CardState;

/// Fixed clock so transitions are reproducible across test runs.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

/// A card that already left the learning steps, lapse-free.
pub fn graduated_state(reps: u32, interval: u32, ease_factor: f64) -> CardState {
    CardState {
        interval,
        ease_factor,
        reps,
        ..CardState::new(fixed_now())
    }
}
