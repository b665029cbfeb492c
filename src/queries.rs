use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::scheduler::{CardState, Phase, SchedulerConfig};

/// Structural access to the scheduling state embedded in an item record.
/// Vocabulary, morphology, and passage cards differ everywhere else; the
/// queries below only ever touch this field and never mutate it.
pub trait Scheduled {
    fn scheduling_state(&self) -> &CardState;
}

impl Scheduled for CardState {
    fn scheduling_state(&self) -> &CardState {
        self
    }
}

/// Items ripe for review, earliest overdue first.
pub fn due_cards<'a, T: Scheduled>(items: &'a [T], now: DateTime<Utc>) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| item.scheduling_state().is_due(now))
        .sorted_by_key(|item| item.scheduling_state().due)
        .collect()
}

/// Items never presented: no successes, no failures.
pub fn new_cards<T: Scheduled>(items: &[T]) -> Vec<&T> {
    items
        .iter()
        .filter(|item| item.scheduling_state().phase() == Phase::New)
        .collect()
}

/// Items between their first and second learning step. Relearning cards
/// (reps reset by a lapse) surface through the due set instead.
pub fn learning_cards<T: Scheduled>(items: &[T]) -> Vec<&T> {
    items
        .iter()
        .filter(|item| item.scheduling_state().reps == 1)
        .collect()
}

/// Historical recall accuracy over a set, in percent. 0 for an empty or
/// untouched set.
pub fn retention_rate<T: Scheduled>(items: &[T]) -> f64 {
    let (reps, lapses) = items.iter().fold((0u64, 0u64), |(reps, lapses), item| {
        let state = item.scheduling_state();
        (reps + u64::from(state.reps), lapses + u64::from(state.lapses))
    });
    if reps + lapses == 0 {
        return 0.0;
    }
    reps as f64 / (reps + lapses) as f64 * 100.0
}

/// Per-calendar-day due counts over the next `horizon_days`, index 0 being
/// today. Overdue items count toward bucket 0.
pub fn review_forecast<T: Scheduled>(
    items: &[T],
    now: DateTime<Utc>,
    horizon_days: usize,
) -> Vec<usize> {
    let today = now.date_naive();
    let buckets = items
        .iter()
        .map(|item| {
            (item.scheduling_state().due.date_naive() - today)
                .num_days()
                .max(0)
        })
        .filter(|&day| day < horizon_days as i64)
        .counts();
    (0..horizon_days as i64)
        .map(|day| buckets.get(&day).copied().unwrap_or(0))
        .collect()
}

/// Advisory difficulty flag; never alters scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeechSeverity {
    None,
    Warning,
    Leech,
}

pub fn leech_severity(state: &CardState, config: &SchedulerConfig) -> LeechSeverity {
    if state.lapses >= config.leech_threshold {
        LeechSeverity::Leech
    } else if state.lapses >= config.leech_warning_threshold {
        LeechSeverity::Warning
    } else {
        LeechSeverity::None
    }
}

pub fn is_leech(state: &CardState, config: &SchedulerConfig) -> bool {
    leech_severity(state, config) == LeechSeverity::Leech
}

/// Chronically failed items that deserve special attention from the learner.
pub fn leech_cards<'a, T: Scheduled>(items: &'a [T], config: &SchedulerConfig) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| is_leech(item.scheduling_state(), config))
        .collect()
}

/// One-pass dashboard aggregate over a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total: usize,
    pub new: usize,
    /// Cards in the minute-granularity steps, relearning included.
    pub learning: usize,
    pub review: usize,
    pub due: usize,
    pub leeches: usize,
}

pub fn collection_stats<T: Scheduled>(
    items: &[T],
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> CollectionStats {
    let mut stats = CollectionStats {
        total: items.len(),
        ..CollectionStats::default()
    };
    for item in items {
        let state = item.scheduling_state();
        match state.phase() {
            Phase::New => stats.new += 1,
            Phase::Learning => stats.learning += 1,
            Phase::Review => stats.review += 1,
        }
        if state.is_due(now) {
            stats.due += 1;
        }
        if is_leech(state, config) {
            stats.leeches += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::test_helpers::{fixed_now, graduated_state};

    fn deck() -> Vec<CardState> {
        let now = fixed_now();
        let overdue = CardState {
            due: now - Duration::days(3),
            ..graduated_state(4, 10, 2.5)
        };
        let due_now = CardState {
            due: now,
            ..graduated_state(3, 3, 2.5)
        };
        let tomorrow = CardState {
            due: now + Duration::days(1),
            ..graduated_state(2, 1, 2.5)
        };
        let fresh = CardState::new(now);
        let learning = CardState {
            reps: 1,
            due: now + Duration::minutes(10),
            ..CardState::new(now)
        };
        vec![overdue, due_now, tomorrow, fresh, learning]
    }

    #[test]
    fn due_set_is_exact_and_sorted() {
        let now = fixed_now();
        let deck = deck();
        let due = due_cards(&deck, now);

        assert_eq!(due.len(), 3);
        assert!(due.iter().all(|card| card.due <= now));
        assert!(due.windows(2).all(|pair| pair[0].due <= pair[1].due));
        assert_eq!(due[0].due, now - Duration::days(3));
    }

    #[test]
    fn new_and_learning_sets_partition_by_counters() {
        let deck = deck();

        let new = new_cards(&deck);
        assert_eq!(new.len(), 1);
        assert_eq!((new[0].reps, new[0].lapses), (0, 0));

        let learning = learning_cards(&deck);
        assert_eq!(learning.len(), 1);
        assert_eq!(learning[0].reps, 1);
    }

    #[test]
    fn retention_rate_handles_empty_and_mixed_sets() {
        let now = fixed_now();
        assert_eq!(retention_rate(&[] as &[CardState]), 0.0);
        assert_eq!(retention_rate(&[CardState::new(now)]), 0.0);

        let mut failed = graduated_state(6, 10, 2.5);
        failed.lapses = 2;
        let deck = vec![graduated_state(2, 1, 2.5), failed];
        // 8 successes, 2 failures
        assert!((retention_rate(&deck) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn forecast_buckets_by_calendar_day() {
        let now = fixed_now();
        let deck = deck();
        let forecast = review_forecast(&deck, now, 7);

        assert_eq!(forecast.len(), 7);
        // 3-day-overdue, due-now, fresh, and learning cards all count today
        assert_eq!(forecast[0], 4);
        assert_eq!(forecast[1], 1);
        assert!(forecast[2..].iter().all(|&count| count == 0));
    }

    #[test]
    fn forecast_ignores_cards_beyond_horizon() {
        let now = fixed_now();
        let far = CardState {
            due: now + Duration::days(30),
            ..graduated_state(5, 30, 2.5)
        };
        assert_eq!(review_forecast(&[far], now, 7), vec![0; 7]);
    }

    #[test]
    fn leech_thresholds_split_into_bands() {
        let config = SchedulerConfig::default();
        let mut card = graduated_state(2, 1, 2.5);

        assert_eq!(leech_severity(&card, &config), LeechSeverity::None);

        card.lapses = 5;
        assert_eq!(leech_severity(&card, &config), LeechSeverity::Warning);
        assert!(!is_leech(&card, &config));

        card.lapses = 8;
        assert_eq!(leech_severity(&card, &config), LeechSeverity::Leech);

        let deck = vec![card, graduated_state(4, 10, 2.5)];
        assert_eq!(leech_cards(&deck, &config).len(), 1);
    }

    #[test]
    fn stats_agree_with_individual_queries() {
        let now = fixed_now();
        let config = SchedulerConfig::default();
        let deck = deck();

        let stats = collection_stats(&deck, now, &config);

        assert_eq!(stats.total, deck.len());
        assert_eq!(stats.new, new_cards(&deck).len());
        assert_eq!(stats.learning, learning_cards(&deck).len());
        assert_eq!(stats.review, 3);
        assert_eq!(stats.due, due_cards(&deck, now).len());
        assert_eq!(stats.leeches, 0);
    }
}
