mod error;
mod preview;
mod queries;
mod retention;
mod revlog;
mod scheduler;
#[cfg(test)]
mod test_helpers;

pub use error::{Result, SchedulerError};
pub use preview::{NextStates, describe_outcome};
pub use queries::{
    CollectionStats, LeechSeverity, Scheduled, collection_stats, due_cards, is_leech,
    learning_cards, leech_cards, leech_severity, new_cards, retention_rate, review_forecast,
};
pub use retention::{current_retrievability, estimated_stability};
pub use revlog::{ReviewEntry, ReviewKind};
pub use scheduler::{CardState, Phase, Rating, ReviewOutcome, SM2, SchedulerConfig};
