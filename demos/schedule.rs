use chrono::Utc;
use sm2::{CardState, Rating, ReviewEntry, SM2, describe_outcome, due_cards, review_forecast};

fn schedule_new_card() -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = SM2::default();
    let now = Utc::now();

    // Create a new card
    let mut card = scheduler.starting_state(now);

    // Preview what each answer button would do
    let next_states = scheduler.next_states(&card, now);
    println!("Again: {}", describe_outcome(&next_states.again));
    println!("Hard:  {}", describe_outcome(&next_states.hard));
    println!("Good:  {}", describe_outcome(&next_states.good));
    println!("Easy:  {}", describe_outcome(&next_states.easy));

    // Assume the card was reviewed and the rating was `good`, twice: through
    // both learning steps and out to a whole-day interval
    let entry = ReviewEntry::record(&card, Rating::Good, now);
    card = scheduler.next_state(&card, Rating::Good, now).state;
    card = scheduler.next_state(&card, Rating::Good, now).state;

    println!("Graduated at {} day(s), next review due {}", card.interval, card.due);
    println!("First review logged as {:?}", entry.kind);
    Ok(())
}

fn schedule_existing_deck() {
    let scheduler = SM2::default();
    let now = Utc::now();

    // Seed a small deck and push every card through a first review
    let mut deck: Vec<CardState> = (0..20)
        .map(|_| scheduler.starting_state(now))
        .collect();
    for card in &mut deck {
        *card = scheduler.next_state(card, Rating::Easy, now).state;
    }

    println!("Due now: {}", due_cards(&deck, now).len());
    println!("Next 7 days: {:?}", review_forecast(&deck, now, 7));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fern::Dispatch::new()
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;

    println!("Scheduling a new card:");
    schedule_new_card()?;

    println!("\nForecasting an existing deck:");
    schedule_existing_deck();

    Ok(())
}
