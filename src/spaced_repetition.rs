use crate::error::{Error, Result};
use crate::models::{Card, MemoryState, ProjectedInterval, ReviewOutcome, ReviewStats};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Ease factor assigned to a card on creation.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Floor below which the ease factor never drops.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Cards with an interval at or past this many days count as mature.
const MATURE_INTERVAL_DAYS: u32 = 21;

/// SM-2 family spaced repetition scheduler.
///
/// `compute_next_review` is a pure function of its inputs: it never
/// touches the wall clock, so callers stamp the due date themselves via
/// [`SpacedRepetition::next_review_date`].
pub struct SpacedRepetition;

impl SpacedRepetition {
    /// Compute the memory state a card moves to after one review.
    ///
    /// Multiplicative interval growth is unstable for the first two
    /// repetitions, so those use fixed bootstrap intervals (1/4 days,
    /// then 3/6/8 days); from the third successful review on, the
    /// ease-factor-driven formula takes over. A lapse resets repetitions
    /// and schedules the card for tomorrow without touching the ease
    /// factor.
    ///
    /// A non-finite ease factor can only come from a corrupted store and
    /// is rejected rather than silently repaired.
    pub fn compute_next_review(current: &MemoryState, outcome: ReviewOutcome) -> Result<MemoryState> {
        if !current.ease_factor.is_finite() {
            return Err(Error::InvalidEaseFactor(current.ease_factor));
        }

        let mut next = *current;

        if outcome.is_pass() {
            next.interval = match current.repetitions {
                0 => match outcome {
                    ReviewOutcome::Easy => 4,
                    _ => 1,
                },
                1 => match outcome {
                    ReviewOutcome::Hard => 3,
                    ReviewOutcome::Easy => 8,
                    _ => 6,
                },
                _ => {
                    // The pre-update ease factor drives the growth.
                    let days = f64::from(current.interval);
                    let scaled = match outcome {
                        ReviewOutcome::Hard => days * 1.2,
                        ReviewOutcome::Easy => days * current.ease_factor * 1.3,
                        _ => days * current.ease_factor,
                    };
                    scaled.round() as u32
                }
            };
            next.repetitions = current.repetitions + 1;

            let q = f64::from(outcome.quality());
            next.ease_factor = current.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
        } else {
            next.repetitions = 0;
            next.interval = 1;
        }

        next.ease_factor = next.ease_factor.max(MIN_EASE_FACTOR);
        Ok(next)
    }

    /// Due timestamp for a card reviewed at `reviewed_at` with the given
    /// interval in days.
    pub fn next_review_date(reviewed_at: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
        reviewed_at + Duration::days(i64::from(interval))
    }

    /// Project the interval each of the four outcomes would produce,
    /// without committing anything.
    pub fn preview_intervals(current: &MemoryState) -> Result<Vec<ProjectedInterval>> {
        ReviewOutcome::ALL
            .iter()
            .map(|&outcome| {
                Self::compute_next_review(current, outcome).map(|next| ProjectedInterval {
                    outcome,
                    interval: next.interval,
                })
            })
            .collect()
    }

    /// Check if a card is due for review.
    pub fn is_due(card: &Card) -> bool {
        card.next_review <= Utc::now()
    }

    /// Get cards that are due for review.
    pub fn due_cards(cards: &HashMap<String, Card>) -> Vec<Card> {
        cards.values().filter(|card| Self::is_due(card)).cloned().collect()
    }

    /// Calculate review statistics over a card collection.
    pub fn deck_stats(cards: &HashMap<String, Card>) -> ReviewStats {
        let total_cards = cards.len();
        let cards_due = cards.values().filter(|card| Self::is_due(card)).count();
        let cards_new = cards.values().filter(|card| card.review_count == 0).count();
        let cards_learning = cards
            .values()
            .filter(|card| card.review_count > 0 && card.memory.interval < MATURE_INTERVAL_DAYS)
            .count();
        let cards_mature = cards
            .values()
            .filter(|card| card.memory.interval >= MATURE_INTERVAL_DAYS)
            .count();

        ReviewStats {
            total_cards,
            cards_due,
            cards_new,
            cards_learning,
            cards_mature,
        }
    }
}
