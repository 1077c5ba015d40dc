use crate::error::Error;
use crate::spaced_repetition::DEFAULT_EASE_FACTOR;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Learner's self-reported recall quality for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOutcome {
    Again, // Failed recall
    Hard,  // Recalled with serious difficulty
    Good,  // Recalled with some hesitation
    Easy,  // Perfect recall
}

impl ReviewOutcome {
    /// Every outcome, in rating-button order.
    pub const ALL: [ReviewOutcome; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// SM-2 quality score. The rating scale is coarser than classic
    /// SM-2's 0-5: qualities 1 and 2 are unreachable.
    pub fn quality(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 3,
            Self::Good => 4,
            Self::Easy => 5,
        }
    }

    /// A pass is any outcome with quality >= 3.
    pub fn is_pass(self) -> bool {
        !matches!(self, Self::Again)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl FromStr for ReviewOutcome {
    type Err = Error;

    /// Strict parse: anything outside the four recognized outcomes is
    /// rejected rather than downgraded to `Again`.
    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            other => Err(Error::UnknownOutcome(other.to_string())),
        }
    }
}

/// Per-card scheduling record. Fields missing from stored JSON fall back
/// to the values a freshly created card starts with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Multiplier controlling how fast intervals grow. Never below 1.3.
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Consecutive successful reviews since the last lapse.
    #[serde(default)]
    pub repetitions: u32,
    /// Days until the next scheduled review, computed at the last review.
    #[serde(default)]
    pub interval: u32,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl Default for MemoryState {
    fn default() -> Self {
        MemoryState {
            ease_factor: DEFAULT_EASE_FACTOR,
            repetitions: 0,
            interval: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    pub tag: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: DateTime<Utc>,
    #[serde(default)]
    pub memory: MemoryState,
    pub review_count: u32,
    pub correct_count: u32,
}

/// Interval a card would get for one hypothetical outcome, used by the
/// rating buttons to show "comes back in N days" before the learner picks.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectedInterval {
    pub outcome: ReviewOutcome,
    pub interval: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_cards: usize,
    pub cards_due: usize,
    pub cards_new: usize,
    pub cards_learning: usize,
    pub cards_mature: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub front: String,
    pub back: String,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCardRequest {
    pub front: String,
    pub back: String,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkUpdateRequest {
    pub card_ids: Vec<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagStats {
    pub name: String,
    pub total_cards: usize,
    pub cards_due: usize,
    pub cards_new: usize,
    pub cards_mature: usize,
}
