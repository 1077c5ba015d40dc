//! Core library for a desktop spaced repetition study app.
//!
//! The scheduler ([`spaced_repetition`]) decides when each flashcard
//! comes back based on the learner's self-reported recall quality; the
//! [`card_service`] layer orchestrates reviews over a JSON-file card
//! store. A desktop shell provides the screens and wires these calls to
//! its IPC boundary.

pub mod card_service;
pub mod error;
pub mod models;
pub mod spaced_repetition;
pub mod storage;

pub use card_service::CardService;
pub use error::{Error, Result};
pub use models::{Card, MemoryState, ProjectedInterval, ReviewOutcome, ReviewStats};
pub use spaced_repetition::SpacedRepetition;
pub use storage::Storage;
