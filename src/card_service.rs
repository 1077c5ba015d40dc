use crate::error::{Error, Result};
use crate::models::{
    BulkUpdateRequest, Card, CreateCardRequest, MemoryState, ProjectedInterval, ReviewOutcome, ReviewStats, SearchRequest, TagStats,
    UpdateCardRequest,
};
use crate::spaced_repetition::SpacedRepetition;
use crate::storage::Storage;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Owns the in-memory card collection and persists every mutation.
///
/// The single lock around the card map serializes the read-modify-write
/// of each review, so two concurrent reviews of the same card cannot
/// lose an update.
pub struct CardService {
    cards: Mutex<HashMap<String, Card>>,
    storage: Storage,
}

impl CardService {
    pub fn new(storage: Storage) -> Result<Self> {
        let cards = storage.load_cards()?;
        Ok(CardService {
            cards: Mutex::new(cards),
            storage,
        })
    }

    pub fn create_card(&self, request: CreateCardRequest) -> Result<Card> {
        let mut cards = self.lock_cards()?;

        let card = Card {
            id: Uuid::new_v4().to_string(),
            front: request.front,
            back: request.back,
            tag: request.tag,
            created_at: Utc::now(),
            last_reviewed: None,
            next_review: Utc::now(), // Available immediately for first review
            memory: MemoryState::default(),
            review_count: 0,
            correct_count: 0,
        };

        cards.insert(card.id.clone(), card.clone());
        self.storage.save_cards(&cards)?;
        Ok(card)
    }

    pub fn get_cards(&self) -> Result<Vec<Card>> {
        let cards = self.lock_cards()?;
        Ok(cards.values().cloned().collect())
    }

    pub fn get_card(&self, id: &str) -> Result<Option<Card>> {
        let cards = self.lock_cards()?;
        Ok(cards.get(id).cloned())
    }

    pub fn update_card(&self, id: &str, request: UpdateCardRequest) -> Result<Card> {
        let mut cards = self.lock_cards()?;

        let card = cards.get_mut(id).ok_or_else(|| Error::CardNotFound(id.to_string()))?;
        card.front = request.front;
        card.back = request.back;
        card.tag = request.tag;

        let updated_card = card.clone();
        self.storage.save_cards(&cards)?;
        Ok(updated_card)
    }

    pub fn delete_card(&self, id: &str) -> Result<()> {
        let mut cards = self.lock_cards()?;

        if cards.remove(id).is_none() {
            return Err(Error::CardNotFound(id.to_string()));
        }
        self.storage.save_cards(&cards)?;
        Ok(())
    }

    pub fn get_due_cards(&self) -> Result<Vec<Card>> {
        let cards = self.lock_cards()?;
        Ok(SpacedRepetition::due_cards(&cards))
    }

    /// Apply one review: advance the card's memory state, stamp the due
    /// date from the returned interval, and persist.
    pub fn review_card(&self, id: &str, outcome: ReviewOutcome) -> Result<Card> {
        let mut cards = self.lock_cards()?;

        let card = cards.get_mut(id).ok_or_else(|| Error::CardNotFound(id.to_string()))?;
        let next_memory = SpacedRepetition::compute_next_review(&card.memory, outcome)?;

        let now = Utc::now();
        card.last_reviewed = Some(now);
        card.next_review = SpacedRepetition::next_review_date(now, next_memory.interval);
        card.memory = next_memory;
        card.review_count += 1;
        if outcome.is_pass() {
            card.correct_count += 1;
        }

        log::debug!(
            "reviewed card {} as {}: next in {} days",
            card.id,
            outcome.name(),
            card.memory.interval
        );

        let updated_card = card.clone();
        self.storage.save_cards(&cards)?;
        Ok(updated_card)
    }

    /// Intervals each rating button would schedule, for display before
    /// the learner picks one. Commits nothing.
    pub fn preview_intervals(&self, id: &str) -> Result<Vec<ProjectedInterval>> {
        let cards = self.lock_cards()?;

        let card = cards.get(id).ok_or_else(|| Error::CardNotFound(id.to_string()))?;
        SpacedRepetition::preview_intervals(&card.memory)
    }

    pub fn get_review_stats(&self) -> Result<ReviewStats> {
        let cards = self.lock_cards()?;
        Ok(SpacedRepetition::deck_stats(&cards))
    }

    // Organization and search methods
    pub fn search_cards(&self, request: SearchRequest) -> Result<Vec<Card>> {
        let cards = self.lock_cards()?;
        let mut filtered_cards: Vec<Card> = cards.values().cloned().collect();

        // Filter by query (searches front and back text)
        if let Some(query) = &request.query {
            let query_lower = query.to_lowercase();
            filtered_cards
                .retain(|card| card.front.to_lowercase().contains(&query_lower) || card.back.to_lowercase().contains(&query_lower));
        }

        // Filter by tag
        if let Some(tag) = &request.tag {
            filtered_cards.retain(|card| card.tag.as_ref().map_or(false, |t| t == tag));
        }

        Ok(filtered_cards)
    }

    pub fn get_tags(&self) -> Result<Vec<String>> {
        let cards = self.lock_cards()?;
        let mut tags: Vec<String> = cards
            .values()
            .filter_map(|card| card.tag.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        tags.sort();
        Ok(tags)
    }

    pub fn get_tag_stats(&self) -> Result<Vec<TagStats>> {
        let cards = self.lock_cards()?;
        let mut tag_map: HashMap<String, Vec<Card>> = HashMap::new();

        // Group cards by tag
        for card in cards.values() {
            let tag = card.tag.clone().unwrap_or_else(|| "Untagged".to_string());
            tag_map.entry(tag).or_default().push(card.clone());
        }

        let mut stats: Vec<TagStats> = tag_map
            .into_iter()
            .map(|(name, cards)| {
                let due_cards = cards.iter().filter(|c| SpacedRepetition::is_due(c)).count();
                let new_cards = cards.iter().filter(|c| c.review_count == 0).count();
                let mature_cards = cards.iter().filter(|c| c.memory.interval >= 21).count();

                TagStats {
                    name,
                    total_cards: cards.len(),
                    cards_due: due_cards,
                    cards_new: new_cards,
                    cards_mature: mature_cards,
                }
            })
            .collect();

        stats.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stats)
    }

    pub fn bulk_update_tag(&self, request: BulkUpdateRequest) -> Result<Vec<Card>> {
        let mut cards = self.lock_cards()?;
        let mut updated_cards = Vec::new();

        for card_id in &request.card_ids {
            if let Some(card) = cards.get_mut(card_id) {
                card.tag = request.tag.clone();
                updated_cards.push(card.clone());
            }
        }

        if !updated_cards.is_empty() {
            self.storage.save_cards(&cards)?;
        }

        Ok(updated_cards)
    }

    pub fn delete_multiple_cards(&self, card_ids: Vec<String>) -> Result<()> {
        let mut cards = self.lock_cards()?;
        let mut deleted_count = 0;

        for card_id in card_ids {
            if cards.remove(&card_id).is_some() {
                deleted_count += 1;
            }
        }

        if deleted_count > 0 {
            self.storage.save_cards(&cards)?;
        }

        Ok(())
    }

    fn lock_cards(&self) -> Result<MutexGuard<'_, HashMap<String, Card>>> {
        self.cards.lock().map_err(|_| Error::StorePoisoned)
    }
}
