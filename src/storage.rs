use crate::error::{Error, Result};
use crate::models::Card;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// JSON-file persistence for the card collection.
pub struct Storage {
    data_file: PathBuf,
}

impl Storage {
    /// Store cards under the per-user data directory (cross-platform).
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir().ok_or(Error::DataDirUnavailable)?.join("mnemo");

        std::fs::create_dir_all(&data_dir)?;
        let data_file = data_dir.join("cards.json");

        Ok(Storage { data_file })
    }

    /// Store cards at an explicit path. Used by tests.
    pub fn new_with_path(data_file: PathBuf) -> Self {
        Storage { data_file }
    }

    pub fn load_cards(&self) -> Result<HashMap<String, Card>> {
        if !self.data_file.exists() {
            return Ok(HashMap::new());
        }

        let file = File::open(&self.data_file)?;
        let reader = BufReader::new(file);
        // A store that no longer parses surfaces as an error instead of
        // silently resetting the learner's progress.
        let cards: HashMap<String, Card> = serde_json::from_reader(reader)?;
        log::debug!("loaded {} cards from {:?}", cards.len(), self.data_file);
        Ok(cards)
    }

    pub fn save_cards(&self, cards: &HashMap<String, Card>) -> Result<()> {
        let file = OpenOptions::new().write(true).create(true).truncate(true).open(&self.data_file)?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, cards)?;
        Ok(())
    }

    pub fn data_file_path(&self) -> &Path {
        &self.data_file
    }
}
