//! Persistent vocabulary keyed by normalized word form.
//!
//! The whole file is rewritten on every mutation; corpora are small.

use std::collections::HashMap;

use vokabel_types::{VocabRecord, normalize_word};

pub mod backend;
pub mod error;
pub mod format;

pub use backend::{FileBackend, MemoryBackend, VocabBackend};
pub use error::StoreError;

pub struct Store {
    records: HashMap<String, VocabRecord>,
    backend: Box<dyn VocabBackend>,
}

impl Store {
    /// Empty store that persists through `backend`, without reading it
    pub fn new(backend: impl VocabBackend + 'static) -> Self {
        Self {
            records: HashMap::new(),
            backend: Box::new(backend),
        }
    }

    /// Rebuild from persisted storage. Never fails: unreadable storage
    /// yields an empty store.
    pub fn load(backend: impl VocabBackend + 'static) -> Self {
        let mut store = Self::new(backend);

        match store.backend.read_all() {
            Ok(Some(contents)) => {
                for record in format::decode(&contents) {
                    store.records.insert(record.front.clone(), record);
                }
                tracing::info!("Loaded {} vocabulary records", store.records.len());
            }
            Ok(None) => tracing::info!("No vocabulary file yet, starting empty"),
            Err(e) => tracing::error!("Failed to read vocabulary, starting empty: {}", e),
        }

        store
    }

    pub fn get(&self, word: &str) -> Option<VocabRecord> {
        self.records.get(&normalize_word(word)).cloned()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.records.contains_key(&normalize_word(word))
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    /// Records sorted by word, for listing
    pub fn records(&self) -> Vec<VocabRecord> {
        let mut records: Vec<VocabRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.front.cmp(&b.front));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or replace by `front`, then save.
    ///
    /// On a save error the record stays in memory.
    pub fn put(&mut self, record: VocabRecord) -> Result<(), StoreError> {
        if record.front.is_empty() || normalize_word(&record.front) != record.front {
            return Err(StoreError::InvalidRecord(record.front));
        }

        tracing::debug!("Storing '{}'", record.front);
        self.records.insert(record.front.clone(), record);
        self.save()
    }

    /// Returns `false` without touching storage if the word is unknown
    pub fn remove(&mut self, word: &str) -> Result<bool, StoreError> {
        if self.records.remove(&normalize_word(word)).is_none() {
            return Ok(false);
        }

        self.save()?;
        Ok(true)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let contents = format::encode(self.records.values());
        self.backend.write_all(&contents)?;
        Ok(())
    }
}
