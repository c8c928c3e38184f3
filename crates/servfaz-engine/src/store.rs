//! The persistence boundary
//!
//! Saving calculation records is an external concern. The core hands a
//! store collaborator the input and the outcome; the store mints the
//! record identifier and the creation timestamp, never this crate.

use crate::error::{EngineError, Result};
use crate::fields::CalculationInput;
use crate::pipeline::CalculationOutcome;
use serde::{Deserialize, Serialize};

/// Reference to a persisted calculation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    /// Store-minted unique identifier
    pub id: String,
    /// Store-minted creation timestamp (ISO-8601)
    pub created_at: String,
}

/// Where calculation records go.
pub trait OutcomeStore {
    /// Persist one input/outcome pair, returning the minted record
    /// reference
    fn save(
        &mut self,
        input: &CalculationInput,
        outcome: &CalculationOutcome,
    ) -> Result<SavedRecord>;
}

/// In-memory store for tests and offline runs.
pub struct MemoryStore {
    records: Vec<(SavedRecord, serde_json::Value)>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Look a record up by id
    pub fn get(&self, id: &str) -> Option<&serde_json::Value> {
        self.records
            .iter()
            .find(|(record, _)| record.id == id)
            .map(|(_, payload)| payload)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeStore for MemoryStore {
    fn save(
        &mut self,
        input: &CalculationInput,
        outcome: &CalculationOutcome,
    ) -> Result<SavedRecord> {
        let record = SavedRecord {
            id: format!("calc-{:06}", self.records.len() + 1),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::json!({
            "input": serde_json::to_value(input)
                .map_err(|e| EngineError::Store(e.to_string()))?,
            "output": serde_json::to_value(outcome)
                .map_err(|e| EngineError::Store(e.to_string()))?,
        });

        self.records.push((record.clone(), payload));
        Ok(record)
    }
}
