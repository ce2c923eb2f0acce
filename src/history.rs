//! Persisted, capacity-bounded log of past predictions, most recent first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    catalog::Label,
    error::{IkaraError, Result},
    log_info, log_warn,
    prediction::{percent, Prediction, Provenance},
    storage::{get_json, set_json, KeyValueStore},
};

const ENABLE_LOGS: bool = true;

pub const HISTORY_NAMESPACE: &str = "ikara";
pub const HISTORY_KEY: &str = "history";
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub label: Label,
    pub confidence: f64,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image_digest: Option<String>,
    #[serde(default = "default_provenance")]
    pub provenance: Provenance,
}

fn default_provenance() -> Provenance {
    Provenance::ModelDerived
}

impl From<&Prediction> for HistoryEntry {
    fn from(prediction: &Prediction) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: prediction.label,
            confidence: prediction.confidence,
            description: prediction.description.clone(),
            created_at: Utc::now(),
            image_digest: prediction.image_digest.clone(),
            provenance: prediction.provenance,
        }
    }
}

/// Every mutation is a read-modify-write against the store; concurrent
/// writers are not coordinated and the last write wins.
#[derive(Clone)]
pub struct HistoryLedger {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts at the front and evicts the oldest entries beyond capacity.
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.all()?;
        entries.insert(0, entry);
        if entries.len() > self.capacity {
            let evicted = entries.len() - self.capacity;
            entries.truncate(self.capacity);
            log_info!("History full; evicted {evicted} oldest entries");
        }
        self.persist(&entries)
    }

    /// Most recent first. Unreadable stored history is treated as empty.
    pub fn all(&self) -> Result<Vec<HistoryEntry>> {
        match get_json(self.store.as_ref(), HISTORY_NAMESPACE, HISTORY_KEY) {
            Ok(entries) => Ok(entries.unwrap_or_default()),
            Err(err) if err.is::<serde_json::Error>() => {
                log_warn!("Discarding unreadable history: {err:#}");
                Ok(Vec::new())
            }
            Err(err) => Err(IkaraError::Storage(err)),
        }
    }

    pub fn remove_at(&self, index: usize) -> Result<HistoryEntry> {
        let mut entries = self.all()?;
        if index >= entries.len() {
            return Err(IkaraError::IndexOutOfRange {
                index,
                len: entries.len(),
            });
        }
        let removed = entries.remove(index);
        self.persist(&entries)?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<()> {
        self.store
            .remove(HISTORY_NAMESPACE, HISTORY_KEY)
            .map_err(IkaraError::Storage)
    }

    /// `"<label> (<pct>%)"` per line for the `limit` most recent entries.
    pub fn recent_summary(&self, limit: usize) -> Result<String> {
        let entries = self.all()?;
        if entries.is_empty() {
            return Ok("No prediction history yet.".to_string());
        }
        Ok(entries
            .iter()
            .take(limit)
            .map(|entry| format!("{} ({}%)", entry.label, percent(entry.confidence)))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<()> {
        set_json(self.store.as_ref(), HISTORY_NAMESPACE, HISTORY_KEY, entries)
            .map_err(IkaraError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::StyleName, storage::MemoryStore};

    fn entry(label: Label, confidence: f64, description: &str) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            label,
            confidence,
            description: description.into(),
            created_at: Utc::now(),
            image_digest: None,
            provenance: Provenance::ModelDerived,
        }
    }

    fn ledger() -> HistoryLedger {
        HistoryLedger::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn capacity_bounds_the_ledger() {
        let ledger = ledger();
        for i in 0..25 {
            ledger
                .append(entry(Label::Style(StyleName::Warli), 0.5, &format!("#{i}")))
                .unwrap();
        }

        let all = ledger.all().unwrap();
        assert_eq!(all.len(), 20);
        assert_eq!(all[0].description, "#24");
        assert_eq!(all[19].description, "#5");
    }

    #[test]
    fn remove_at_deletes_by_position() {
        let ledger = ledger();
        ledger.append(entry(Label::Style(StyleName::Gond), 0.5, "old")).unwrap();
        ledger.append(entry(Label::Style(StyleName::Warli), 0.5, "new")).unwrap();

        let removed = ledger.remove_at(0).unwrap();
        assert_eq!(removed.description, "new");
        assert_eq!(ledger.all().unwrap().len(), 1);
    }

    #[test]
    fn stale_index_is_rejected_without_changes() {
        let ledger = ledger();
        ledger.append(entry(Label::Style(StyleName::Gond), 0.5, "only")).unwrap();

        assert!(matches!(
            ledger.remove_at(3),
            Err(IkaraError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert_eq!(ledger.all().unwrap().len(), 1);
    }

    #[test]
    fn clear_empties_history() {
        let ledger = ledger();
        ledger.append(entry(Label::Unknown, 0.3, "")).unwrap();
        ledger.clear().unwrap();
        assert!(ledger.all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_history_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_NAMESPACE, HISTORY_KEY, "not json").unwrap();
        let ledger = HistoryLedger::new(store);
        assert!(ledger.all().unwrap().is_empty());
    }

    #[test]
    fn minimal_entries_load_with_defaults() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                HISTORY_NAMESPACE,
                HISTORY_KEY,
                r#"[{"id":"a","label":"Kangra","confidence":0.9,"createdAt":"2025-01-01T00:00:00Z"}]"#,
            )
            .unwrap();
        let all = HistoryLedger::new(store).all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].provenance, Provenance::ModelDerived);
        assert_eq!(all[0].description, "");
    }

    #[test]
    fn summary_lists_recent_entries() {
        let ledger = ledger();
        assert_eq!(ledger.recent_summary(5).unwrap(), "No prediction history yet.");

        ledger.append(entry(Label::Style(StyleName::Gond), 0.7, "")).unwrap();
        ledger.append(entry(Label::Style(StyleName::KeralaMural), 1.0, "")).unwrap();
        assert_eq!(
            ledger.recent_summary(5).unwrap(),
            "Kerala Mural (100%)\nGond (70%)"
        );
        assert_eq!(ledger.recent_summary(1).unwrap(), "Kerala Mural (100%)");
    }
}
