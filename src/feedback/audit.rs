use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Label,
    log_warn,
    storage::{get_json, set_json, KeyValueStore},
};

const ENABLE_LOGS: bool = true;

pub const FEEDBACK_NAMESPACE: &str = "ikara";
pub const FEEDBACK_KEY: &str = "feedback";

/// One submitted correction claim and how it was decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub predicted: Label,
    pub claimed: String,
    pub justification: String,
    pub timestamp: DateTime<Utc>,
    pub accepted: bool,
    pub image_digest: Option<String>,
}

/// Append-only audit trail of feedback. Unbounded; see `len` and `clear`.
#[derive(Clone)]
pub struct FeedbackLog {
    store: Arc<dyn KeyValueStore>,
}

impl FeedbackLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Fails without writing when the stored log cannot be decoded, so a
    /// corrupt trail is never replaced by a shorter one.
    pub fn append(&self, record: FeedbackRecord) -> Result<()> {
        let mut records: Vec<FeedbackRecord> =
            get_json(self.store.as_ref(), FEEDBACK_NAMESPACE, FEEDBACK_KEY)?.unwrap_or_default();
        records.push(record);
        set_json(self.store.as_ref(), FEEDBACK_NAMESPACE, FEEDBACK_KEY, &records)
    }

    /// Oldest first. A corrupt stored log reads as empty.
    pub fn records(&self) -> Result<Vec<FeedbackRecord>> {
        match get_json(self.store.as_ref(), FEEDBACK_NAMESPACE, FEEDBACK_KEY) {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(err) if err.is::<serde_json::Error>() => {
                log_warn!("Discarding unreadable feedback log: {err:#}");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(FEEDBACK_NAMESPACE, FEEDBACK_KEY)
    }
}
