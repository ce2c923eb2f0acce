use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::imaging::ImagePayload;

use super::{ClassificationOracle, OracleError, OracleResult};

/// Oracle that replays queued responses in order. Used for offline runs and
/// tests.
#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<OracleResult, OracleError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reply is delivered after `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push(&self, reply: Result<OracleResult, OracleError>) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationOracle for ScriptedOracle {
    async fn classify(&self, _image: &ImagePayload) -> Result<OracleResult, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Err(OracleError::EmptyResponse));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}
