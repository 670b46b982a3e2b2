//! Bounded in-memory retention of recent analyses. Nothing is persisted.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::matching::ranker::RankedResultSet;

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub jd_text: String,
    pub ranked: RankedResultSet,
}

impl Analysis {
    pub fn new(jd_text: String, ranked: RankedResultSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            jd_text,
            ranked,
        }
    }
}

/// Oldest analyses are evicted once `capacity` is reached.
#[derive(Clone)]
pub struct AnalysisStore {
    inner: Arc<RwLock<VecDeque<Arc<Analysis>>>>,
    capacity: usize,
}

impl AnalysisStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub async fn insert(&self, analysis: Analysis) -> Arc<Analysis> {
        let analysis = Arc::new(analysis);
        let mut entries = self.inner.write().await;
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(Arc::clone(&analysis));
        analysis
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Analysis>> {
        self.inner
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
