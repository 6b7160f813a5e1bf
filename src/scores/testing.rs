use super::{ScoreQuery, ScoreStore, StoreError};

use crate::models::{NewScoreRecord, ScoreRecord};

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

/// In-memory stand-in for the remote table.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<ScoreRecord>>,
    fail: bool,
    ignore_limit: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Returns every row unsorted, like a store that ignores the query.
    pub fn ignoring_limit() -> Self {
        Self {
            ignore_limit: true,
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<ScoreRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn insert(&self, record: &NewScoreRecord) -> Result<ScoreRecord, StoreError> {
        if self.fail {
            return Err(StoreError::Rejected {
                status: 401,
                body: "Invalid API key".to_string(),
            });
        }

        let mut rows = self.rows.lock().unwrap();

        let mut saved = ScoreRecord::from(record.clone());
        saved.id = Some(rows.len() as i64 + 1);
        saved.created_at = Some(Utc::now());
        rows.push(saved.clone());

        return Ok(saved);
    }

    async fn query(&self, query: &ScoreQuery) -> Result<Vec<ScoreRecord>, StoreError> {
        if self.fail {
            return Err(StoreError::Rejected {
                status: 503,
                body: "Service unavailable".to_string(),
            });
        }

        let rows = self.rows();
        if self.ignore_limit {
            return Ok(rows);
        }

        let mut rows: Vec<ScoreRecord> = rows
            .into_iter()
            .filter(|row| query.difficulty.map_or(true, |d| row.difficulty == d))
            .collect();
        rows.sort_by_key(|row| row.attempts);
        rows.truncate(query.limit);

        return Ok(rows);
    }
}
