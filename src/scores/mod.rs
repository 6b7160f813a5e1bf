mod supabase;
pub use supabase::SupabaseStore;

#[cfg(test)]
pub mod testing;

use crate::{
    models::{Difficulty, NewScoreRecord, Notice, ScoreRecord},
    prelude::*,
};

use std::{cmp::Ordering, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("score store is not configured: {0} is missing")]
    NotConfigured(&'static str),

    #[error("invalid score store url: {0}")]
    InvalidUrl(String),

    #[error("invalid score store key")]
    InvalidKey,

    #[error("score store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("score store rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("score store returned no row for the insert")]
    EmptyInsert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreQuery {
    pub difficulty: Option<Difficulty>,
    pub limit: usize,
}

/// Remote table of finished games.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn insert(&self, record: &NewScoreRecord) -> Result<ScoreRecord, StoreError>;

    /// Rows matching `query`, fewest attempts first.
    async fn query(&self, query: &ScoreQuery) -> Result<Vec<ScoreRecord>, StoreError>;
}

/// Facade the controllers talk to. Store failures are logged and turned into
/// notices; they never fail the request.
#[derive(Clone)]
pub struct ScoreGateway {
    store: std::result::Result<Arc<dyn ScoreStore>, Arc<StoreError>>,
}

impl ScoreGateway {
    pub fn connect(cfg: &Config) -> Self {
        let store = SupabaseStore::from_config(cfg);

        return match store {
            Ok(store) => {
                info!(table = %cfg.scores_table, "Score store configured");
                Self::new(Arc::new(store))
            }
            Err(err) => {
                error!(error = %err, "Score store connection error");
                Self::disconnected(err)
            }
        };
    }

    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self { store: Ok(store) }
    }

    pub fn disconnected(err: StoreError) -> Self {
        Self {
            store: Err(Arc::new(err)),
        }
    }

    pub fn connection_error(&self) -> Option<Notice> {
        return self
            .store
            .as_ref()
            .err()
            .map(|err| Notice::error(format!("Score store connection error: {err}")));
    }

    pub async fn save_score(
        &self,
        record: &NewScoreRecord,
        notices: &mut Vec<Notice>,
    ) -> Option<ScoreRecord> {
        let Ok(store) = &self.store else {
            return None;
        };

        return match store.insert(record).await {
            Ok(saved) => {
                info!(
                    player = %saved.player_name,
                    difficulty = %saved.difficulty,
                    attempts = saved.attempts,
                    "High score saved"
                );
                Some(saved)
            }
            Err(err) => {
                error!(error = %err, "Error saving high score");
                notices.push(Notice::error(format!("Error saving high score: {err}")));
                None
            }
        };
    }

    pub async fn top_scores(
        &self,
        difficulty: Option<Difficulty>,
        limit: usize,
        notices: &mut Vec<Notice>,
    ) -> Vec<ScoreRecord> {
        let Ok(store) = &self.store else {
            return vec![];
        };

        if limit == 0 {
            return vec![];
        }

        let query = ScoreQuery { difficulty, limit };

        let mut scores = match store.query(&query).await {
            Ok(scores) => scores,
            Err(err) => {
                error!(error = %err, "Error retrieving high scores");
                notices.push(Notice::error(format!(
                    "Error retrieving high scores: {err}"
                )));
                return vec![];
            }
        };

        if let Some(difficulty) = difficulty {
            scores.retain(|score| score.difficulty == difficulty);
        }
        scores.sort_by(rank);
        scores.truncate(limit);

        return scores;
    }
}

fn rank(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    return a
        .attempts
        .cmp(&b.attempts)
        .then_with(|| a.time_taken.total_cmp(&b.time_taken));
}

#[cfg(test)]
mod tests {
    use super::{testing::MemoryStore, *};

    fn record(name: &str, difficulty: Difficulty, attempts: u32, time_taken: f64) -> NewScoreRecord {
        NewScoreRecord {
            difficulty,
            attempts,
            time_taken,
            player_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn saves_and_reads_back() {
        let store = Arc::new(MemoryStore::default());
        let gateway = ScoreGateway::new(store.clone());
        let mut notices = vec![];

        let saved = gateway
            .save_score(&record("Ann", Difficulty::Easy, 3, 9.5), &mut notices)
            .await
            .unwrap();

        assert_eq!(saved.player_name, "Ann");
        assert!(saved.created_at.is_some());
        assert!(notices.is_empty());
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn top_scores_are_capped_and_ascending() {
        let store = Arc::new(MemoryStore::default());
        let gateway = ScoreGateway::new(store.clone());
        let mut notices = vec![];

        for (i, attempts) in [7, 2, 9, 2, 5, 1, 8, 3, 6, 4, 10, 3].into_iter().enumerate() {
            gateway
                .save_score(
                    &record(&format!("p{i}"), Difficulty::Easy, attempts, i as f64),
                    &mut notices,
                )
                .await;
        }
        gateway
            .save_score(&record("hard", Difficulty::Hard, 1, 1.0), &mut notices)
            .await;

        let top = gateway
            .top_scores(Some(Difficulty::Easy), DEFAULT_LIMIT, &mut notices)
            .await;

        assert_eq!(top.len(), DEFAULT_LIMIT);
        assert!(top.windows(2).all(|w| w[0].attempts <= w[1].attempts));
        assert!(top.iter().all(|s| s.difficulty == Difficulty::Easy));

        // equal attempts fall back to the faster time
        assert_eq!(top[1].player_name, "p1");
        assert_eq!(top[2].player_name, "p3");

        let all = gateway.top_scores(None, 3, &mut notices).await;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].attempts, 1);

        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn top_scores_enforces_limit_on_misbehaving_store() {
        let store = Arc::new(MemoryStore::ignoring_limit());
        let gateway = ScoreGateway::new(store.clone());
        let mut notices = vec![];

        for attempts in [5, 4, 3, 2, 1] {
            gateway
                .save_score(&record("x", Difficulty::Medium, attempts, 1.0), &mut notices)
                .await;
        }

        let top = gateway
            .top_scores(Some(Difficulty::Medium), 2, &mut notices)
            .await;

        assert_eq!(top.iter().map(|s| s.attempts).collect::<Vec<_>>(), vec![1, 2]);
        assert!(gateway.top_scores(None, 0, &mut notices).await.is_empty());
    }

    #[tokio::test]
    async fn failures_become_notices() {
        let store = Arc::new(MemoryStore::failing());
        let gateway = ScoreGateway::new(store);
        let mut notices = vec![];

        let saved = gateway
            .save_score(&record("Ann", Difficulty::Easy, 3, 1.0), &mut notices)
            .await;
        let top = gateway
            .top_scores(Some(Difficulty::Easy), DEFAULT_LIMIT, &mut notices)
            .await;

        assert!(saved.is_none());
        assert!(top.is_empty());
        assert_eq!(notices.len(), 2);
        assert!(notices[0].text.starts_with("Error saving high score"));
        assert!(notices[1].text.starts_with("Error retrieving high scores"));
    }

    #[tokio::test]
    async fn disconnected_gateway_is_a_no_op() {
        let gateway = ScoreGateway::disconnected(StoreError::NotConfigured("SUPABASE_URL"));
        let mut notices = vec![];

        assert!(gateway
            .save_score(&record("Ann", Difficulty::Easy, 3, 1.0), &mut notices)
            .await
            .is_none());
        assert!(gateway
            .top_scores(None, DEFAULT_LIMIT, &mut notices)
            .await
            .is_empty());
        assert!(notices.is_empty());

        let notice = gateway.connection_error().unwrap();
        assert!(notice.text.contains("SUPABASE_URL is missing"));
    }
}
