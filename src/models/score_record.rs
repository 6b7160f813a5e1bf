use super::Difficulty;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Insert payload for the `high_scores` table. `created_at` is assigned by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewScoreRecord {
    pub difficulty: Difficulty,
    pub attempts: u32,
    pub time_taken: f64,
    pub player_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub difficulty: Difficulty,
    pub attempts: u32,
    pub time_taken: f64,
    pub player_name: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ScoreRecord {
    pub fn time_taken_display(&self) -> String {
        format!("{:.1}s", self.time_taken)
    }

    pub fn created_at_display(&self) -> String {
        return self
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
    }
}

impl From<NewScoreRecord> for ScoreRecord {
    fn from(record: NewScoreRecord) -> Self {
        Self {
            id: None,
            difficulty: record.difficulty,
            attempts: record.attempts,
            time_taken: record.time_taken,
            player_name: record.player_name,
            created_at: None,
        }
    }
}
