use super::{Difficulty, NewScoreRecord};

use std::{cmp::Ordering, fmt, ops::RangeInclusive};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TARGET_RANGE: RangeInclusive<i64> = 1..=100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Hint {
    TooLow,
    TooHigh,
}

impl Hint {
    pub fn message(&self) -> &'static str {
        match self {
            Hint::TooLow => "Too low! Guess higher.",
            Hint::TooHigh => "Too high! Guess lower.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuessOutcome {
    /// Wrong guess with attempts left.
    Miss(Hint),
    Won { attempts: u32, elapsed_seconds: f64 },
    /// Wrong guess that used up the last attempt.
    Lost { hint: Hint, target: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessRejection {
    MissingName,
    GameOver,
    OutOfRange(i64),
}

impl fmt::Display for GuessRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessRejection::MissingName => f.write_str("Please enter your name!"),
            GuessRejection::GameOver => {
                f.write_str("This game is over. Start a new game to play again!")
            }
            GuessRejection::OutOfRange(value) => write!(
                f,
                "{value} is out of range, guess a number between {} and {}",
                TARGET_RANGE.start(),
                TARGET_RANGE.end()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum GameStatus {
    Playing,
    Won { elapsed_seconds: f64 },
    Lost,
}

/// One player's current game. Lives in the player's session between requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSession {
    target: i64,
    attempts: u32,
    difficulty: Difficulty,
    start_time: DateTime<Utc>,
    status: GameStatus,
}

impl GameSession {
    pub fn new_game(difficulty: Difficulty) -> Self {
        return Self::new_game_with(difficulty, &mut rand::thread_rng(), Utc::now());
    }

    pub fn new_game_with(difficulty: Difficulty, rng: &mut impl Rng, now: DateTime<Utc>) -> Self {
        return Self::with_target(difficulty, rng.gen_range(TARGET_RANGE), now);
    }

    pub(crate) fn with_target(difficulty: Difficulty, target: i64, now: DateTime<Utc>) -> Self {
        Self {
            target,
            attempts: 0,
            difficulty,
            start_time: now,
            status: GameStatus::Playing,
        }
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.difficulty.max_attempts()
    }

    pub fn attempts_left(&self) -> u32 {
        self.max_attempts().saturating_sub(self.attempts)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn submit_guess(
        &mut self,
        player_name: &str,
        value: i64,
    ) -> Result<GuessOutcome, GuessRejection> {
        return self.submit_guess_at(player_name, value, Utc::now());
    }

    pub fn submit_guess_at(
        &mut self,
        player_name: &str,
        value: i64,
        now: DateTime<Utc>,
    ) -> Result<GuessOutcome, GuessRejection> {
        if player_name.trim().is_empty() {
            return Err(GuessRejection::MissingName);
        }
        if self.is_over() {
            return Err(GuessRejection::GameOver);
        }
        if !TARGET_RANGE.contains(&value) {
            return Err(GuessRejection::OutOfRange(value));
        }

        self.attempts += 1;

        let hint = match value.cmp(&self.target) {
            Ordering::Equal => {
                let elapsed_seconds =
                    (now - self.start_time).num_milliseconds().max(0) as f64 / 1000.0;
                self.status = GameStatus::Won { elapsed_seconds };

                return Ok(GuessOutcome::Won {
                    attempts: self.attempts,
                    elapsed_seconds,
                });
            }
            Ordering::Less => Hint::TooLow,
            Ordering::Greater => Hint::TooHigh,
        };

        if self.attempts >= self.max_attempts() {
            self.status = GameStatus::Lost;

            return Ok(GuessOutcome::Lost {
                hint,
                target: self.target,
            });
        }

        return Ok(GuessOutcome::Miss(hint));
    }

    /// Score to persist for a won game.
    pub fn score_record(&self, player_name: &str) -> Option<NewScoreRecord> {
        let GameStatus::Won { elapsed_seconds } = self.status else {
            return None;
        };

        return Some(NewScoreRecord {
            difficulty: self.difficulty,
            attempts: self.attempts,
            time_taken: elapsed_seconds,
            player_name: player_name.trim().to_string(),
        });
    }
}
