use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{ScoreId, UserId};

/// Immutable outcome of one finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Score {
    pub id: ScoreId,
    pub user_id: UserId,
    pub date: String, // ISO 8601 calendar date
    pub won: bool,
    pub total_guesses: i32,
    pub missed_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreView {
    pub user_name: String,
    pub date: String,
    pub won: bool,
    pub guesses: i32,
    pub missed_letters: i32,
}

impl ScoreView {
    pub fn new(score: &Score, user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            date: score.date.clone(),
            won: score.won,
            guesses: score.total_guesses,
            missed_letters: score.missed_count,
        }
    }
}
