use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameStatus {
    InProgress,
    Won,       // Every letter of the target revealed
    Lost,      // Ran out of wrong guesses
    Cancelled, // Abandoned by its owner before finishing
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
            GameStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(GameStatus::InProgress),
            "won" => Some(GameStatus::Won),
            "lost" => Some(GameStatus::Lost),
            "cancelled" => Some(GameStatus::Cancelled),
            _ => None,
        }
    }
}

/// A single accepted guess and the message it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TranscriptEntry {
    pub guess: String,
    pub result: String,
}

/// Outward representation of a game. Never exposes the target word
/// while the game is still running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameView {
    pub urlsafe_key: String,
    pub user_name: String,
    pub missed_letters: String,
    pub correct_letters: String,
    pub used_letters: String,
    pub reveal: String,
    pub guesses_remaining: i32,
    pub game_over: bool,
    pub status: GameStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameHistory {
    pub urlsafe_key: String,
    pub user_name: String,
    pub game_over: bool,
    pub history: Vec<TranscriptEntry>,
}
