use chrono::NaiveDate;
use game_types::{Score, UserId};
use uuid::Uuid;

use crate::Game;

/// Builds the one immutable score entry a finished game produces
pub struct ScoreLedger;

impl ScoreLedger {
    pub fn record_outcome(
        user_id: UserId,
        date: NaiveDate,
        won: bool,
        total_guesses: usize,
        missed_count: usize,
    ) -> Score {
        Score {
            id: Uuid::new_v4(),
            user_id,
            date: date.format("%Y-%m-%d").to_string(),
            won,
            total_guesses: total_guesses as i32,
            missed_count: missed_count as i32,
        }
    }

    /// Score entry for `game`, or `None` while it is still running or was cancelled
    pub fn entry_for(game: &Game, date: NaiveDate) -> Option<Score> {
        game.result().map(|result| {
            Self::record_outcome(
                game.user_id,
                date,
                result.won,
                result.total_guesses,
                result.missed_count,
            )
        })
    }
}
