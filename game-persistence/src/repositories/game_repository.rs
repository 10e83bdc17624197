use anyhow::{Context, Result};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::games::Transcript;
use crate::entities::{games, prelude::*};
use crate::repositories::score_repository::insert_score;
use crate::repositories::user_repository::record_game_result;
use game_core::{Game, letters_to_string};
use game_types::{GameStatus, Score, User};

/// A game together with the row version it was loaded at
#[derive(Debug, Clone, PartialEq)]
pub struct StoredGame {
    pub game: Game,
    pub version: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { version: i32 },
    /// Another writer updated the row since it was loaded; nothing was written
    VersionConflict,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// The game, its score and the owner's totals were committed together
    Finished { version: i32, owner: User },
    VersionConflict,
}

#[derive(Clone)]
pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_game(model: games::Model) -> Result<StoredGame> {
        let status = GameStatus::parse(&model.status)
            .with_context(|| format!("Unknown status '{}' on game {}", model.status, model.id))?;

        let game = Game::restore(
            model.id,
            model.user_id,
            &model.target,
            model.correct_letters.chars(),
            model.missed_letters.chars(),
            status,
            model.transcript.0,
        )
        .with_context(|| format!("Stored game {} is corrupt", model.id))?;

        Ok(StoredGame {
            game,
            version: model.version,
        })
    }

    pub async fn create_game(&self, game: &Game) -> Result<StoredGame> {
        let now = chrono::Utc::now();

        let game_model = games::ActiveModel {
            id: ActiveValue::Set(game.id),
            user_id: ActiveValue::Set(game.user_id),
            target: ActiveValue::Set(game.target().to_string()),
            correct_letters: ActiveValue::Set(letters_to_string(game.correct_letters())),
            missed_letters: ActiveValue::Set(letters_to_string(game.missed_letters())),
            status: ActiveValue::Set(game.status().as_str().to_string()),
            game_over: ActiveValue::Set(game.is_over()),
            transcript: ActiveValue::Set(Transcript(game.transcript().to_vec())),
            version: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now.into()),
            updated_at: ActiveValue::Set(now.into()),
        };

        Games::insert(game_model).exec(&self.db).await?;

        let created = Games::find_by_id(game.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created game"))?;

        Self::model_to_game(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredGame>> {
        Games::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Self::model_to_game)
            .transpose()
    }

    /// Games owned by `user_id` that are still being played, oldest first
    pub async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<StoredGame>> {
        Games::find()
            .filter(games::Column::UserId.eq(user_id))
            .filter(games::Column::GameOver.eq(false))
            .order_by_asc(games::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_game)
            .collect()
    }

    /// Persist a move that left the game running
    pub async fn save_move(&self, stored: &StoredGame) -> Result<SaveOutcome> {
        update_game(&self.db, stored).await
    }

    /// Persist the final move of a game, its score entry and the owner's
    /// updated totals in a single transaction
    pub async fn finish_game(&self, stored: &StoredGame, score: &Score) -> Result<FinishOutcome> {
        let txn = self.db.begin().await?;

        let version = match update_game(&txn, stored).await? {
            SaveOutcome::Saved { version } => version,
            SaveOutcome::VersionConflict => {
                txn.rollback().await?;
                return Ok(FinishOutcome::VersionConflict);
            }
        };

        insert_score(&txn, score).await?;
        let owner = record_game_result(&txn, stored.game.user_id, score.won).await?;
        txn.commit().await?;

        debug!(game_id = %stored.game.id, "Committed finished game");
        Ok(FinishOutcome::Finished { version, owner })
    }

    /// Delete a game that is still in progress. Returns false when no such
    /// game exists or it has already finished.
    pub async fn delete_active(&self, id: Uuid) -> Result<bool> {
        let result = Games::delete_many()
            .filter(games::Column::Id.eq(id))
            .filter(games::Column::GameOver.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

/// Conditional update keyed on the version the game was loaded at
async fn update_game<C: ConnectionTrait>(conn: &C, stored: &StoredGame) -> Result<SaveOutcome> {
    let game = &stored.game;
    let next_version = stored.version + 1;

    let changes = games::ActiveModel {
        correct_letters: ActiveValue::Set(letters_to_string(game.correct_letters())),
        missed_letters: ActiveValue::Set(letters_to_string(game.missed_letters())),
        status: ActiveValue::Set(game.status().as_str().to_string()),
        game_over: ActiveValue::Set(game.is_over()),
        transcript: ActiveValue::Set(Transcript(game.transcript().to_vec())),
        version: ActiveValue::Set(next_version),
        updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    let result = Games::update_many()
        .set(changes)
        .filter(games::Column::Id.eq(game.id))
        .filter(games::Column::Version.eq(stored.version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        warn!(game_id = %game.id, version = stored.version, "Stale game update rejected");
        return Ok(SaveOutcome::VersionConflict);
    }

    Ok(SaveOutcome::Saved {
        version: next_version,
    })
}
