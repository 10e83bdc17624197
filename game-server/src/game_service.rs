use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ServiceError;
use game_core::{
    Game, RecordKind, ScoreLedger, WordSource, decode_key, encode_key, letters_to_string,
};
use game_persistence::Store;
use game_persistence::repositories::{FinishOutcome, SaveOutcome, StoredGame};
use game_types::{
    GameError, GameHistory, GameView, Score, ScoreView, StringMessage, User, UserRanking,
};

pub const NEW_GAME_MESSAGE: &str = "Good luck playing Hangman!";
pub const MAKE_A_MOVE_MESSAGE: &str = "Time to make a move!";
pub const CANCELLED_MESSAGE: &str = "Game canceled!";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Runs each command as load, validate, mutate, persist, respond
pub struct GameService {
    store: Store,
    word_source: Arc<dyn WordSource>,
}

impl GameService {
    pub fn new(store: Store, word_source: Arc<dyn WordSource>) -> Self {
        Self { store, word_source }
    }

    pub async fn create_user(
        &self,
        user_name: &str,
        email: Option<String>,
    ) -> ServiceResult<StringMessage> {
        let duplicate = || GameError::DuplicateUser {
            user_name: user_name.to_string(),
        };

        if self.store.users.find_by_name(user_name).await?.is_some() {
            return Err(duplicate().into());
        }

        let user = User::new(
            Uuid::new_v4(),
            user_name.to_string(),
            email,
            chrono::Utc::now().to_rfc3339(),
        );
        // A concurrent registration can still take the name after the lookup
        if self.store.users.create_user(user).await?.is_none() {
            return Err(duplicate().into());
        }

        info!("Created user {}", user_name);
        Ok(StringMessage::new(format!("User {} created!", user_name)))
    }

    pub async fn new_game(&self, user_name: &str) -> ServiceResult<GameView> {
        let user = self.require_user(user_name).await?;

        let word = self.word_source.random_word()?;
        let game = Game::new(Uuid::new_v4(), user.id, &word).inspect_err(|_| {
            warn!("Word source produced an unusable target word");
        })?;
        let stored = self.store.games.create_game(&game).await?;

        info!(game_id = %stored.game.id, "Started game for {}", user.name);
        Ok(Self::game_view(&stored.game, &user.name, NEW_GAME_MESSAGE))
    }

    pub async fn get_game(&self, game_key: &str) -> ServiceResult<GameView> {
        let stored = self.load_game(game_key).await?;
        let owner = self.load_owner(&stored.game).await?;

        let message = if stored.game.is_over() {
            game_core::ALREADY_OVER_MESSAGE
        } else {
            MAKE_A_MOVE_MESSAGE
        };
        Ok(Self::game_view(&stored.game, &owner.name, message))
    }

    pub async fn make_move(&self, game_key: &str, raw_guess: &str) -> ServiceResult<GameView> {
        let mut stored = self.load_game(game_key).await?;
        let owner = self.load_owner(&stored.game).await?;

        let outcome = stored.game.apply_guess(raw_guess);
        if !outcome.result.is_accepted() {
            debug!(game_id = %stored.game.id, result = ?outcome.result, "Guess not applied");
            return Ok(Self::game_view(&stored.game, &owner.name, &outcome.message));
        }

        let committed = match outcome.result.ended() {
            Some(won) => {
                let score = ScoreLedger::entry_for(&stored.game, chrono::Utc::now().date_naive())
                    .ok_or_else(|| anyhow::anyhow!("Finished game {} has no result", stored.game.id))?;

                match self.store.games.finish_game(&stored, &score).await? {
                    FinishOutcome::Finished { owner, .. } => {
                        info!(
                            game_id = %stored.game.id,
                            won,
                            guesses = score.total_guesses,
                            missed = score.missed_count,
                            games_played = owner.games_played,
                            "Game finished for {}",
                            owner.name
                        );
                        true
                    }
                    FinishOutcome::VersionConflict => false,
                }
            }
            None => self.store.games.save_move(&stored).await? != SaveOutcome::VersionConflict,
        };

        if !committed {
            return Err(GameError::ConcurrentModification {
                game_key: game_key.to_string(),
            }
            .into());
        }

        Ok(Self::game_view(&stored.game, &owner.name, &outcome.message))
    }

    /// Remove a game that is still in progress
    pub async fn cancel_game(&self, game_key: &str) -> ServiceResult<StringMessage> {
        let mut stored = self.load_game(game_key).await?;
        stored.game.cancel()?;

        if !self.store.games.delete_active(stored.game.id).await? {
            // Finished or removed by another request since it was loaded
            return match self.store.games.find_by_id(stored.game.id).await? {
                Some(_) => Err(GameError::GameAlreadyOver.into()),
                None => Err(Self::game_not_found(game_key)),
            };
        }

        info!(game_id = %stored.game.id, "Game cancelled");
        Ok(StringMessage::new(CANCELLED_MESSAGE))
    }

    pub async fn get_game_history(&self, game_key: &str) -> ServiceResult<GameHistory> {
        let stored = self.load_game(game_key).await?;
        let owner = self.load_owner(&stored.game).await?;

        Ok(GameHistory {
            urlsafe_key: encode_key(RecordKind::Game, stored.game.id),
            user_name: owner.name,
            game_over: stored.game.is_over(),
            history: stored.game.transcript().to_vec(),
        })
    }

    pub async fn list_scores(&self) -> ServiceResult<Vec<ScoreView>> {
        let scores = self.store.scores.list_all().await?;
        Ok(Self::score_views(scores))
    }

    pub async fn list_user_scores(&self, user_name: &str) -> ServiceResult<Vec<ScoreView>> {
        let user = self.require_user(user_name).await?;
        let scores = self.store.scores.list_for_user(user.id).await?;

        Ok(scores
            .iter()
            .map(|score| ScoreView::new(score, user.name.as_str()))
            .collect())
    }

    /// Games the user has not finished yet
    pub async fn list_user_games(&self, user_name: &str) -> ServiceResult<Vec<GameView>> {
        let user = self.require_user(user_name).await?;
        let games = self.store.games.list_active_for_user(user.id).await?;

        Ok(games
            .iter()
            .map(|stored| Self::game_view(&stored.game, &user.name, MAKE_A_MOVE_MESSAGE))
            .collect())
    }

    pub async fn get_high_scores(&self, limit: Option<u64>) -> ServiceResult<Vec<ScoreView>> {
        let scores = self.store.scores.get_high_scores(limit).await?;
        Ok(Self::score_views(scores))
    }

    pub async fn get_user_rankings(&self) -> ServiceResult<Vec<UserRanking>> {
        let users = self.store.users.get_rankings().await?;
        Ok(users.iter().map(UserRanking::from).collect())
    }

    async fn require_user(&self, user_name: &str) -> ServiceResult<User> {
        self.store
            .users
            .find_by_name(user_name)
            .await?
            .ok_or_else(|| {
                GameError::UserNotFound {
                    user_name: user_name.to_string(),
                }
                .into()
            })
    }

    async fn load_game(&self, game_key: &str) -> ServiceResult<StoredGame> {
        let game_id = decode_key(RecordKind::Game, game_key)?;
        self.store
            .games
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| Self::game_not_found(game_key))
    }

    async fn load_owner(&self, game: &Game) -> ServiceResult<User> {
        let owner = self
            .store
            .users
            .find_by_id(game.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Owner {} of game {} is missing", game.user_id, game.id))?;
        Ok(owner)
    }

    fn game_not_found(game_key: &str) -> ServiceError {
        GameError::GameNotFound {
            game_key: game_key.to_string(),
        }
        .into()
    }

    fn score_views(scores: Vec<(Score, String)>) -> Vec<ScoreView> {
        scores
            .iter()
            .map(|(score, user_name)| ScoreView::new(score, user_name.as_str()))
            .collect()
    }

    fn game_view(game: &Game, user_name: &str, message: &str) -> GameView {
        GameView {
            urlsafe_key: encode_key(RecordKind::Game, game.id),
            user_name: user_name.to_string(),
            missed_letters: letters_to_string(game.missed_letters()),
            correct_letters: letters_to_string(game.correct_letters()),
            used_letters: game.guess_sequence(),
            reveal: game.reveal(),
            guesses_remaining: game.guesses_remaining() as i32,
            game_over: game.is_over(),
            status: game.status(),
            message: message.to_string(),
        }
    }
}
