use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("A User with the name '{user_name}' already exists!")]
    DuplicateUser { user_name: String },
    #[error("A User with the name '{user_name}' does not exist!")]
    UserNotFound { user_name: String },
    #[error("Game not found!")]
    GameNotFound { game_key: String },
    #[error("The word must contain only letters: '{word}'")]
    InvalidTargetWord { word: String },
    #[error("Malformed key: '{key}'")]
    InvalidKeyEncoding { key: String },
    #[error("Game already over!")]
    GameAlreadyOver,
    #[error("Game was modified by another request, reload and retry")]
    ConcurrentModification { game_key: String },
}
