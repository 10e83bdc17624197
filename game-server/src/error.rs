use game_types::GameError;
use warp::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Persistence failure: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn game_error(&self) -> Option<&GameError> {
        match self {
            ServiceError::Game(err) => Some(err),
            ServiceError::Persistence(_) => None,
        }
    }

    /// Transport status for this error. `GameAlreadyOver` is informational.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Game(err) => match err {
                GameError::DuplicateUser { .. } => StatusCode::CONFLICT,
                GameError::UserNotFound { .. } | GameError::GameNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                GameError::InvalidTargetWord { .. } | GameError::InvalidKeyEncoding { .. } => {
                    StatusCode::BAD_REQUEST
                }
                GameError::GameAlreadyOver => StatusCode::OK,
                GameError::ConcurrentModification { .. } => StatusCode::CONFLICT,
            },
            ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = ServiceError::from(GameError::GameNotFound {
            game_key: "abc".to_string(),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Game not found!");

        let duplicate = ServiceError::from(GameError::DuplicateUser {
            user_name: "alice".to_string(),
        });
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let bad_key = ServiceError::from(GameError::InvalidKeyEncoding {
            key: "??".to_string(),
        });
        assert_eq!(bad_key.status_code(), StatusCode::BAD_REQUEST);

        let over = ServiceError::from(GameError::GameAlreadyOver);
        assert_eq!(over.status_code(), StatusCode::OK);

        let db = ServiceError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(db.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(db.game_error().is_none());
    }
}
