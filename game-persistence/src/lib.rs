pub mod connection;
pub mod entities;
pub mod repositories;

use sea_orm::DatabaseConnection;

use repositories::{GameRepository, ScoreRepository, UserRepository};

/// The three repositories sharing one connection pool
#[derive(Clone)]
pub struct Store {
    pub users: UserRepository,
    pub games: GameRepository,
    pub scores: ScoreRepository,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            games: GameRepository::new(db.clone()),
            scores: ScoreRepository::new(db),
        }
    }
}
