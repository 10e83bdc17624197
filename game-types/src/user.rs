use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub wins: i32,
    pub games_played: i32,
    pub win_percentage: f64,
    pub created_at: String, // ISO 8601 string for simplicity
}

impl User {
    pub fn new(id: UserId, name: String, email: Option<String>, created_at: String) -> Self {
        Self {
            id,
            name,
            email,
            wins: 0,
            games_played: 0,
            win_percentage: 0.0,
            created_at,
        }
    }
}

/// One row of the user ranking table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserRanking {
    pub user_name: String,
    pub win_percentage: f64,
    pub games_played: i32,
}

impl From<&User> for UserRanking {
    fn from(user: &User) -> Self {
        UserRanking {
            user_name: user.name.clone(),
            win_percentage: user.win_percentage,
            games_played: user.games_played,
        }
    }
}
