pub mod errors;
pub mod game;
pub mod messages;
pub mod score;
pub mod user;

use uuid::Uuid;

pub type UserId = Uuid;
pub type GameId = Uuid;
pub type ScoreId = Uuid;

/// Wrong guesses allowed before a game is lost
pub const MAX_MISSED_LETTERS: usize = 6;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use messages::*;
pub use score::*;
pub use user::*;
