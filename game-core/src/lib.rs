pub mod game_state;
pub mod keys;
pub mod scoring;
pub mod user_stats;
pub mod word_source;

pub use game_state::*;
pub use keys::*;
pub use scoring::*;
pub use user_stats::*;
pub use word_source::*;
