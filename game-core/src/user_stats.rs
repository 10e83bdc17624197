use game_types::User;

pub struct UserStats;

impl UserStats {
    /// Fold one finished game into the user's totals. Call exactly once per game.
    pub fn apply_game_result(user: &mut User, won: bool) {
        user.games_played += 1;
        if won {
            user.wins += 1;
        }
        user.win_percentage = Self::win_percentage(user.wins, user.games_played);
    }

    pub fn win_percentage(wins: i32, games_played: i32) -> f64 {
        if games_played == 0 {
            return 0.0;
        }
        wins as f64 / games_played as f64
    }
}
