#![allow(dead_code)]

use game_core::{Game, GuessResult, MoveOutcome, WordList};
use game_types::GameStatus;
use uuid::Uuid;

/// Creates a test WordList with a known set of words
pub fn create_test_word_list() -> WordList {
    let word_list = "apple\nbanana\ncherry\nigloo\nhello\nworld\nhouse\nmouse\ncat";
    WordList::from_word_list(word_list)
}

/// Creates a game with a specific target word
pub fn create_game_with_word(word: &str) -> Game {
    Game::new(Uuid::new_v4(), Uuid::new_v4(), word).expect("valid test target")
}

/// Plays every guess in order and returns the outcomes
pub fn play(game: &mut Game, guesses: &[&str]) -> Vec<MoveOutcome> {
    guesses.iter().map(|guess| game.apply_guess(guess)).collect()
}

/// Plays the letters of `word` until the game ends
pub fn play_to_win(game: &mut Game) -> MoveOutcome {
    let target = game.target().to_string();
    let mut last = None;
    for letter in target.chars() {
        let outcome = game.apply_guess(&letter.to_string());
        if outcome.result != GuessResult::AlreadyGuessed {
            last = Some(outcome);
        }
        if game.is_over() {
            break;
        }
    }
    last.expect("target has at least one letter")
}

/// Asserts that a game is in a specific state
pub fn assert_game_state(game: &Game, expected_status: GameStatus, expected_misses: usize) {
    assert_eq!(
        game.status(),
        expected_status,
        "Expected status {:?}, got {:?}",
        expected_status,
        game.status()
    );
    assert_eq!(
        game.missed_letters().len(),
        expected_misses,
        "Expected {} missed letters, got {}",
        expected_misses,
        game.missed_letters().len()
    );
}
