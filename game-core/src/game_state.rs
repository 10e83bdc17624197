use game_types::{GameError, GameId, GameStatus, MAX_MISSED_LETTERS, TranscriptEntry, UserId};
use std::collections::HashSet;
use tracing::debug;

pub const ALREADY_OVER_MESSAGE: &str = "Game already over!";
pub const ALREADY_GUESSED_MESSAGE: &str = "You have already guessed that letter. Choose another one!";
pub const SINGLE_LETTER_MESSAGE: &str = "Please enter a single letter!";
pub const NOT_A_LETTER_MESSAGE: &str = "Please enter a LETTER!";

/// How a single call to [`Game::apply_guess`] was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    AlreadyOver,
    AlreadyGuessed,
    NotSingleLetter,
    NotALetter,
    Correct,
    Missed,
    Won,
    Lost,
}

impl GuessResult {
    /// True when the guess mutated the game and was written to the transcript
    pub fn is_accepted(self) -> bool {
        matches!(
            self,
            GuessResult::Correct | GuessResult::Missed | GuessResult::Won | GuessResult::Lost
        )
    }

    /// `Some(won)` when this guess moved the game into a terminal state
    pub fn ended(self) -> Option<bool> {
        match self {
            GuessResult::Won => Some(true),
            GuessResult::Lost => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub result: GuessResult,
    pub message: String,
}

impl MoveOutcome {
    fn new(result: GuessResult, message: impl Into<String>) -> Self {
        Self {
            result,
            message: message.into(),
        }
    }
}

/// Totals a finished game hands to the score ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub won: bool,
    pub total_guesses: usize,
    pub missed_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub user_id: UserId,
    target: String, // Hidden from clients until the game ends
    correct_letters: HashSet<char>,
    missed_letters: HashSet<char>,
    used_letters: HashSet<char>,
    status: GameStatus,
    transcript: Vec<TranscriptEntry>,
}

impl Game {
    pub fn new(id: GameId, user_id: UserId, target: &str) -> Result<Self, GameError> {
        let target = normalize_target(target)?;

        Ok(Self {
            id,
            user_id,
            target,
            correct_letters: HashSet::new(),
            missed_letters: HashSet::new(),
            used_letters: HashSet::new(),
            status: GameStatus::InProgress,
            transcript: Vec::new(),
        })
    }

    /// Rebuild a game from stored fields
    pub fn restore(
        id: GameId,
        user_id: UserId,
        target: &str,
        correct_letters: impl IntoIterator<Item = char>,
        missed_letters: impl IntoIterator<Item = char>,
        status: GameStatus,
        transcript: Vec<TranscriptEntry>,
    ) -> Result<Self, GameError> {
        let mut game = Self::new(id, user_id, target)?;
        game.correct_letters = correct_letters.into_iter().collect();
        game.missed_letters = missed_letters.into_iter().collect();
        game.used_letters = game
            .correct_letters
            .union(&game.missed_letters)
            .copied()
            .collect();
        game.status = status;
        game.transcript = transcript;
        Ok(game)
    }

    /// Apply one raw guess. Terminal games and rejected input leave the
    /// game untouched.
    pub fn apply_guess(&mut self, raw_input: &str) -> MoveOutcome {
        if self.status.is_terminal() {
            return MoveOutcome::new(GuessResult::AlreadyOver, ALREADY_OVER_MESSAGE);
        }

        let guess = raw_input.to_lowercase();

        // Runs before the length check, so repeated multi-letter input lands here too
        if self.is_already_guessed(&guess) {
            return MoveOutcome::new(GuessResult::AlreadyGuessed, ALREADY_GUESSED_MESSAGE);
        }

        let mut chars = guess.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(letter), None) => letter,
            _ => return MoveOutcome::new(GuessResult::NotSingleLetter, SINGLE_LETTER_MESSAGE),
        };

        if !letter.is_ascii_lowercase() {
            return MoveOutcome::new(GuessResult::NotALetter, NOT_A_LETTER_MESSAGE);
        }

        let hit = self.target.contains(letter);
        if hit {
            self.correct_letters.insert(letter);
        } else {
            self.missed_letters.insert(letter);
        }
        self.used_letters.insert(letter);

        let mut letters_used = self.guess_sequence();
        letters_used.push(letter);
        let message = format!(
            "{} guess! Target: {}. Letters used: {}.",
            if hit { "Right" } else { "Wrong" },
            self.reveal(),
            letters_used
        );
        self.transcript.push(TranscriptEntry {
            guess: letter.to_string(),
            result: message.clone(),
        });

        if hit && self.is_won() {
            self.status = GameStatus::Won;
            debug!(game_id = %self.id, "game won");
            return MoveOutcome::new(
                GuessResult::Won,
                format!("You win! Target word is: {}.", self.target),
            );
        }

        if !hit && self.missed_letters.len() >= MAX_MISSED_LETTERS {
            self.status = GameStatus::Lost;
            debug!(game_id = %self.id, "game lost");
            return MoveOutcome::new(
                GuessResult::Lost,
                format!("Game over! Target word is: {}.", self.target),
            );
        }

        MoveOutcome::new(if hit { GuessResult::Correct } else { GuessResult::Missed }, message)
    }

    /// Mark an unfinished game as cancelled
    pub fn cancel(&mut self) -> Result<(), GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameAlreadyOver);
        }
        self.status = GameStatus::Cancelled;
        Ok(())
    }

    pub fn reveal(&self) -> String {
        reveal(&self.target, &self.correct_letters)
    }

    pub fn is_won(&self) -> bool {
        self.target.chars().all(|c| self.correct_letters.contains(&c))
    }

    /// Score totals, available once the game was won or lost
    pub fn result(&self) -> Option<GameResult> {
        let won = match self.status {
            GameStatus::Won => true,
            GameStatus::Lost => false,
            GameStatus::InProgress | GameStatus::Cancelled => return None,
        };

        Some(GameResult {
            won,
            total_guesses: self.used_letters.len(),
            missed_count: self.missed_letters.len(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn correct_letters(&self) -> &HashSet<char> {
        &self.correct_letters
    }

    pub fn missed_letters(&self) -> &HashSet<char> {
        &self.missed_letters
    }

    pub fn used_letters(&self) -> &HashSet<char> {
        &self.used_letters
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn guesses_remaining(&self) -> usize {
        MAX_MISSED_LETTERS.saturating_sub(self.missed_letters.len())
    }

    /// Accepted guesses joined in the order they were made
    pub fn guess_sequence(&self) -> String {
        self.transcript
            .iter()
            .map(|entry| entry.guess.as_str())
            .collect()
    }

    fn is_already_guessed(&self, guess: &str) -> bool {
        let mut chars = guess.chars();
        match (chars.next(), chars.next()) {
            // Empty input never counts as a repeat, even once letters were played
            (None, _) => false,
            (Some(letter), None) => self.used_letters.contains(&letter),
            (Some(_), Some(_)) => self.guess_sequence().contains(guess),
        }
    }
}

/// Partially masked rendering of `target`, one slot per character,
/// separated by single spaces
pub fn reveal(target: &str, correct_letters: &HashSet<char>) -> String {
    target
        .chars()
        .map(|c| if correct_letters.contains(&c) { c } else { '_' })
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase `word` and ensure it is made of `a`-`z` only
pub fn normalize_target(word: &str) -> Result<String, GameError> {
    let target = word.trim().to_lowercase();
    if target.is_empty() || !target.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(GameError::InvalidTargetWord {
            word: word.to_string(),
        });
    }
    Ok(target)
}

/// Letters of a set as a sorted string, for display and storage
pub fn letters_to_string(letters: &HashSet<char>) -> String {
    let mut sorted: Vec<char> = letters.iter().copied().collect();
    sorted.sort_unstable();
    sorted.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn game_with_target(target: &str) -> Game {
        Game::new(Uuid::new_v4(), Uuid::new_v4(), target).unwrap()
    }

    #[test]
    fn test_cat_game_is_won_after_three_letters() {
        let mut game = game_with_target("cat");

        let outcome = game.apply_guess("c");
        assert_eq!(outcome.result, GuessResult::Correct);
        assert_eq!(game.reveal(), "c _ _");
        assert_eq!(outcome.message, "Right guess! Target: c _ _. Letters used: c.");

        let outcome = game.apply_guess("z");
        assert_eq!(outcome.result, GuessResult::Missed);
        assert_eq!(game.reveal(), "c _ _");
        assert_eq!(outcome.message, "Wrong guess! Target: c _ _. Letters used: cz.");
        assert!(game.missed_letters().contains(&'z'));

        game.apply_guess("a");
        assert_eq!(game.reveal(), "c a _");

        let outcome = game.apply_guess("t");
        assert_eq!(outcome.result, GuessResult::Won);
        assert_eq!(outcome.message, "You win! Target word is: cat.");
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.transcript().len(), 4);
        assert_eq!(
            game.result(),
            Some(GameResult {
                won: true,
                total_guesses: 4,
                missed_count: 1,
            })
        );
    }

    #[test]
    fn test_sixth_miss_loses_the_game() {
        let mut game = game_with_target("a");

        for letter in ["b", "c", "d", "e", "f"] {
            let outcome = game.apply_guess(letter);
            assert_eq!(outcome.result, GuessResult::Missed);
            assert_eq!(game.status(), GameStatus::InProgress);
        }
        assert_eq!(game.guesses_remaining(), 1);

        let outcome = game.apply_guess("g");
        assert_eq!(outcome.result, GuessResult::Lost);
        assert_eq!(outcome.message, "Game over! Target word is: a.");
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.missed_letters().len(), 6);
        assert_eq!(
            game.result(),
            Some(GameResult {
                won: false,
                total_guesses: 6,
                missed_count: 6,
            })
        );
    }

    #[test]
    fn test_repeated_letters_covered_by_one_guess() {
        let mut game = game_with_target("igloo");

        for letter in ["i", "g", "l"] {
            game.apply_guess(letter);
        }
        assert_eq!(game.reveal(), "i g l _ _");
        assert!(!game.is_won());

        let outcome = game.apply_guess("o");
        assert_eq!(outcome.result, GuessResult::Won);
        assert_eq!(game.reveal(), "i g l o o");
    }

    #[test]
    fn test_repeat_guess_does_not_mutate() {
        let mut game = game_with_target("hangman");
        game.apply_guess("a");
        game.apply_guess("x");
        let before = game.clone();

        for repeat in ["a", "A", "x", "X"] {
            let outcome = game.apply_guess(repeat);
            assert_eq!(outcome.result, GuessResult::AlreadyGuessed);
            assert_eq!(outcome.message, ALREADY_GUESSED_MESSAGE);
        }
        assert_eq!(game, before);
    }

    #[test]
    fn test_input_validation_order() {
        let mut game = game_with_target("word");

        let outcome = game.apply_guess("ab");
        assert_eq!(outcome.result, GuessResult::NotSingleLetter);

        let outcome = game.apply_guess("");
        assert_eq!(outcome.result, GuessResult::NotSingleLetter);

        let outcome = game.apply_guess("7");
        assert_eq!(outcome.result, GuessResult::NotALetter);
        assert_eq!(outcome.message, NOT_A_LETTER_MESSAGE);

        let outcome = game.apply_guess("é");
        assert_eq!(outcome.result, GuessResult::NotALetter);

        assert!(game.transcript().is_empty());
        assert!(game.used_letters().is_empty());
    }

    #[test]
    fn test_empty_input_after_guesses_asks_for_a_letter() {
        let mut game = game_with_target("word");
        game.apply_guess("w");
        game.apply_guess("x");

        let outcome = game.apply_guess("");
        assert_eq!(outcome.result, GuessResult::NotSingleLetter);
        assert_eq!(outcome.message, SINGLE_LETTER_MESSAGE);
        assert_eq!(game.transcript().len(), 2);
    }

    #[test]
    fn test_multi_letter_repeat_short_circuits_as_already_guessed() {
        let mut game = game_with_target("word");
        game.apply_guess("w");
        game.apply_guess("o");

        // "wo" repeats two consecutive earlier guesses
        let outcome = game.apply_guess("WO");
        assert_eq!(outcome.result, GuessResult::AlreadyGuessed);

        // Same letters, different order: falls through to the length check
        let outcome = game.apply_guess("ow");
        assert_eq!(outcome.result, GuessResult::NotSingleLetter);
    }

    #[test]
    fn test_uppercase_guess_is_normalized() {
        let mut game = game_with_target("rust");
        let outcome = game.apply_guess("R");
        assert_eq!(outcome.result, GuessResult::Correct);
        assert_eq!(game.transcript()[0].guess, "r");
    }

    #[test]
    fn test_terminal_game_is_idempotent() {
        let mut game = game_with_target("a");
        game.apply_guess("a");
        assert_eq!(game.status(), GameStatus::Won);
        let finished = game.clone();

        for _ in 0..3 {
            let outcome = game.apply_guess("b");
            assert_eq!(outcome.result, GuessResult::AlreadyOver);
            assert_eq!(outcome.message, ALREADY_OVER_MESSAGE);
        }
        assert_eq!(game, finished);
    }

    #[test]
    fn test_reveal_length_and_completion() {
        let target = "mississippi";
        let mut game = game_with_target(target);
        assert_eq!(game.reveal().len(), 2 * target.len() - 1);

        for letter in ["m", "i", "s", "p"] {
            game.apply_guess(letter);
            assert_eq!(game.reveal().len(), 2 * target.len() - 1);
        }
        assert!(!game.reveal().contains('_'));
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn test_invalid_target_rejected() {
        assert!(matches!(
            Game::new(Uuid::new_v4(), Uuid::new_v4(), "hello-world"),
            Err(GameError::InvalidTargetWord { .. })
        ));
        assert!(Game::new(Uuid::new_v4(), Uuid::new_v4(), "").is_err());
        assert!(Game::new(Uuid::new_v4(), Uuid::new_v4(), "abc1").is_err());

        let game = Game::new(Uuid::new_v4(), Uuid::new_v4(), "Rust").unwrap();
        assert_eq!(game.target(), "rust");
    }

    #[test]
    fn test_cancel_only_running_games() {
        let mut game = game_with_target("abc");
        assert!(game.cancel().is_ok());
        assert_eq!(game.status(), GameStatus::Cancelled);
        assert_eq!(game.cancel(), Err(GameError::GameAlreadyOver));
        assert_eq!(game.apply_guess("a").result, GuessResult::AlreadyOver);
        assert_eq!(game.result(), None);
    }

    #[test]
    fn test_restore_rebuilds_used_letters() {
        let mut original = game_with_target("ferris");
        for letter in ["f", "q", "r"] {
            original.apply_guess(letter);
        }

        let restored = Game::restore(
            original.id,
            original.user_id,
            original.target(),
            original.correct_letters().iter().copied(),
            original.missed_letters().iter().copied(),
            original.status(),
            original.transcript().to_vec(),
        )
        .unwrap();

        assert_eq!(restored, original);
        assert_eq!(restored.guess_sequence(), "fqr");
        assert_eq!(letters_to_string(restored.used_letters()), "fqr");
    }
}
