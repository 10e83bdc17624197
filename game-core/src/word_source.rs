use anyhow::{Context, Result, anyhow};
use rand::seq::IndexedRandom;
use std::path::Path;
use tracing::warn;

const BUILTIN_WORDS: &str = "\
# Fallback list used when no word file is configured
abruptly
avenue
awkward
bagpipes
banjo
bookworm
buffalo
cobweb
crypt
dwarves
fishhook
galaxy
glowworm
haiku
igloo
jackpot
jigsaw
kayak
keyhole
kiosk
lucky
matrix
nightclub
oxygen
pajama
puzzling
quartz
rhythm
rust
sphinx
squawk
strength
subway
swivel
thumbscrew
twelfth
unknown
vortex
walkway
wizard
wristwatch
xylophone
yachtsman
zigzag
zombie";

/// Supplies target words for new games
pub trait WordSource: Send + Sync {
    fn random_word(&self) -> Result<String>;
}

pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Create a word list from newline separated text. Blank lines and `#`
    /// comments are skipped, words that are not purely alphabetic are dropped.
    pub fn from_word_list(word_list: &str) -> Self {
        let mut words = Vec::new();

        for line in word_list.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            if !word.chars().all(|c| c.is_ascii_alphabetic()) {
                warn!("Skipping word with non-alphabetic characters: {}", word);
                continue;
            }
            words.push(word.to_lowercase());
        }

        Self { words }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;

        let list = Self::from_word_list(&contents);
        if list.is_empty() {
            return Err(anyhow!("Word list {} has no usable words", path.display()));
        }
        Ok(list)
    }

    pub fn builtin() -> Self {
        Self::from_word_list(BUILTIN_WORDS)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordSource for WordList {
    fn random_word(&self) -> Result<String> {
        self.words
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| anyhow!("No words available"))
    }
}
