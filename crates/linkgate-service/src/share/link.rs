//! Share link token generation.

use rand::distr::{Alphanumeric, SampleString};

/// Length of generated public link tokens.
pub const TOKEN_LENGTH: usize = 15;

/// Generates random, URL-safe share link tokens.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    length: usize,
}

impl TokenGenerator {
    /// Creates a generator producing [`TOKEN_LENGTH`] characters.
    pub fn new() -> Self {
        Self {
            length: TOKEN_LENGTH,
        }
    }

    /// Generates a token of ASCII letters and digits from the thread RNG.
    pub fn generate(&self) -> String {
        Alphanumeric.sample_string(&mut rand::rng(), self.length)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
