//! Coarse intent detection for incoming chat messages.
//!
//! Any message containing a word is treated as an inventory query keyed by
//! its first word; only messages made of symbols and whitespace go to the
//! language model. Greetings therefore hit the inventory path too.

use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Look up `token` in the inventory.
    Inventory { token: String },
    /// Forward the conversation to the language model.
    Conversation,
}

/// First Unicode word of `message`, if any.
pub fn first_word(message: &str) -> Option<&str> {
    WORD.find(message).map(|m| m.as_str())
}

pub fn classify(message: &str) -> Intent {
    match first_word(message) {
        Some(token) => Intent::Inventory {
            token: token.to_owned(),
        },
        None => Intent::Conversation,
    }
}

/// Recognizes tokens shaped like stock codes: a fixed prefix plus digits,
/// e.g. `FISH001`, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct StockCodePattern {
    re: Regex,
}

impl StockCodePattern {
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let re = Regex::new(&format!(r"(?i)^{}\d+$", regex::escape(prefix)))?;
        Ok(Self { re })
    }

    pub fn is_match(&self, token: &str) -> bool {
        self.re.is_match(token)
    }
}
