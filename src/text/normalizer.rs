use super::stopwords::StopwordSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

// Token separators: Unicode whitespace plus U+001C..U+001F.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"http[^\s\x1c-\x1f]+|www[^\s\x1c-\x1f]+|https[^\s\x1c-\x1f]+")
        .expect("URL pattern is valid")
});

static NON_ALPHA_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z\s\x1c-\x1f]").expect("letter pattern is valid"));

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Cleans raw review text into the token string the vectorizer was fit on.
///
/// Steps, each applied to the previous output:
/// 1. drop URL-like tokens (`http...`, `https...`, `www...`)
/// 2. drop every character that is neither an ASCII letter nor a separator
/// 3. lowercase and trim
/// 4. drop stopwords and rejoin the remaining tokens with single spaces
///
/// The result only ever holds lowercase ASCII letters separated by single
/// spaces, and normalizing it again returns it unchanged.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: Arc<StopwordSet>,
}

impl TextNormalizer {
    pub fn new(stopwords: Arc<StopwordSet>) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn normalize(&self, raw: &str) -> String {
        let text = URL_PATTERN.replace_all(raw, "");
        let text = NON_ALPHA_PATTERN.replace_all(&text, "");
        let text = text.to_lowercase();

        text.split(is_separator)
            .filter(|token| !token.is_empty() && !self.stopwords.contains(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(StopwordSet::english())
    }
}
