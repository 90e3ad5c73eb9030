//! Topic keyword lists and the case-insensitive matcher.

use crate::error::ConfigError;
use regex::Regex;

/// How a keyword phrase must occur in text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Plain substring containment: "war" matches inside "warning".
    #[default]
    Substring,
    /// Phrase must not be glued to word characters on either side (regex `\b`
    /// on every edge of the phrase that is itself a word character).
    WordBoundary,
}

/// Ordered list of lowercase phrases. Any single phrase matching is enough;
/// order only affects which phrase `first_match` reports.
#[derive(Clone, Debug)]
pub struct KeywordList {
    phrases: Vec<String>,
    mode: MatchMode,
    // one per phrase in `WordBoundary` mode, empty otherwise
    bounded: Vec<Regex>,
}

impl KeywordList {
    /// Phrases are trimmed and lowercased; blanks are dropped and repeats keep
    /// their first position. Returns `None` if nothing is left, or if a
    /// word-boundary pattern cannot be compiled.
    pub fn new<I, S>(phrases: I, mode: MatchMode) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for p in phrases {
            let p = p.as_ref().trim().to_lowercase();
            if !p.is_empty() && !out.contains(&p) {
                out.push(p);
            }
        }
        if out.is_empty() {
            return None;
        }
        let bounded = match mode {
            MatchMode::Substring => Vec::new(),
            MatchMode::WordBoundary => out.iter().map(|p| bounded_regex(p)).collect::<Option<Vec<_>>>()?,
        };
        Some(Self { phrases: out, mode, bounded })
    }

    pub fn phrases(&self) -> &[String] { &self.phrases }
    pub fn mode(&self) -> MatchMode { self.mode }

    /// Case-insensitive match against arbitrary text. Empty text never matches.
    pub fn matches(&self, text: &str) -> bool {
        self.matches_lower(&text.to_lowercase())
    }

    /// Same as `matches`, for text the caller has already lowercased.
    pub fn matches_lower(&self, lower: &str) -> bool {
        !lower.is_empty() && (0..self.phrases.len()).any(|i| self.occurs(lower, i))
    }

    /// First phrase, in list order, that occurs in `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        if lower.is_empty() {
            return None;
        }
        (0..self.phrases.len()).find(|&i| self.occurs(&lower, i)).map(|i| self.phrases[i].as_str())
    }

    fn occurs(&self, hay: &str, i: usize) -> bool {
        match self.mode {
            MatchMode::Substring => hay.contains(self.phrases[i].as_str()),
            MatchMode::WordBoundary => self.bounded[i].is_match(hay),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `\b` only on edges where the phrase starts or ends with a word character,
/// so phrases like "airstrike (october 19)" still match before punctuation.
fn bounded_regex(phrase: &str) -> Option<Regex> {
    let edge = |c: Option<char>| if c.is_some_and(is_word_char) { r"\b" } else { "" };
    let pattern = format!(
        "{}{}{}",
        edge(phrase.chars().next()),
        regex::escape(phrase),
        edge(phrase.chars().next_back())
    );
    Regex::new(&pattern).ok()
}

/// A named keyword list.
#[derive(Clone, Debug)]
pub struct Topic {
    pub name: String,
    pub keywords: KeywordList,
}

impl Topic {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_mode(name, keywords, MatchMode::Substring)
    }

    pub fn with_mode<I, S>(name: impl Into<String>, keywords: I, mode: MatchMode) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ConfigError::EmptyTopicName);
        }
        let keywords = KeywordList::new(keywords, mode)
            .ok_or_else(|| ConfigError::EmptyKeywordList { topic: name.clone() })?;
        Ok(Self { name, keywords })
    }
}

/// Reject an empty catalogue and repeated topic names.
pub fn validate_topics(topics: &[Topic]) -> Result<(), ConfigError> {
    if topics.is_empty() {
        return Err(ConfigError::NoTopics);
    }
    let mut seen: Vec<&str> = Vec::with_capacity(topics.len());
    for t in topics {
        if seen.contains(&t.name.as_str()) {
            return Err(ConfigError::DuplicateTopic { topic: t.name.clone() });
        }
        seen.push(&t.name);
    }
    Ok(())
}
