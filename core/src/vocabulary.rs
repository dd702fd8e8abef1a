use crate::Result;
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Reserved words of the Java language, the default vocabulary.
const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "default", "do", "double", "else", "enum",
    "extends", "final", "finally", "float", "for", "goto", "if", "implements",
    "import", "instanceof", "int", "interface", "long", "native", "new",
    "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while",
];

/// The fixed, ordered set of keywords recognized by the counter.
///
/// Immutable after construction. The fingerprint identifies the exact word
/// list, so indices stored under a different vocabulary can be detected.
#[derive(Clone)]
pub struct Vocabulary {
    words: Vec<String>,
    lookup: HashSet<String>,
    fingerprint: String,
}

impl Vocabulary {
    /// Build a vocabulary from a word list, dropping empty strings and
    /// duplicates while preserving first-seen order.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        let mut lookup: HashSet<String> = HashSet::new();
        for word in words {
            let word = word.into();
            if word.is_empty() || lookup.contains(&word) {
                continue;
            }
            lookup.insert(word.clone());
            ordered.push(word);
        }
        let mut hasher = Sha1::new();
        for word in &ordered {
            hasher.update(word.as_bytes());
            hasher.update(b"\n");
        }
        let fingerprint = format!("{:x}", hasher.finalize());
        Self { words: ordered, lookup, fingerprint }
    }

    /// Load a vocabulary from a file with one keyword per line. Blank lines
    /// and `#` comments are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let words: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        Ok(Self::new(words))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.lookup.contains(token)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Hex digest of the word list; persisted with every index record.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(JAVA_KEYWORDS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_preserving_order() {
        let vocab = Vocabulary::new(["while", "if", "while", "", "return"]);
        assert_eq!(vocab.words(), ["while", "if", "return"]);
        assert!(vocab.contains("if"));
        assert!(!vocab.contains("If"));
    }

    #[test]
    fn fingerprint_tracks_word_list() {
        let a = Vocabulary::new(["if", "while"]);
        let b = Vocabulary::new(["if", "while"]);
        let c = Vocabulary::new(["while", "if"]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
