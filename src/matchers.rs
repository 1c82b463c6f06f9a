use regex::Regex;

use crate::errors::Result;

/// The location and text of a sensitive-string match within a text span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub trigger: String,
    pub start: usize,
    pub end: usize,
}

/// A pure detector over a span of text. Callers (comment rules, whole-file
/// rules) decide what text to hand it; matchers never see the file, the
/// context, or the whitelist.
pub trait SensitiveMatcher {
    fn find_matches(&self, text: &str) -> Vec<MatchSpan>;
}

/// Matches whole-word occurrences of a fixed list of words.
pub struct WordMatcher {
    words: Vec<Regex>,
}

impl WordMatcher {
    pub fn new(words: &[String]) -> Result<Self> {
        let words = words
            .iter()
            .map(|w| Regex::new(&format!(r"\b{}\b", regex::escape(w))))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { words })
    }
}

impl SensitiveMatcher for WordMatcher {
    fn find_matches(&self, text: &str) -> Vec<MatchSpan> {
        let mut matches = Vec::new();
        for word in &self.words {
            for m in word.find_iter(text) {
                matches.push(MatchSpan {
                    trigger: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        matches
    }
}

/// Matches each of an independent list of regex patterns.
pub struct RegexMatcher {
    patterns: Vec<Regex>,
}

impl RegexMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl SensitiveMatcher for RegexMatcher {
    fn find_matches(&self, text: &str) -> Vec<MatchSpan> {
        let mut matches = Vec::new();
        for pattern in &self.patterns {
            for m in pattern.find_iter(text) {
                matches.push(MatchSpan {
                    trigger: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_matcher_respects_boundaries() {
        let matcher = WordMatcher::new(&["acme".to_string()]).unwrap();
        let matches = matcher.find_matches("acme and acmeworks and acme-internal");
        let triggers: Vec<_> = matches.iter().map(|m| m.trigger.as_str()).collect();
        assert_eq!(triggers, vec!["acme", "acme"]);
    }

    #[test]
    fn regex_matcher_runs_each_pattern_independently() {
        let matcher = RegexMatcher::new(&[r"acme-\w+".to_string()]).unwrap();
        let matches = matcher.find_matches("contact acme-internal for help");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].trigger, "acme-internal");
    }
}
