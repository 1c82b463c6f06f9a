use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::Result;

/// The three-way classification the username filter assigns to an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCategory {
    Publishable,
    Scrubbable,
    Unknown,
}

/// Classifies identifiers found in author lines and TODOs as publishable,
/// scrubbable, or unknown, per `usernames_to_publish` / `usernames_to_scrub`
/// / `usernames_file` and the `scrub_unknown_users` policy knob.
#[derive(Debug, Clone, Default)]
pub struct UsernameFilter {
    publishable: HashSet<String>,
    scrubbable: HashSet<String>,
    scrub_unknown: bool,
}

impl UsernameFilter {
    pub fn new(publishable: Vec<String>, scrubbable: Vec<String>, scrub_unknown: bool) -> Self {
        Self {
            publishable: publishable.into_iter().collect(),
            scrubbable: scrubbable.into_iter().collect(),
            scrub_unknown,
        }
    }

    /// Loads the contents of `usernames_file`, one username per line, and
    /// merges it into the scrubbable set. Blank lines are ignored.
    pub fn with_usernames_file(mut self, path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        for line in contents.lines() {
            let name = line.trim();
            if !name.is_empty() {
                self.scrubbable.insert(name.to_string());
            }
        }
        Ok(self)
    }

    /// The raw three-way category, used for report grouping (an unknown user
    /// is still reported as "unknown" even when `scrub_unknown` makes it
    /// behave as scrubbable for decision purposes).
    pub fn category(&self, username: &str) -> UserCategory {
        if self.publishable.contains(username) {
            UserCategory::Publishable
        } else if self.scrubbable.contains(username) {
            UserCategory::Scrubbable
        } else {
            UserCategory::Unknown
        }
    }

    /// Whether an identifier should be treated as scrubbable for the purpose
    /// of removing author lines, etc. Unknown users are scrubbed when
    /// `scrub_unknown` is set.
    pub fn should_scrub(&self, username: &str) -> bool {
        match self.category(username) {
            UserCategory::Scrubbable => true,
            UserCategory::Publishable => false,
            UserCategory::Unknown => self.scrub_unknown,
        }
    }

    /// Whether an identifier is unknown, used by the TODO rule to decide
    /// whether to emit a finding.
    pub fn is_unknown(&self, username: &str) -> bool {
        self.category(username) == UserCategory::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn publishable_user_is_not_scrubbed() {
        let filter = UsernameFilter::new(vec!["alice".to_string()], vec![], false);
        assert!(!filter.should_scrub("alice"));
        assert_eq!(filter.category("alice"), UserCategory::Publishable);
    }

    #[test]
    fn unknown_user_is_scrubbed_only_when_policy_set() {
        let strict = UsernameFilter::new(vec![], vec![], false);
        assert!(!strict.should_scrub("mallory"));
        assert!(strict.is_unknown("mallory"));

        let lenient = UsernameFilter::new(vec![], vec![], true);
        assert!(lenient.should_scrub("mallory"));
        assert!(lenient.is_unknown("mallory"));
    }

    #[test]
    fn usernames_file_supplements_scrubbable_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usernames.txt");
        fs::write(&path, "bob\ncarol\n\n").unwrap();

        let filter = UsernameFilter::new(vec![], vec![], false)
            .with_usernames_file(&path)
            .unwrap();
        assert!(filter.should_scrub("bob"));
        assert!(filter.should_scrub("carol"));
    }
}
