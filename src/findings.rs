use std::collections::HashMap;

/// A single recorded detection produced by a rule.
///
/// `filter` names the rule that produced the finding (free-form, e.g.
/// `"TODO"`, `"sensitive_string"`); `trigger` is the matched text; `filename`
/// is the codebase-relative path; `report_text` is the human-readable line
/// printed in the final report. TODO findings additionally carry the
/// offending `username`.
#[derive(Debug, Clone)]
pub struct Finding {
    pub filter: String,
    pub trigger: String,
    pub filename: String,
    pub report_text: String,
    pub username: Option<String>,
}

impl Finding {
    pub fn new(
        filter: impl Into<String>,
        trigger: impl Into<String>,
        filename: impl Into<String>,
        report_text: impl Into<String>,
    ) -> Self {
        Self {
            filter: filter.into(),
            trigger: trigger.into(),
            filename: filename.into(),
            report_text: report_text.into(),
            username: None,
        }
    }

    /// Builds a degenerate finding from a bare message, matching spec's
    /// "a finding string (non-structured) is allowed as a degenerate form".
    pub fn from_message(filename: impl Into<String>, message: impl Into<String>) -> Self {
        let report_text = message.into();
        Self {
            filter: String::new(),
            trigger: String::new(),
            filename: filename.into(),
            report_text,
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Renders the `ERROR[entry:...]` line used for non-TODO findings.
    pub fn entry_line(&self) -> String {
        format!(
            "ERROR[entry:\"{}\" trigger:\"{}\" filename:\"{}\"]: {}",
            self.filter, self.trigger, self.filename, self.report_text
        )
    }
}

/// One whitelist entry: any field left empty matches anything.
#[derive(Debug, Clone, Default)]
pub struct WhitelistEntry {
    pub filter: Option<String>,
    pub trigger: Option<String>,
    pub filename: Option<String>,
}

impl WhitelistEntry {
    fn field_matches(field: &Option<String>, value: &str) -> bool {
        match field {
            None => true,
            Some(s) if s.is_empty() => true,
            Some(s) => s == value,
        }
    }

    fn matches(&self, finding: &Finding) -> bool {
        Self::field_matches(&self.filter, &finding.filter)
            && Self::field_matches(&self.trigger, &finding.trigger)
            && Self::field_matches(&self.filename, &finding.filename)
    }
}

/// A set of `(filter, trigger, filename)` whitelist entries.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    entries: Vec<WhitelistEntry>,
}

impl Whitelist {
    pub fn new(entries: Vec<WhitelistEntry>) -> Self {
        Self { entries }
    }

    /// Returns true iff some entry matches every non-empty field of `finding`.
    pub fn allows(&self, finding: &Finding) -> bool {
        self.entries.iter().any(|entry| entry.matches(finding))
    }
}

/// A count of TODO findings grouped by the offending username, used by the
/// report to print "3 TODOs mention alice" style summaries.
pub fn group_todos_by_username(findings: &[Finding]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for finding in findings {
        if let Some(username) = &finding.username {
            *counts.entry(username.clone()).or_insert(0) += 1;
        }
    }
    counts
}
