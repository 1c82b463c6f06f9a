use std::collections::HashSet;
use std::path::PathBuf;

use crate::findings::{Finding, Whitelist};

/// Mutable per-run state threaded through the dispatcher: the findings list,
/// the scratch directory, and the sets of unknown extensions/files
/// encountered while resolving rule tables.
pub struct Context {
    pub findings: Vec<Finding>,
    pub scratch_dir: PathBuf,
    pub unknown_extensions: HashSet<String>,
    pub unknown_files: HashSet<String>,
    whitelist: Whitelist,
}

impl Context {
    pub fn new(scratch_dir: PathBuf, whitelist: Whitelist) -> Self {
        Self {
            findings: Vec::new(),
            scratch_dir,
            unknown_extensions: HashSet::new(),
            unknown_files: HashSet::new(),
            whitelist,
        }
    }

    /// The single entry point for appending a finding: consults the
    /// whitelist and silently drops matches, per the whitelist/findings
    /// data model.
    pub fn add_finding(&mut self, finding: Finding) {
        if !self.whitelist.allows(&finding) {
            self.findings.push(finding);
        }
    }

    pub fn note_unknown_extension(&mut self, extension: impl Into<String>) {
        self.unknown_extensions.insert(extension.into());
    }

    pub fn note_unknown_file(&mut self, filename: impl Into<String>) {
        self.unknown_files.insert(filename.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::WhitelistEntry;

    #[test]
    fn whitelisted_finding_is_dropped() {
        let whitelist = Whitelist::new(vec![WhitelistEntry {
            filter: Some("sensitive_string".to_string()),
            trigger: None,
            filename: None,
        }]);
        let mut ctx = Context::new(PathBuf::from("/tmp/scratch"), whitelist);
        ctx.add_finding(Finding::new("sensitive_string", "acme", "a.c", "found"));
        assert!(ctx.findings.is_empty());
    }

    #[test]
    fn non_whitelisted_finding_is_kept() {
        let mut ctx = Context::new(PathBuf::from("/tmp/scratch"), Whitelist::default());
        ctx.add_finding(Finding::new("sensitive_string", "acme", "a.c", "found"));
        assert_eq!(ctx.findings.len(), 1);
    }
}
