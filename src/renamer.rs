use regex::Regex;

use crate::errors::Result;
use crate::scanned_file::ScannedFile;

/// One `rearranging_config` entry: a regex matched against a file's
/// codebase-relative path, and its replacement, in the host regex
/// library's backreference syntax.
pub struct RearrangeRule {
    pattern: Regex,
    replacement: String,
}

impl RearrangeRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }
}

/// Computes each file's output-relative path from the `rearranging_config`
/// directory-rename mapping. Rules are tried in order; the first match
/// wins. A file matching no rule keeps its codebase-relative path as its
/// output-relative path.
pub struct FileRenamer {
    rules: Vec<RearrangeRule>,
}

impl FileRenamer {
    pub fn new(rules: Vec<RearrangeRule>) -> Self {
        Self { rules }
    }

    pub fn output_path_for(&self, relative_path: &str) -> String {
        for rule in &self.rules {
            if rule.pattern.is_match(relative_path) {
                return rule
                    .pattern
                    .replace(relative_path, rule.replacement.as_str())
                    .into_owned();
            }
        }
        relative_path.to_string()
    }

    /// Applies the mapping to a file, setting its output-relative path.
    pub fn rename(&self, file: &mut ScannedFile) {
        let new_path = self.output_path_for(file.relative_path());
        if new_path != file.relative_path() {
            file.set_output_relative_path(new_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_matching_rule_wins() {
        let renamer = FileRenamer::new(vec![
            RearrangeRule::new(r"^internal/(.*)$", "public/$1").unwrap(),
            RearrangeRule::new(r"^internal/special/(.*)$", "weird/$1").unwrap(),
        ]);
        assert_eq!(renamer.output_path_for("internal/special/a.java"), "public/special/a.java");
    }

    #[test]
    fn non_matching_path_is_unchanged() {
        let renamer = FileRenamer::new(vec![RearrangeRule::new(r"^internal/(.*)$", "public/$1").unwrap()]);
        assert_eq!(renamer.output_path_for("common/a.java"), "common/a.java");
    }

    #[test]
    fn rename_updates_scanned_file_output_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.java");
        std::fs::write(&path, "x").unwrap();
        let mut file = ScannedFile::new(path, "internal/a.java".to_string(), dir.path().join("scratch"));

        let renamer = FileRenamer::new(vec![RearrangeRule::new(r"^internal/(.*)$", "public/$1").unwrap()]);
        renamer.rename(&mut file);
        assert_eq!(file.output_relative_path(), "public/a.java");
    }
}
