use regex::Regex;
use serde::Deserialize;

use crate::comments::{CLikeCommentExtractor, CommentExtractor};
use crate::context::Context;
use crate::errors::Result;
use crate::findings::Finding;
use crate::rule::BatchRule;
use crate::scanned_file::ScannedFile;

/// Policy for a Java file found to be "empty" after stripping comments and
/// whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum EmptyFileAction {
    Ignore,
    Delete,
    Error,
}

impl Default for EmptyFileAction {
    fn default() -> Self {
        EmptyFileAction::Ignore
    }
}

impl TryFrom<String> for EmptyFileAction {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "IGNORE" => Ok(EmptyFileAction::Ignore),
            "DELETE" => Ok(EmptyFileAction::Delete),
            "ERROR" => Ok(EmptyFileAction::Error),
            other => Err(format!("unknown empty_java_file_action: \"{other}\"")),
        }
    }
}

/// A Java file is "empty" if, after stripping comments and whitespace, only
/// a `package` declaration and optionally `import`s remain. Evaluated over
/// all files sharing an extension, after per-file rules have run
/// (post-batch).
pub struct EmptyJavaFileScrubber {
    action: EmptyFileAction,
    package_or_import: Regex,
}

impl EmptyJavaFileScrubber {
    pub fn new(action: EmptyFileAction) -> Self {
        Self {
            action,
            package_or_import: Regex::new(r"^(package\s+[\w.]+\s*;|import\s+(static\s+)?[\w.*]+\s*;)$").unwrap(),
        }
    }

    fn is_empty_after_stripping(&self, text: &str) -> bool {
        let stripped = strip_comments(text);
        stripped
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .all(|line| self.package_or_import.is_match(line))
    }
}

fn strip_comments(text: &str) -> String {
    let spans = CLikeCommentExtractor.extract(text);
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        result.push_str(&text[cursor..span.start]);
        cursor = span.end;
    }
    result.push_str(&text[cursor..]);
    result
}

impl BatchRule for EmptyJavaFileScrubber {
    fn batch_scrub(&self, files: &mut [&mut ScannedFile], ctx: &mut Context) -> Result<()> {
        for file in files.iter_mut() {
            if file.is_deleted() {
                continue;
            }
            let text = file.contents()?.to_string();
            if !self.is_empty_after_stripping(&text) {
                continue;
            }
            match self.action {
                EmptyFileAction::Ignore => {}
                EmptyFileAction::Delete => file.delete(),
                EmptyFileAction::Error => {
                    let filename = file.relative_path().to_string();
                    ctx.add_finding(Finding::new(
                        "empty_java_file",
                        "",
                        filename,
                        "Java file is empty after stripping comments and whitespace",
                    ));
                }
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "empty_java_file_scrubber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Whitelist;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn ctx() -> Context {
        Context::new(PathBuf::from("/tmp/scratch"), Whitelist::default())
    }

    #[test]
    fn empty_java_file_is_deleted_under_delete_policy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Empty.java");
        std::fs::write(&path, "package com.example;\nimport java.util.List;\n// nothing else\n").unwrap();
        let mut file = ScannedFile::new(path, "Empty.java".to_string(), dir.path().join("scratch"));

        let rule = EmptyJavaFileScrubber::new(EmptyFileAction::Delete);
        let mut context = ctx();
        let mut refs: Vec<&mut ScannedFile> = vec![&mut file];
        rule.batch_scrub(&mut refs, &mut context).unwrap();

        assert!(file.is_deleted());
    }

    #[test]
    fn non_empty_java_file_is_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Real.java");
        std::fs::write(&path, "package com.example;\nclass Real { void f() {} }\n").unwrap();
        let mut file = ScannedFile::new(path, "Real.java".to_string(), dir.path().join("scratch"));

        let rule = EmptyJavaFileScrubber::new(EmptyFileAction::Delete);
        let mut context = ctx();
        let mut refs: Vec<&mut ScannedFile> = vec![&mut file];
        rule.batch_scrub(&mut refs, &mut context).unwrap();

        assert!(!file.is_deleted());
    }

    #[test]
    fn error_policy_emits_finding_without_deleting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Empty.java");
        std::fs::write(&path, "package com.example;\n").unwrap();
        let mut file = ScannedFile::new(path, "Empty.java".to_string(), dir.path().join("scratch"));

        let rule = EmptyJavaFileScrubber::new(EmptyFileAction::Error);
        let mut context = ctx();
        let mut refs: Vec<&mut ScannedFile> = vec![&mut file];
        rule.batch_scrub(&mut refs, &mut context).unwrap();

        assert!(!file.is_deleted());
        assert_eq!(context.findings.len(), 1);
    }
}
