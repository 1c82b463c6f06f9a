use regex::Regex;

use crate::comments::{CommentExtractor, CommentKind, CommentSpan};
use crate::context::Context;
use crate::errors::Result;
use crate::findings::Finding;
use crate::matchers::SensitiveMatcher;
use crate::rule::PerFileRule;
use crate::scanned_file::ScannedFile;
use crate::usernames::UsernameFilter;

/// Transforms one comment span's text. The output of one rule is the input
/// of the next, applied in a fixed order over each span independently.
pub trait CommentRule {
    fn apply(&self, span: &CommentSpan, filename: &str, ctx: &mut Context) -> String;
}

/// Deletes the span entirely (whitespace/newline framing outside the span
/// is untouched by construction, since it lies outside the span bounds).
pub struct AllCommentsRule;

impl CommentRule for AllCommentsRule {
    fn apply(&self, _span: &CommentSpan, _filename: &str, _ctx: &mut Context) -> String {
        String::new()
    }
}

/// Deletes the span unless the extractor labelled it a documentation
/// comment (a Python triple-quoted string).
pub struct NonDocumentationCommentsRule;

impl CommentRule for NonDocumentationCommentsRule {
    fn apply(&self, span: &CommentSpan, _filename: &str, _ctx: &mut Context) -> String {
        if span.kind == CommentKind::Documentation {
            span.text.clone()
        } else {
            String::new()
        }
    }
}

/// Finds `TODO(name)` or `TODO(name1, name2)`; for each name, asks the
/// username filter whether it is unknown, emitting a TODO finding if so.
/// Never rewrites the span.
pub struct TodoRule {
    pattern: Regex,
    username_filter: UsernameFilter,
}

impl TodoRule {
    pub fn new(username_filter: UsernameFilter) -> Self {
        Self {
            pattern: Regex::new(r"TODO\(([^)]*)\)").unwrap(),
            username_filter,
        }
    }
}

impl CommentRule for TodoRule {
    fn apply(&self, span: &CommentSpan, filename: &str, ctx: &mut Context) -> String {
        for todo_match in self.pattern.captures_iter(&span.text) {
            let names = &todo_match[1];
            for name in names.split(',') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                if self.username_filter.is_unknown(name) {
                    ctx.add_finding(
                        Finding::new(
                            "TODO",
                            format!("TODO({name})"),
                            filename,
                            format!("TODO references unknown user \"{name}\""),
                        )
                        .with_username(name.to_string()),
                    );
                }
            }
        }
        span.text.clone()
    }
}

/// Removes lines beginning with `Author:` or `@author` when the named
/// identifier is scrubbable (or unknown under `scrub_unknown`); publishable
/// authors are retained verbatim.
pub struct AuthorDeclarationRule {
    pattern: Regex,
    username_filter: UsernameFilter,
}

impl AuthorDeclarationRule {
    pub fn new(username_filter: UsernameFilter) -> Self {
        Self {
            pattern: Regex::new(r"(?m)^([^\n]*?(?:Author:|@author)\s*(\S+)[^\n]*)$").unwrap(),
            username_filter,
        }
    }
}

impl CommentRule for AuthorDeclarationRule {
    fn apply(&self, span: &CommentSpan, _filename: &str, _ctx: &mut Context) -> String {
        let mut result = span.text.clone();
        for author_match in self.pattern.captures_iter(&span.text) {
            let username = &author_match[2];
            if self.username_filter.should_scrub(username) {
                let whole_line = &author_match[1];
                result = result.replace(whole_line, "");
            }
        }
        result
    }
}

/// Runs each sensitive-string matcher over the span text; rewrites every
/// trigger to empty text and emits a finding, unless whitelisted.
pub struct SensitiveInCommentRule {
    matchers: Vec<Box<dyn SensitiveMatcher>>,
}

impl SensitiveInCommentRule {
    pub fn new(matchers: Vec<Box<dyn SensitiveMatcher>>) -> Self {
        Self { matchers }
    }
}

impl CommentRule for SensitiveInCommentRule {
    fn apply(&self, span: &CommentSpan, filename: &str, ctx: &mut Context) -> String {
        let mut text = span.text.clone();
        for matcher in &self.matchers {
            let matches = matcher.find_matches(&text);
            for m in matches.iter().rev() {
                ctx.add_finding(Finding::new(
                    "sensitive_string",
                    m.trigger.clone(),
                    filename,
                    format!("sensitive string \"{}\" found in comment", m.trigger),
                ));
                text.replace_range(m.start..m.end, "");
            }
        }
        text
    }
}

/// A `PerFileRule` constructed from a comment extractor and an ordered list
/// of comment-span rules. Extracts spans, runs the rule list over each span
/// in order (each rule's output feeding the next), and reassembles the
/// file: original text minus old spans plus new span texts, in order.
pub struct CommentScrubber {
    extractor: Box<dyn CommentExtractor + Send + Sync>,
    rules: Vec<Box<dyn CommentRule>>,
}

impl CommentScrubber {
    pub fn new(
        extractor: Box<dyn CommentExtractor + Send + Sync>,
        rules: Vec<Box<dyn CommentRule>>,
    ) -> Self {
        Self { extractor, rules }
    }
}

impl PerFileRule for CommentScrubber {
    fn scrub_file(&self, file: &mut ScannedFile, ctx: &mut Context) -> Result<()> {
        let filename = file.relative_path().to_string();
        let text = file.contents()?.to_string();
        let spans = self.extractor.extract(&text);
        if spans.is_empty() {
            return Ok(());
        }

        let mut rewritten = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in &spans {
            rewritten.push_str(&text[cursor..span.start]);
            let mut span_text = span.text.clone();
            for rule in &self.rules {
                let transient = CommentSpan {
                    start: span.start,
                    end: span.end,
                    text: span_text,
                    kind: span.kind,
                };
                span_text = rule.apply(&transient, &filename, ctx);
            }
            rewritten.push_str(&span_text);
            cursor = span.end;
        }
        rewritten.push_str(&text[cursor..]);

        file.write_contents(rewritten)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "comment_scrubber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::CLikeCommentExtractor;
    use crate::findings::Whitelist;
    use crate::matchers::WordMatcher;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn ctx() -> Context {
        Context::new(PathBuf::from("/tmp/scratch"), Whitelist::default())
    }

    #[test]
    fn todo_rule_flags_unknown_user_without_rewriting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.c");
        std::fs::write(&path, "// TODO(alice): x\n").unwrap();
        let mut file = ScannedFile::new(path, "a.c".to_string(), dir.path().join("scratch"));

        let username_filter = UsernameFilter::new(vec![], vec![], false);
        let scrubber = CommentScrubber::new(
            Box::new(CLikeCommentExtractor),
            vec![Box::new(TodoRule::new(username_filter))],
        );
        let mut context = ctx();
        scrubber.scrub_file(&mut file, &mut context).unwrap();

        assert_eq!(context.findings.len(), 1);
        assert_eq!(context.findings[0].username.as_deref(), Some("alice"));
        assert_eq!(file.contents().unwrap(), "// TODO(alice): x\n");
    }

    #[test]
    fn sensitive_in_comment_rewrites_and_records_finding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("b.py");
        std::fs::write(&path, "# contact acme-internal for help\nprint(1)\n").unwrap();
        let mut file = ScannedFile::new(path, "b.py".to_string(), dir.path().join("scratch"));

        let matcher: Box<dyn SensitiveMatcher> =
            Box::new(WordMatcher::new(&["acme-internal".to_string()]).unwrap());
        let scrubber = CommentScrubber::new(
            Box::new(crate::comments::PythonCommentExtractor),
            vec![Box::new(SensitiveInCommentRule::new(vec![matcher]))],
        );
        let mut context = ctx();
        scrubber.scrub_file(&mut file, &mut context).unwrap();

        assert_eq!(context.findings.len(), 1);
        let contents = file.contents().unwrap();
        assert!(!contents.contains("acme-internal"));
        assert!(contents.contains("print(1)"));
    }

    #[test]
    fn all_comments_rule_deletes_and_preserves_surrounding_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.c");
        std::fs::write(&path, "int x; // drop me\nint y;\n").unwrap();
        let mut file = ScannedFile::new(path, "c.c".to_string(), dir.path().join("scratch"));

        let scrubber = CommentScrubber::new(Box::new(CLikeCommentExtractor), vec![Box::new(AllCommentsRule)]);
        let mut context = ctx();
        scrubber.scrub_file(&mut file, &mut context).unwrap();

        assert_eq!(file.contents().unwrap(), "int x; \nint y;\n");
    }
}
