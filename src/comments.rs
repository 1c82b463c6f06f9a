/// The kind of comment span an extractor produced. Documentation comments
/// (Python triple-quoted strings) are treated specially by the
/// non-documentation-comments rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
    Documentation,
}

/// A contiguous comment region: byte offsets into the original text, plus
/// the comment's own text (including delimiters) and its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub kind: CommentKind,
}

/// Produces a non-overlapping sequence of comment spans for a language
/// family. Dispatch between families is by construction (pick the right
/// extractor for the extension), not by inheritance.
pub trait CommentExtractor {
    fn extract(&self, text: &str) -> Vec<CommentSpan>;
}

/// C-like: `/* ... */` block comments (non-nesting, terminated by the first
/// `*/`) and `// ...` to end of line. Respects string literals `"..."` and
/// character literals `'...'` with backslash escapes, so delimiters inside
/// string content are not mistaken for comment boundaries.
pub struct CLikeCommentExtractor;

impl CommentExtractor for CLikeCommentExtractor {
    fn extract(&self, text: &str) -> Vec<CommentSpan> {
        let bytes = text.as_bytes();
        let mut spans = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => {
                    let quote = bytes[i];
                    i += 1;
                    while i < bytes.len() {
                        if bytes[i] == b'\\' && i + 1 < bytes.len() {
                            i += 2;
                            continue;
                        }
                        if bytes[i] == quote {
                            i += 1;
                            break;
                        }
                        i += 1;
                    }
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    let start = i;
                    let mut end = i + 2;
                    while end < bytes.len() && bytes[end] != b'\n' {
                        end += 1;
                    }
                    spans.push(CommentSpan {
                        start,
                        end,
                        text: text[start..end].to_string(),
                        kind: CommentKind::Line,
                    });
                    i = end;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    let start = i;
                    let mut end = i + 2;
                    while end + 1 < bytes.len() && !(bytes[end] == b'*' && bytes[end + 1] == b'/') {
                        end += 1;
                    }
                    end = (end + 2).min(bytes.len());
                    spans.push(CommentSpan {
                        start,
                        end,
                        text: text[start..end].to_string(),
                        kind: CommentKind::Block,
                    });
                    i = end;
                }
                _ => i += 1,
            }
        }
        spans
    }
}

/// Python: `# ...` to end of line, plus triple-quoted strings (`"""..."""`
/// and `'''...'''`) treated as documentation comments. The extractor does
/// not distinguish a docstring position from an arbitrary triple-quoted
/// string literal elsewhere in the file, matching the original's behavior
/// (documented, not fixed, per the open question on false positives).
pub struct PythonCommentExtractor;

impl CommentExtractor for PythonCommentExtractor {
    fn extract(&self, text: &str) -> Vec<CommentSpan> {
        let bytes = text.as_bytes();
        let mut spans = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if let Some(delim) = triple_quote_at(bytes, i) {
                let start = i;
                let mut end = i + 3;
                while end + 2 < bytes.len() || end + 3 <= bytes.len() {
                    if end + 3 > bytes.len() {
                        end = bytes.len();
                        break;
                    }
                    if &bytes[end..end + 3] == delim {
                        end += 3;
                        break;
                    }
                    end += 1;
                }
                spans.push(CommentSpan {
                    start,
                    end,
                    text: text[start..end].to_string(),
                    kind: CommentKind::Documentation,
                });
                i = end;
                continue;
            }
            match bytes[i] {
                b'"' | b'\'' => {
                    let quote = bytes[i];
                    i += 1;
                    while i < bytes.len() {
                        if bytes[i] == b'\\' && i + 1 < bytes.len() {
                            i += 2;
                            continue;
                        }
                        if bytes[i] == quote {
                            i += 1;
                            break;
                        }
                        i += 1;
                    }
                }
                b'#' => {
                    let start = i;
                    let mut end = i;
                    while end < bytes.len() && bytes[end] != b'\n' {
                        end += 1;
                    }
                    spans.push(CommentSpan {
                        start,
                        end,
                        text: text[start..end].to_string(),
                        kind: CommentKind::Line,
                    });
                    i = end;
                }
                _ => i += 1,
            }
        }
        spans
    }
}

fn triple_quote_at(bytes: &[u8], i: usize) -> Option<&'static [u8]> {
    if bytes[i..].starts_with(b"\"\"\"") {
        Some(b"\"\"\"")
    } else if bytes[i..].starts_with(b"'''") {
        Some(b"'''")
    } else {
        None
    }
}

/// Shell-like: `# ...` to end of line, except the first line is exempt if
/// it starts with `#!` (a shebang, handled separately by `ShebangReplace`).
pub struct ShellLikeCommentExtractor;

impl CommentExtractor for ShellLikeCommentExtractor {
    fn extract(&self, text: &str) -> Vec<CommentSpan> {
        let mut spans = Vec::new();
        let mut offset = 0;
        let mut first_line = true;
        for line in text.split_inclusive('\n') {
            let trimmed = line.trim_end_matches('\n');
            let is_shebang = first_line && trimmed.starts_with("#!");
            first_line = false;
            if !is_shebang {
                if let Some(hash) = trimmed.find('#') {
                    let start = offset + hash;
                    let end = offset + trimmed.len();
                    spans.push(CommentSpan {
                        start,
                        end,
                        text: text[start..end].to_string(),
                        kind: CommentKind::Line,
                    });
                }
            }
            offset += line.len();
        }
        spans
    }
}

/// HTML: `<!-- ... -->`, non-nesting.
pub struct HtmlCommentExtractor;

impl CommentExtractor for HtmlCommentExtractor {
    fn extract(&self, text: &str) -> Vec<CommentSpan> {
        let mut spans = Vec::new();
        let mut search_from = 0;
        while let Some(rel_start) = text[search_from..].find("<!--") {
            let start = search_from + rel_start;
            match text[start..].find("-->") {
                Some(rel_end) => {
                    let end = start + rel_end + 3;
                    spans.push(CommentSpan {
                        start,
                        end,
                        text: text[start..end].to_string(),
                        kind: CommentKind::Block,
                    });
                    search_from = end;
                }
                None => break,
            }
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_like_skips_comment_markers_inside_strings() {
        let spans = CLikeCommentExtractor.extract(r#"let s = "// not a comment"; // real"#);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "// real");
    }

    #[test]
    fn c_like_block_comment_terminates_at_first_close() {
        let spans = CLikeCommentExtractor.extract("/* one */ code /* two */");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "/* one */");
        assert_eq!(spans[1].text, "/* two */");
    }

    #[test]
    fn python_extracts_hash_and_triple_quoted_strings() {
        let spans = PythonCommentExtractor.extract("# hi\nx = \"\"\"doc\"\"\"\n");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].kind, CommentKind::Line);
        assert_eq!(spans[1].kind, CommentKind::Documentation);
    }

    #[test]
    fn shell_like_exempts_shebang_on_first_line() {
        let spans = ShellLikeCommentExtractor.extract("#!/bin/sh\n# real comment\necho hi\n");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "# real comment");
    }

    #[test]
    fn html_extracts_non_nesting_block() {
        let spans = HtmlCommentExtractor.extract("<p>hi</p><!-- note --><div></div>");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "<!-- note -->");
    }
}
