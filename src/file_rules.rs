use regex::Regex;

use crate::context::Context;
use crate::errors::Result;
use crate::findings::Finding;
use crate::rule::PerFileRule;
use crate::scanned_file::ScannedFile;

/// An ordered list of literal `(original -> replacement)` substitutions
/// applied over the full content, each on the output of the previous one.
pub struct Replacer {
    pairs: Vec<(String, String)>,
}

impl Replacer {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl PerFileRule for Replacer {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        for (original, replacement) in &self.pairs {
            file.rewrite(original, replacement)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "replacer"
    }
}

/// An ordered list of regex replacements; replacement strings support
/// backreferences in the host regex library's syntax (`$1`, `${name}`).
pub struct RegexReplacer {
    pairs: Vec<(Regex, String)>,
}

impl RegexReplacer {
    pub fn new(pairs: Vec<(Regex, String)>) -> Self {
        Self { pairs }
    }
}

impl PerFileRule for RegexReplacer {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        let mut rewritten = text.clone();
        for (pattern, replacement) in &self.pairs {
            rewritten = pattern.replace_all(&rewritten, replacement.as_str()).into_owned();
        }
        if rewritten != text {
            file.write_contents(rewritten)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "regex_replacer"
    }
}

/// If the first line starts with `#!`, replaces it with a configured line
/// verbatim.
pub struct ShebangReplace {
    shebang_line: String,
}

impl ShebangReplace {
    pub fn new(shebang_line: String) -> Self {
        Self { shebang_line }
    }
}

impl PerFileRule for ShebangReplace {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        if let Some(first_line_end) = text.find('\n') {
            let first_line = &text[..first_line_end];
            if first_line.starts_with("#!") {
                let rewritten = format!("{}{}", self.shebang_line, &text[first_line_end..]);
                file.write_contents(rewritten)?;
            }
        } else if text.starts_with("#!") {
            file.write_contents(self.shebang_line.clone())?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "shebang_replace"
    }
}

/// What to do with a matched `#include` directive.
pub enum IncludeAction {
    Drop,
    Keep,
    Rename(String),
}

/// Driven by a config mapping `regex -> action`, applied to `#include "…"`
/// and `#include <…>` lines.
pub struct CIncludeScrubber {
    include_line: Regex,
    rules: Vec<(Regex, IncludeAction)>,
}

impl CIncludeScrubber {
    pub fn new(rules: Vec<(Regex, IncludeAction)>) -> Self {
        Self {
            include_line: Regex::new(r#"^(\s*#include\s*)(".*?"|<.*?>)(\s*)$"#).unwrap(),
            rules,
        }
    }

    fn target(captured: &str) -> &str {
        &captured[1..captured.len() - 1]
    }
}

impl PerFileRule for CIncludeScrubber {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        let mut out_lines = Vec::new();
        for line in text.split('\n') {
            if let Some(caps) = self.include_line.captures(line) {
                let quoted = &caps[2];
                let target = Self::target(quoted);
                let action = self
                    .rules
                    .iter()
                    .find(|(re, _)| re.is_match(target))
                    .map(|(_, action)| action);
                match action {
                    Some(IncludeAction::Drop) => continue,
                    Some(IncludeAction::Rename(new_target)) => {
                        let delimiters = (quoted.as_bytes()[0], quoted.as_bytes()[quoted.len() - 1]);
                        let rewritten = format!(
                            "{}{}{}{}{}",
                            &caps[1],
                            delimiters.0 as char,
                            new_target,
                            delimiters.1 as char,
                            &caps[3]
                        );
                        out_lines.push(rewritten);
                    }
                    Some(IncludeAction::Keep) | None => out_lines.push(line.to_string()),
                }
            } else {
                out_lines.push(line.to_string());
            }
        }
        let rewritten = out_lines.join("\n");
        file.write_contents(rewritten)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "c_include_scrubber"
    }
}

/// Tokenizes top-of-file `import X.Y.Z;` (including `import static`) lines
/// and removes each whose last identifier does not appear as a token
/// anywhere else in the file.
pub struct JavaUnusedImportStripper {
    import_line: Regex,
}

impl Default for JavaUnusedImportStripper {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaUnusedImportStripper {
    pub fn new() -> Self {
        Self {
            import_line: Regex::new(r"^import\s+(static\s+)?([\w.]+)\s*;\s*$").unwrap(),
        }
    }
}

impl PerFileRule for JavaUnusedImportStripper {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        let mut out_lines = Vec::new();
        for line in text.split('\n') {
            if let Some(caps) = self.import_line.captures(line) {
                let path = &caps[2];
                let last_ident = path.rsplit('.').next().unwrap_or(path);
                let usage = Regex::new(&format!(r"\b{}\b", regex::escape(last_ident))).unwrap();
                let occurrences = usage.find_iter(&text).count();
                if occurrences <= 1 {
                    continue;
                }
            }
            out_lines.push(line.to_string());
        }
        let rewritten = out_lines.join("\n");
        file.write_contents(rewritten)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "java_unused_import_stripper"
    }
}

/// Collapses any run of at least N+1 blank lines into exactly N.
pub struct BlankLineCoalescer {
    maximum_blank_lines: usize,
}

impl BlankLineCoalescer {
    pub fn new(maximum_blank_lines: usize) -> Self {
        Self { maximum_blank_lines }
    }
}

impl PerFileRule for BlankLineCoalescer {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        let mut out_lines: Vec<&str> = Vec::new();
        let mut blank_run = 0usize;
        for line in text.split('\n') {
            if line.trim().is_empty() {
                blank_run += 1;
                if blank_run <= self.maximum_blank_lines {
                    out_lines.push(line);
                }
            } else {
                blank_run = 0;
                out_lines.push(line);
            }
        }
        let rewritten = out_lines.join("\n");
        file.write_contents(rewritten)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "blank_line_coalescer"
    }
}

const TEST_SIZE_ANNOTATIONS: [&str; 4] = ["SmallTest", "MediumTest", "LargeTest", "EnormousTest"];

/// Removes lines consisting solely of `@SmallTest`/`@MediumTest`/
/// `@LargeTest`/`@EnormousTest` (and combinations), plus the matching
/// import lines.
pub struct JavaTestSizeAnnotationScrubber {
    annotation_only_line: Regex,
    import_line: Regex,
}

impl Default for JavaTestSizeAnnotationScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaTestSizeAnnotationScrubber {
    pub fn new() -> Self {
        let names = TEST_SIZE_ANNOTATIONS.join("|");
        Self {
            annotation_only_line: Regex::new(&format!(r"^(\s*@(?:{names})\s*)+$")).unwrap(),
            import_line: Regex::new(&format!(r"^import\s+[\w.]*\.({names})\s*;\s*$", names = names)).unwrap(),
        }
    }
}

impl PerFileRule for JavaTestSizeAnnotationScrubber {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        let out_lines: Vec<&str> = text
            .split('\n')
            .filter(|line| {
                !self.annotation_only_line.is_match(line) && !self.import_line.is_match(line)
            })
            .collect();
        let rewritten = out_lines.join("\n");
        file.write_contents(rewritten)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "java_testsize_annotation_scrubber"
    }
}

/// Removes `<inherits name="X"/>` elements whose `X` is in a configured
/// set.
pub struct GwtInheritScrubber {
    pattern: Regex,
    names: std::collections::HashSet<String>,
}

impl GwtInheritScrubber {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            pattern: Regex::new(r#"^\s*<inherits\s+name="([^"]+)"\s*/>\s*$"#).unwrap(),
            names: names.into_iter().collect(),
        }
    }
}

impl PerFileRule for GwtInheritScrubber {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        let out_lines: Vec<&str> = text
            .split('\n')
            .filter(|line| match self.pattern.captures(line) {
                Some(caps) => !self.names.contains(&caps[1]),
                None => true,
            })
            .collect();
        let rewritten = out_lines.join("\n");
        file.write_contents(rewritten)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "gwt_inherit_scrubber"
    }
}

/// Textual rewrite of an internal package prefix to a public one, anywhere
/// it appears word-boundary-delimited: `package`/`import` declarations and
/// fully-qualified names.
pub struct JavaRenameScrubber {
    pattern: Regex,
    public_package: String,
}

impl JavaRenameScrubber {
    pub fn new(internal_package: String, public_package: String) -> Self {
        Self {
            pattern: Regex::new(&format!(r"\b{}\b", regex::escape(&internal_package))).unwrap(),
            public_package,
        }
    }
}

impl PerFileRule for JavaRenameScrubber {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        let rewritten = self.pattern.replace_all(&text, self.public_package.as_str());
        if rewritten != text {
            file.write_contents(rewritten.into_owned())?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "java_rename_scrubber"
    }
}

/// Runs a sensitive-string/regex matcher stack against the full file text
/// for languages without a comment-aware pass (the dispatcher's "polyglot
/// rules" stage). Findings use the regular whitelist.
pub struct PolyglotSensitiveScrubber {
    matchers: Vec<Box<dyn crate::matchers::SensitiveMatcher>>,
}

impl PolyglotSensitiveScrubber {
    pub fn new(matchers: Vec<Box<dyn crate::matchers::SensitiveMatcher>>) -> Self {
        Self { matchers }
    }
}

impl PerFileRule for PolyglotSensitiveScrubber {
    fn scrub_file(&self, file: &mut ScannedFile, ctx: &mut Context) -> Result<()> {
        let filename = file.relative_path().to_string();
        let mut text = file.contents()?.to_string();
        for matcher in &self.matchers {
            let matches = matcher.find_matches(&text);
            for m in matches.iter().rev() {
                ctx.add_finding(Finding::new(
                    "sensitive_string",
                    m.trigger.clone(),
                    &filename,
                    format!("sensitive string \"{}\" found", m.trigger),
                ));
                text.replace_range(m.start..m.end, "");
            }
        }
        file.write_contents(text)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "polyglot_sensitive_scrubber"
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

    fn make_file(dir: &TempDir, name: &str, contents: &str) -> ScannedFile {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        ScannedFile::new(path, name.to_string(), dir.path().join("scratch"))
    }

    #[test]
    fn java_unused_import_stripper_removes_only_unused() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(
            &dir,
            "A.java",
            "import java.util.List;\nimport java.util.Map;\n\nclass A { Map<String,String> m; }\n",
        );
        let rule = JavaUnusedImportStripper::new();
        let mut context = ctx();
        rule.scrub_file(&mut file, &mut context).unwrap();
        let contents = file.contents().unwrap();
        assert!(!contents.contains("import java.util.List;"));
        assert!(contents.contains("import java.util.Map;"));
    }

    #[test]
    fn blank_line_coalescer_collapses_runs() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(&dir, "a.txt", "a\n\n\n\n\nb\n");
        let rule = BlankLineCoalescer::new(1);
        let mut context = ctx();
        rule.scrub_file(&mut file, &mut context).unwrap();
        assert_eq!(file.contents().unwrap(), "a\n\nb\n");
    }

    #[test]
    fn gwt_inherit_scrubber_removes_configured_names() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(
            &dir,
            "Module.gwt.xml",
            "<module>\n<inherits name=\"internal.Module\"/>\n<inherits name=\"public.Module\"/>\n</module>\n",
        );
        let rule = GwtInheritScrubber::new(vec!["internal.Module".to_string()]);
        let mut context = ctx();
        rule.scrub_file(&mut file, &mut context).unwrap();
        let contents = file.contents().unwrap();
        assert!(!contents.contains("internal.Module"));
        assert!(contents.contains("public.Module"));
    }

    #[test]
    fn shebang_replace_rewrites_first_line_only() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(&dir, "run.sh", "#!/usr/bin/python2\necho hi\n");
        let rule = ShebangReplace::new("#!/usr/bin/python3".to_string());
        let mut context = ctx();
        rule.scrub_file(&mut file, &mut context).unwrap();
        assert_eq!(file.contents().unwrap(), "#!/usr/bin/python3\necho hi\n");
    }

    #[test]
    fn c_include_scrubber_drops_and_renames() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(
            &dir,
            "a.c",
            "#include \"internal/debug.h\"\n#include \"common/base.h\"\n",
        );
        let rules = vec![
            (Regex::new("internal/.*").unwrap(), IncludeAction::Drop),
            (
                Regex::new("common/base.h").unwrap(),
                IncludeAction::Rename("public/base.h".to_string()),
            ),
        ];
        let rule = CIncludeScrubber::new(rules);
        let mut context = ctx();
        rule.scrub_file(&mut file, &mut context).unwrap();
        assert_eq!(file.contents().unwrap(), "#include \"public/base.h\"\n");
    }
}
