use regex::Regex;

use crate::context::Context;
use crate::errors::Result;
use crate::rule::PerFileRule;
use crate::scanned_file::ScannedFile;
use crate::usernames::UsernameFilter;

/// The result of running one line rule over one physical line.
pub enum LineOutcome {
    Keep(String),
    Remove,
}

/// A per-line rewrite rule, run as part of a single file-wide pass outside
/// comment extraction.
pub trait LineRule {
    fn apply_line(&self, line: &str) -> LineOutcome;
}

fn module_matches(module: &str, target: &str) -> bool {
    module == target || module.starts_with(&format!("{target}."))
}

fn rewrite_module(module: &str, internal: &str, public: &str) -> String {
    format!("{public}{}", &module[internal.len()..])
}

/// Rewrites `import internal` to `import public as as_name` (omitting `as`
/// when absent) and `from internal[.X] import Y` to `from public[.X] import
/// Y`.
pub struct PythonModuleRename {
    import_re: Regex,
    from_re: Regex,
    internal_module: String,
    public_module: String,
    as_name: Option<String>,
}

impl PythonModuleRename {
    pub fn new(internal_module: String, public_module: String, as_name: Option<String>) -> Self {
        Self {
            import_re: Regex::new(r"^(\s*)import\s+([A-Za-z0-9_.]+)\s*$").unwrap(),
            from_re: Regex::new(r"^(\s*)from\s+([A-Za-z0-9_.]+)\s+import\s+(.*)$").unwrap(),
            internal_module,
            public_module,
            as_name,
        }
    }
}

impl LineRule for PythonModuleRename {
    fn apply_line(&self, line: &str) -> LineOutcome {
        if let Some(caps) = self.import_re.captures(line) {
            let module = &caps[2];
            if module == self.internal_module {
                let indent = &caps[1];
                let rewritten = match &self.as_name {
                    Some(as_name) => format!("{indent}import {} as {as_name}", self.public_module),
                    None => format!("{indent}import {}", self.public_module),
                };
                return LineOutcome::Keep(rewritten);
            }
        }
        if let Some(caps) = self.from_re.captures(line) {
            let module = &caps[2];
            if module_matches(module, &self.internal_module) {
                let indent = &caps[1];
                let rest = &caps[3];
                let new_module = rewrite_module(module, &self.internal_module, &self.public_module);
                return LineOutcome::Keep(format!("{indent}from {new_module} import {rest}"));
            }
        }
        LineOutcome::Keep(line.to_string())
    }
}

/// Deletes any import line (`import name` or `from name[.X] import ...`)
/// importing the configured module.
pub struct PythonModuleRemove {
    import_re: Regex,
    from_re: Regex,
    module: String,
}

impl PythonModuleRemove {
    pub fn new(module: String) -> Self {
        Self {
            import_re: Regex::new(r"^\s*import\s+([A-Za-z0-9_.]+)\s*$").unwrap(),
            from_re: Regex::new(r"^\s*from\s+([A-Za-z0-9_.]+)\s+import\s+.*$").unwrap(),
            module,
        }
    }
}

impl LineRule for PythonModuleRemove {
    fn apply_line(&self, line: &str) -> LineOutcome {
        if let Some(caps) = self.import_re.captures(line) {
            if module_matches(&caps[1], &self.module) {
                return LineOutcome::Remove;
            }
        }
        if let Some(caps) = self.from_re.captures(line) {
            if module_matches(&caps[1], &self.module) {
                return LineOutcome::Remove;
            }
        }
        LineOutcome::Keep(line.to_string())
    }
}

/// Textual substring replacement of two directory strings anywhere on a
/// line, intended for paths embedded in source files and HTML.
pub struct JsDirectoryRename {
    internal_directory: String,
    public_directory: String,
}

impl JsDirectoryRename {
    pub fn new(internal_directory: String, public_directory: String) -> Self {
        Self {
            internal_directory,
            public_directory,
        }
    }
}

impl LineRule for JsDirectoryRename {
    fn apply_line(&self, line: &str) -> LineOutcome {
        if line.contains(&self.internal_directory) {
            LineOutcome::Keep(line.replace(&self.internal_directory, &self.public_directory))
        } else {
            LineOutcome::Keep(line.to_string())
        }
    }
}

/// Deletes `__author__ = '...'` lines when the named identifier is
/// scrubbable.
pub struct PythonAuthorDeclarationScrubber {
    pattern: Regex,
    username_filter: UsernameFilter,
}

impl PythonAuthorDeclarationScrubber {
    pub fn new(username_filter: UsernameFilter) -> Self {
        Self {
            pattern: Regex::new(r#"^\s*__author__\s*=\s*['"]([^'"]+)['"]\s*$"#).unwrap(),
            username_filter,
        }
    }
}

impl LineRule for PythonAuthorDeclarationScrubber {
    fn apply_line(&self, line: &str) -> LineOutcome {
        if let Some(caps) = self.pattern.captures(line) {
            if self.username_filter.should_scrub(&caps[1]) {
                return LineOutcome::Remove;
            }
        }
        LineOutcome::Keep(line.to_string())
    }
}

/// Composes an ordered list of `LineRule`s into a single `PerFileRule` pass
/// over the whole file: one line at a time, each rule's output (or removal)
/// feeding the next rule.
pub struct LineScrubber {
    rules: Vec<Box<dyn LineRule>>,
}

impl LineScrubber {
    pub fn new(rules: Vec<Box<dyn LineRule>>) -> Self {
        Self { rules }
    }
}

impl PerFileRule for LineScrubber {
    fn scrub_file(&self, file: &mut ScannedFile, _ctx: &mut Context) -> Result<()> {
        let text = file.contents()?.to_string();
        let mut out_lines = Vec::new();
        for line in text.split('\n') {
            let mut current = line.to_string();
            let mut removed = false;
            for rule in &self.rules {
                match rule.apply_line(&current) {
                    LineOutcome::Keep(new_line) => current = new_line,
                    LineOutcome::Remove => {
                        removed = true;
                        break;
                    }
                }
            }
            if !removed {
                out_lines.push(current);
            }
        }
        let rewritten = out_lines.join("\n");
        file.write_contents(rewritten)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "line_scrubber"
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
    fn python_module_rename_rewrites_import_and_from() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "from foo.bar import baz\nimport foo\n").unwrap();
        let mut file = ScannedFile::new(path, "a.py".to_string(), dir.path().join("scratch"));

        let rule = PythonModuleRename::new("foo".to_string(), "pub".to_string(), Some("p".to_string()));
        let scrubber = LineScrubber::new(vec![Box::new(rule)]);
        let mut context = ctx();
        scrubber.scrub_file(&mut file, &mut context).unwrap();

        assert_eq!(file.contents().unwrap(), "from pub.bar import baz\nimport pub as p\n");
    }

    #[test]
    fn python_module_remove_deletes_import_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "import internal_only\nimport os\n").unwrap();
        let mut file = ScannedFile::new(path, "a.py".to_string(), dir.path().join("scratch"));

        let rule = PythonModuleRemove::new("internal_only".to_string());
        let scrubber = LineScrubber::new(vec![Box::new(rule)]);
        let mut context = ctx();
        scrubber.scrub_file(&mut file, &mut context).unwrap();

        assert_eq!(file.contents().unwrap(), "import os\n");
    }
}
