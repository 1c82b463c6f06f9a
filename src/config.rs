use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::batch_rules::{EmptyFileAction, EmptyJavaFileScrubber};
use crate::comment_rules::{
    AllCommentsRule, AuthorDeclarationRule, CommentRule, NonDocumentationCommentsRule,
    SensitiveInCommentRule, TodoRule,
};
use crate::comments::{
    CLikeCommentExtractor, CommentExtractor, HtmlCommentExtractor, PythonCommentExtractor,
    ShellLikeCommentExtractor,
};
use crate::errors::{Error, Result};
use crate::file_rules::{
    BlankLineCoalescer, CIncludeScrubber, GwtInheritScrubber, IncludeAction, JavaRenameScrubber,
    JavaTestSizeAnnotationScrubber, JavaUnusedImportStripper, PolyglotSensitiveScrubber,
    RegexReplacer, Replacer, ShebangReplace,
};
use crate::findings::{Whitelist, WhitelistEntry};
use crate::line_rules::{
    JsDirectoryRename, LineRule, LineScrubber, PythonAuthorDeclarationScrubber, PythonModuleRemove,
    PythonModuleRename,
};
use crate::matchers::{RegexMatcher, SensitiveMatcher, WordMatcher};
use crate::renamer::{FileRenamer, RearrangeRule};
use crate::rule::{BatchRule, PerFileAsBatch, PerFileRule};
use crate::usernames::UsernameFilter;

/// The known bare filenames that are silently skipped (rather than counted
/// as "unknown") when a file has no recognised extension.
const KNOWN_FILENAMES: [&str; 7] = [
    ".gitignore",
    "AUTHORS",
    "CONTRIBUTORS",
    "COPYING",
    "LICENSE",
    "Makefile",
    "README",
];

#[derive(Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
struct RawWhitelistEntry {
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    trigger: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct RawReplacement {
    original: String,
    replacement: String,
}

#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct RawJavaRename {
    internal_package: String,
    public_package: String,
}

#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct RawJsDirectoryRename {
    internal_directory: String,
    public_directory: String,
}

#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct RawPythonModuleRename {
    internal_module: String,
    public_module: String,
    #[serde(default)]
    as_name: Option<String>,
}

#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct RawPythonModuleRemove {
    import_module: String,
}

#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct RawShebangReplace {
    shebang_line: String,
}

#[derive(Deserialize, Clone)]
#[serde(untagged)]
enum RawIncludeAction {
    Keyword(String),
    Rename { rename: String },
}

#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct RawIncludeRule {
    regex: String,
    action: RawIncludeAction,
}

#[derive(Deserialize, Clone, Default)]
#[serde(deny_unknown_fields, default)]
struct RawSensitiveStringFile {
    sensitive_words: Vec<String>,
    sensitive_res: Vec<String>,
}

/// The JSON configuration schema. Unknown keys are a fatal config error
/// (`deny_unknown_fields`).
#[derive(Deserialize, Default, Clone)]
#[serde(deny_unknown_fields, default)]
struct RawConfig {
    ignore_files_re: Option<String>,
    do_not_scrub_files_re: Option<String>,
    extension_map: Vec<(String, String)>,
    sensitive_words: Vec<String>,
    sensitive_res: Vec<String>,
    sensitive_string_file: Option<String>,
    whitelist: Vec<RawWhitelistEntry>,
    scrub_sensitive_comments: bool,
    scrub_non_documentation_comments: bool,
    scrub_all_comments: bool,
    scrub_proto_comments: bool,
    scrub_authors: bool,
    scrub_unknown_users: bool,
    scrub_java_testsize_annotations: bool,
    maximum_blank_lines: Option<usize>,
    empty_java_file_action: EmptyFileAction,
    rearranging_config: Vec<(String, String)>,
    string_replacements: Vec<RawReplacement>,
    regex_replacements: Vec<RawReplacement>,
    usernames_to_scrub: Vec<String>,
    usernames_to_publish: Vec<String>,
    usernames_file: Option<String>,
    c_includes_config_file: Option<String>,
    java_renames: Vec<RawJavaRename>,
    js_directory_rename: Option<RawJsDirectoryRename>,
    js_directory_renames: Vec<RawJsDirectoryRename>,
    python_module_renames: Vec<RawPythonModuleRename>,
    python_module_removes: Vec<RawPythonModuleRemove>,
    python_shebang_replace: Option<RawShebangReplace>,
    scrub_gwt_inherits: Vec<String>,
}

/// Immutable after construction: the compiled regex tables, rule tables
/// keyed by extension, default rule list, whitelist, username filter, and
/// the known-bare-filename set. Handed to the dispatcher by reference.
pub struct Config {
    pub ignore_files_re: Option<Regex>,
    pub do_not_scrub_files_re: Option<Regex>,
    pub extension_map: Vec<(Regex, String)>,
    pub known_filenames: HashSet<String>,
    pub whitelist: Whitelist,
    pub file_renamer: FileRenamer,
    per_file_rules: HashMap<String, Vec<Box<dyn PerFileRule>>>,
    pre_batch_rules: HashMap<String, Vec<Box<dyn BatchRule>>>,
    post_batch_rules: HashMap<String, Vec<Box<dyn BatchRule>>>,
    default_rules: Vec<Box<dyn PerFileRule>>,
}

impl Config {
    /// Loads and compiles a config from a JSON file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents, path.parent().unwrap_or_else(|| Path::new(".")))
    }

    /// Loads and compiles a config from an inline JSON string.
    pub fn from_json_str(json: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Self::from_raw(raw, base_dir)
    }

    /// An empty configuration, identity on every extension other than those
    /// with a sensitive-string/comment default (there are none when the
    /// sensitive lists and scrub flags are all empty/false).
    pub fn empty() -> Self {
        Self::from_raw(RawConfig::default(), Path::new(".")).expect("empty config never fails")
    }

    fn from_raw(raw: RawConfig, base_dir: &Path) -> Result<Self> {
        let ignore_files_re = raw.ignore_files_re.as_deref().map(Regex::new).transpose()?;
        let do_not_scrub_files_re = raw
            .do_not_scrub_files_re
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        let extension_map = raw
            .extension_map
            .iter()
            .map(|(pattern, ext)| Ok((Regex::new(pattern)?, ext.clone())))
            .collect::<Result<Vec<_>>>()?;

        let whitelist = Whitelist::new(
            raw.whitelist
                .iter()
                .cloned()
                .map(|w| WhitelistEntry {
                    filter: w.filter,
                    trigger: w.trigger,
                    filename: w.filename,
                })
                .collect(),
        );

        let mut username_filter = UsernameFilter::new(
            raw.usernames_to_publish.clone(),
            raw.usernames_to_scrub.clone(),
            raw.scrub_unknown_users,
        );
        if let Some(path) = &raw.usernames_file {
            username_filter = username_filter.with_usernames_file(&resolve_path(base_dir, path))?;
        }

        let rearranging_config = raw
            .rearranging_config
            .iter()
            .map(|(pattern, replacement)| RearrangeRule::new(pattern, replacement))
            .collect::<Result<Vec<_>>>()?;
        let file_renamer = FileRenamer::new(rearranging_config);

        let maximum_blank_lines = raw.maximum_blank_lines.unwrap_or(0);
        let known_filenames = KNOWN_FILENAMES.iter().map(|s| s.to_string()).collect();

        let builder = ConfigBuilder {
            raw: &raw,
            base_dir,
            username_filter,
            maximum_blank_lines,
        };

        let mut per_file_rules: HashMap<String, Vec<Box<dyn PerFileRule>>> = HashMap::new();
        let mut pre_batch_rules: HashMap<String, Vec<Box<dyn BatchRule>>> = HashMap::new();
        let mut post_batch_rules: HashMap<String, Vec<Box<dyn BatchRule>>> = HashMap::new();

        // C-like family: comment scrubbing is pre-batch so the per-file
        // rules below see already-scrubbed text, mirroring the original's
        // "applied per file but declared as pre-batch" comment stack.
        for ext in [
            ".go", ".h", ".c", ".cc", ".l", ".swig", ".java", ".jj", ".js", ".jslib", ".php",
            ".php4", ".php5",
        ] {
            pre_batch_rules.insert(ext.to_string(), builder.comment_scrubber_batch());
        }
        for ext in [".go", ".h", ".c", ".cc", ".l", ".swig"] {
            per_file_rules.insert(ext.to_string(), builder.c_like_rules()?);
        }

        for ext in [".hgignore", ".gitignore", ".sh", ".yaml"] {
            per_file_rules.insert(ext.to_string(), builder.shell_rules());
        }

        per_file_rules.insert(".html".to_string(), builder.html_rules());

        per_file_rules.insert(".java".to_string(), builder.java_rules());
        per_file_rules.insert(".jj".to_string(), builder.java_rules());
        if raw.empty_java_file_action != EmptyFileAction::Ignore {
            for ext in [".java", ".jj"] {
                let rule: Vec<Box<dyn BatchRule>> =
                    vec![Box::new(EmptyJavaFileScrubber::new(raw.empty_java_file_action))];
                post_batch_rules.insert(ext.to_string(), rule);
            }
        }

        for ext in [".js", ".jslib"] {
            per_file_rules.insert(ext.to_string(), builder.js_rules());
        }

        for ext in [".php", ".php4", ".php5"] {
            per_file_rules.insert(ext.to_string(), builder.php_rules());
        }

        per_file_rules.insert(".py".to_string(), builder.python_rules());

        if raw.scrub_proto_comments {
            for ext in [".proto", ".protodevel"] {
                pre_batch_rules.insert(ext.to_string(), builder.comment_scrubber_batch());
            }
        }
        for ext in [".proto", ".protodevel"] {
            per_file_rules.insert(ext.to_string(), builder.proto_rules());
        }

        for ext in [".css", ".json"] {
            per_file_rules.insert(ext.to_string(), builder.polyglot_rules());
        }

        per_file_rules.insert(".xml".to_string(), builder.gwt_xml_rules());

        for ext in [".jar", ".gif", ".png", ".jpg"] {
            per_file_rules.insert(ext.to_string(), Vec::new());
        }

        let default_rules = builder.polyglot_rules();

        Ok(Self {
            ignore_files_re,
            do_not_scrub_files_re,
            extension_map,
            known_filenames,
            whitelist,
            file_renamer,
            per_file_rules,
            pre_batch_rules,
            post_batch_rules,
            default_rules,
        })
    }

    /// Extension resolution for a file, in order: (1) first matching
    /// `(regex -> extension)` override; (2) real file extension;
    /// (3) if no extension and the bare name starts with `.`, the whole
    /// basename; (4) empty string.
    pub fn resolve_extension(&self, relative_path: &str) -> String {
        for (pattern, extension) in &self.extension_map {
            if pattern.is_match(relative_path) {
                return extension.clone();
            }
        }
        let basename = Path::new(relative_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(relative_path);
        if let Some(dot) = basename.rfind('.') {
            if dot > 0 {
                return basename[dot..].to_string();
            }
        }
        if basename.starts_with('.') {
            return basename.to_string();
        }
        String::new()
    }

    pub fn is_known_filename(&self, relative_path: &str) -> bool {
        let basename = Path::new(relative_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(relative_path);
        self.known_filenames.contains(basename)
    }

    pub fn per_file_rules(&self, extension: &str) -> Option<&[Box<dyn PerFileRule>]> {
        self.per_file_rules.get(extension).map(|v| v.as_slice())
    }

    pub fn pre_batch_rules(&self, extension: &str) -> Option<&[Box<dyn BatchRule>]> {
        self.pre_batch_rules.get(extension).map(|v| v.as_slice())
    }

    pub fn post_batch_rules(&self, extension: &str) -> Option<&[Box<dyn BatchRule>]> {
        self.post_batch_rules.get(extension).map(|v| v.as_slice())
    }

    pub fn default_rules(&self) -> &[Box<dyn PerFileRule>] {
        &self.default_rules
    }
}

fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    }
}

/// Assembles rule lists for each extension family, mirroring the original
/// `_Make*Scrubbers` methods. Kept separate from `Config` itself so the
/// (lengthy, imperative) assembly logic doesn't crowd the compiled data
/// structure's public API.
struct ConfigBuilder<'a> {
    raw: &'a RawConfig,
    base_dir: &'a Path,
    username_filter: UsernameFilter,
    maximum_blank_lines: usize,
}

impl<'a> ConfigBuilder<'a> {
    fn sensitive_matchers(&self) -> Vec<Box<dyn SensitiveMatcher>> {
        let mut sensitive_words = self.raw.sensitive_words.clone();
        let mut sensitive_res = self.raw.sensitive_res.clone();
        if let Some(path) = &self.raw.sensitive_string_file {
            if let Ok(contents) = fs::read_to_string(resolve_path(self.base_dir, path)) {
                if let Ok(extra) = serde_json::from_str::<RawSensitiveStringFile>(&contents) {
                    sensitive_words.extend(extra.sensitive_words);
                    sensitive_res.extend(extra.sensitive_res);
                }
            }
        }
        let mut matchers: Vec<Box<dyn SensitiveMatcher>> = Vec::new();
        if !sensitive_words.is_empty() {
            if let Ok(matcher) = WordMatcher::new(&sensitive_words) {
                matchers.push(Box::new(matcher));
            }
        }
        if !sensitive_res.is_empty() {
            if let Ok(matcher) = RegexMatcher::new(&sensitive_res) {
                matchers.push(Box::new(matcher));
            }
        }
        matchers
    }

    /// Polyglot rules: string/regex replacer, then sensitive-string
    /// matchers over the full file text. Applied last by every other
    /// language family's rule list, mirroring `_PolyglotFileScrubbers`.
    fn polyglot_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        let mut rules: Vec<Box<dyn PerFileRule>> = Vec::new();
        if !self.raw.string_replacements.is_empty() {
            rules.push(Box::new(Replacer::new(
                self.raw
                    .string_replacements
                    .iter()
                    .map(|r| (r.original.clone(), r.replacement.clone()))
                    .collect(),
            )));
        }
        if !self.raw.regex_replacements.is_empty() {
            let pairs: Vec<(Regex, String)> = self
                .raw
                .regex_replacements
                .iter()
                .filter_map(|r| Regex::new(&r.original).ok().map(|re| (re, r.replacement.clone())))
                .collect();
            if !pairs.is_empty() {
                rules.push(Box::new(RegexReplacer::new(pairs)));
            }
        }
        let matchers = self.sensitive_matchers();
        if !matchers.is_empty() {
            rules.push(Box::new(PolyglotSensitiveScrubber::new(matchers)));
        }
        rules
    }

    /// Mirrors `_CommentScrubbers`: at most one of the all/non-documentation
    /// rules (mutually exclusive, all-comments wins), then TODO scrubbing
    /// unconditionally, then optional author scrubbing, then one sensitive
    /// rule per configured matcher.
    fn comment_rule_stack(&self) -> Vec<Box<dyn CommentRule>> {
        let mut rules: Vec<Box<dyn CommentRule>> = Vec::new();
        if self.raw.scrub_all_comments {
            rules.push(Box::new(AllCommentsRule));
        } else if self.raw.scrub_non_documentation_comments {
            rules.push(Box::new(NonDocumentationCommentsRule));
        }
        rules.push(Box::new(TodoRule::new(self.username_filter.clone())));
        if self.raw.scrub_authors {
            rules.push(Box::new(AuthorDeclarationRule::new(self.username_filter.clone())));
        }
        if self.raw.scrub_sensitive_comments {
            for matcher in self.sensitive_matchers() {
                rules.push(Box::new(SensitiveInCommentRule::new(vec![matcher])));
            }
        }
        rules
    }

    fn comment_scrubber(
        &self,
        extractor: Box<dyn CommentExtractor + Send + Sync>,
    ) -> crate::comment_rules::CommentScrubber {
        crate::comment_rules::CommentScrubber::new(extractor, self.comment_rule_stack())
    }

    fn comment_scrubber_batch(&self) -> Vec<Box<dyn BatchRule>> {
        vec![Box::new(PerFileAsBatch::new(
            self.comment_scrubber(Box::new(CLikeCommentExtractor)),
        ))]
    }

    fn c_like_rules(&self) -> Result<Vec<Box<dyn PerFileRule>>> {
        let mut rules: Vec<Box<dyn PerFileRule>> = Vec::new();
        if let Some(path) = &self.raw.c_includes_config_file {
            rules.push(Box::new(self.c_include_scrubber(path)?));
        }
        rules.extend(self.polyglot_rules());
        Ok(rules)
    }

    fn c_include_scrubber(&self, path: &str) -> Result<CIncludeScrubber> {
        let resolved = resolve_path(self.base_dir, path);
        let contents = fs::read_to_string(&resolved)?;
        let raw_rules: Vec<RawIncludeRule> = serde_json::from_str(&contents)?;
        let rules = raw_rules
            .into_iter()
            .map(|r| {
                let action = match r.action {
                    RawIncludeAction::Keyword(ref kw) if kw.eq_ignore_ascii_case("drop") => IncludeAction::Drop,
                    RawIncludeAction::Keyword(ref kw) if kw.eq_ignore_ascii_case("keep") => IncludeAction::Keep,
                    RawIncludeAction::Keyword(other) => {
                        return Err(Error::Config(format!("unknown include action: \"{other}\"")))
                    }
                    RawIncludeAction::Rename { rename } => IncludeAction::Rename(rename),
                };
                Ok((Regex::new(&r.regex)?, action))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CIncludeScrubber::new(rules))
    }

    fn shell_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        let mut rules: Vec<Box<dyn PerFileRule>> =
            vec![Box::new(self.comment_scrubber(Box::new(ShellLikeCommentExtractor)))];
        rules.extend(self.polyglot_rules());
        rules
    }

    fn html_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        let mut rules: Vec<Box<dyn PerFileRule>> =
            vec![Box::new(self.comment_scrubber(Box::new(HtmlCommentExtractor)))];
        let line_rules: Vec<Box<dyn LineRule>> = self
            .js_directory_renames()
            .into_iter()
            .map(|r| Box::new(r) as Box<dyn LineRule>)
            .collect();
        rules.push(Box::new(LineScrubber::new(line_rules)));
        rules.extend(self.polyglot_rules());
        rules
    }

    fn js_directory_renames(&self) -> Vec<JsDirectoryRename> {
        let mut renames: Vec<JsDirectoryRename> = Vec::new();
        if let Some(single) = &self.raw.js_directory_rename {
            renames.push(JsDirectoryRename::new(
                single.internal_directory.clone(),
                single.public_directory.clone(),
            ));
        }
        for rename in &self.raw.js_directory_renames {
            renames.push(JsDirectoryRename::new(
                rename.internal_directory.clone(),
                rename.public_directory.clone(),
            ));
        }
        renames
    }

    fn java_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        let mut rules: Vec<Box<dyn PerFileRule>> = vec![Box::new(LineScrubber::new(Vec::new()))];
        for rename in &self.raw.java_renames {
            rules.push(Box::new(JavaRenameScrubber::new(
                rename.internal_package.clone(),
                rename.public_package.clone(),
            )));
        }
        if self.raw.scrub_java_testsize_annotations {
            rules.push(Box::new(JavaTestSizeAnnotationScrubber::new()));
        }
        rules.push(Box::new(JavaUnusedImportStripper::new()));
        if self.maximum_blank_lines > 0 {
            rules.push(Box::new(BlankLineCoalescer::new(self.maximum_blank_lines)));
        }
        rules.extend(self.polyglot_rules());
        rules
    }

    fn js_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        let line_rules: Vec<Box<dyn LineRule>> = self
            .js_directory_renames()
            .into_iter()
            .map(|r| Box::new(r) as Box<dyn LineRule>)
            .collect();
        let mut rules: Vec<Box<dyn PerFileRule>> = vec![Box::new(LineScrubber::new(line_rules))];
        rules.extend(self.polyglot_rules());
        rules
    }

    fn php_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        let mut rules: Vec<Box<dyn PerFileRule>> = vec![Box::new(LineScrubber::new(Vec::new()))];
        rules.extend(self.polyglot_rules());
        rules
    }

    fn python_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        let mut rules: Vec<Box<dyn PerFileRule>> =
            vec![Box::new(self.comment_scrubber(Box::new(PythonCommentExtractor)))];

        if let Some(shebang) = &self.raw.python_shebang_replace {
            rules.push(Box::new(ShebangReplace::new(shebang.shebang_line.clone())));
        }

        let mut line_rules: Vec<Box<dyn LineRule>> = Vec::new();
        for rename in &self.raw.python_module_renames {
            line_rules.push(Box::new(PythonModuleRename::new(
                rename.internal_module.clone(),
                rename.public_module.clone(),
                rename.as_name.clone(),
            )));
        }
        for removal in &self.raw.python_module_removes {
            line_rules.push(Box::new(PythonModuleRemove::new(removal.import_module.clone())));
        }
        if self.raw.scrub_authors {
            line_rules.push(Box::new(PythonAuthorDeclarationScrubber::new(self.username_filter.clone())));
        }
        rules.push(Box::new(LineScrubber::new(line_rules)));
        rules.extend(self.polyglot_rules());
        rules
    }

    fn proto_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        let mut rules: Vec<Box<dyn PerFileRule>> = vec![Box::new(LineScrubber::new(Vec::new()))];
        rules.extend(self.polyglot_rules());
        rules
    }

    fn gwt_xml_rules(&self) -> Vec<Box<dyn PerFileRule>> {
        if self.raw.scrub_gwt_inherits.is_empty() {
            Vec::new()
        } else {
            vec![Box::new(GwtInheritScrubber::new(self.raw.scrub_gwt_inherits.clone()))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_extension_prefers_override() {
        let config = Config::from_json_str(r#"{"extension_map": [["^BUILD$", ".py"]]}"#, Path::new(".")).unwrap();
        assert_eq!(config.resolve_extension("BUILD"), ".py");
        assert_eq!(config.resolve_extension("a.java"), ".java");
    }

    #[test]
    fn resolve_extension_falls_back_to_dotfile_basename() {
        let config = Config::empty();
        assert_eq!(config.resolve_extension(".gitignore"), ".gitignore");
        assert_eq!(config.resolve_extension("no_extension"), "");
    }

    #[test]
    fn known_filenames_include_license_and_readme() {
        let config = Config::empty();
        assert!(config.is_known_filename("LICENSE"));
        assert!(config.is_known_filename("src/README"));
        assert!(!config.is_known_filename("random.xyz"));
    }

    #[test]
    fn unknown_json_key_is_a_config_error() {
        let result = Config::from_json_str(r#"{"not_a_real_key": true}"#, Path::new("."));
        assert!(result.is_err());
    }

    #[test]
    fn empty_config_has_default_rules_only() {
        let config = Config::empty();
        assert!(config.per_file_rules(".py").is_some());
        assert!(config.default_rules().is_empty());
    }

    #[test]
    fn empty_java_file_action_validates_allowed_values() {
        let err = Config::from_json_str(r#"{"empty_java_file_action": "BOGUS"}"#, Path::new("."));
        assert!(err.is_err());
        let ok = Config::from_json_str(r#"{"empty_java_file_action": "DELETE"}"#, Path::new("."));
        assert!(ok.is_ok());
    }
}
