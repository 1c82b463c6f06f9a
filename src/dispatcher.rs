use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::context::Context;
use crate::errors::{Error, Result};
use crate::scanned_file::ScannedFile;

/// Resolves the rule list for a file by extension/name and orchestrates
/// pre-batch -> per-file -> post-batch, per spec.md §2/§4.10. Holds the
/// compiled `Config` by reference; mutates the file list and the shared
/// `Context` it is handed.
pub struct Dispatcher<'a> {
    config: &'a Config,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Enumerates the files under `codebase`, or the explicit input-file
    /// list when one is given (all paths must be under `codebase`).
    /// `ignore_files_re` filters a file out of the returned list entirely,
    /// matching `FindFiles`'s behaviour of never scanning it at all. Unlike
    /// the teacher's walkers, `.gitignore` is not consulted: MOE's scrubber
    /// walks every file under the codebase regardless of VCS ignore rules.
    pub fn enumerate_files(
        &self,
        codebase: &Path,
        scratch_dir: &Path,
        explicit_inputs: Option<&[PathBuf]>,
    ) -> Result<Vec<ScannedFile>> {
        let mut absolute_paths = Vec::new();
        match explicit_inputs {
            Some(inputs) => {
                let canonical_codebase = fs::canonicalize(codebase)?;
                for input in inputs {
                    let absolute = if input.is_absolute() {
                        input.clone()
                    } else {
                        codebase.join(input)
                    };
                    let canonical = fs::canonicalize(&absolute).map_err(|_| Error::InputNotFound(absolute.clone()))?;
                    if !canonical.is_file() || !canonical.starts_with(&canonical_codebase) {
                        return Err(Error::InputNotFound(absolute));
                    }
                    absolute_paths.push(absolute);
                }
            }
            None => {
                let mut walker = WalkBuilder::new(codebase);
                walker.standard_filters(false).hidden(false);
                for entry in walker.build() {
                    let entry = entry?;
                    if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                        absolute_paths.push(entry.into_path());
                    }
                }
            }
        }

        let mut files = Vec::with_capacity(absolute_paths.len());
        for absolute_path in absolute_paths {
            let relative_path = absolute_path
                .strip_prefix(codebase)
                .unwrap_or(&absolute_path)
                .to_string_lossy()
                .replace('\\', "/");

            if let Some(re) = &self.config.ignore_files_re {
                if re.is_match(&relative_path) {
                    continue;
                }
            }

            let mut file = ScannedFile::new(absolute_path.clone(), relative_path, scratch_dir.to_path_buf());
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mode = fs::metadata(&absolute_path)?.permissions().mode();
                file.set_original_mode(Some(mode));
            }
            self.config.file_renamer.rename(&mut file);
            files.push(file);
        }
        Ok(files)
    }

    /// Runs the full pre-batch -> per-file -> post-batch pipeline over
    /// `files`, sequentially and in file-list order, per spec.md §5.
    pub fn run(&self, files: &mut [ScannedFile], ctx: &mut Context) -> Result<()> {
        let mut extensions = Vec::with_capacity(files.len());
        let mut scrubbable = Vec::with_capacity(files.len());
        for file in files.iter_mut() {
            let extension = self.config.resolve_extension(file.relative_path());
            let do_not_scrub = self
                .config
                .do_not_scrub_files_re
                .as_ref()
                .map(|re| re.is_match(file.relative_path()))
                .unwrap_or(false);
            let is_binary = file.is_binary()?;
            scrubbable.push(!do_not_scrub && !is_binary);
            extensions.push(extension);
        }

        let extensions_present: BTreeSet<String> = extensions
            .iter()
            .zip(scrubbable.iter())
            .filter(|(_, elig)| **elig)
            .map(|(ext, _)| ext.clone())
            .collect();

        for extension in &extensions_present {
            if let Some(rules) = self.config.pre_batch_rules(extension) {
                let mut group = group_by_extension(files, &extensions, &scrubbable, extension);
                for rule in rules {
                    rule.batch_scrub(&mut group, ctx)?;
                }
            }
        }

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} files scrubbed")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        for ((file, extension), eligible) in files.iter_mut().zip(extensions.iter()).zip(scrubbable.iter()) {
            progress.inc(1);
            if !*eligible || file.is_deleted() {
                continue;
            }
            let relative_path = file.relative_path().to_string();
            let rules = match self.config.per_file_rules(extension) {
                Some(rules) => rules,
                None => {
                    if self.config.is_known_filename(&relative_path) {
                        continue;
                    }
                    ctx.note_unknown_extension(extension.clone());
                    if extension.is_empty() {
                        ctx.note_unknown_file(relative_path);
                    }
                    self.config.default_rules()
                }
            };
            for rule in rules {
                rule.scrub_file(file, ctx)?;
                if file.is_deleted() {
                    break;
                }
            }
        }
        progress.finish_and_clear();

        for extension in &extensions_present {
            if let Some(rules) = self.config.post_batch_rules(extension) {
                let mut group = group_by_extension(files, &extensions, &scrubbable, extension);
                for rule in rules {
                    rule.batch_scrub(&mut group, ctx)?;
                }
            }
        }

        Ok(())
    }
}

fn group_by_extension<'f>(
    files: &'f mut [ScannedFile],
    extensions: &[String],
    scrubbable: &[bool],
    extension: &str,
) -> Vec<&'f mut ScannedFile> {
    files
        .iter_mut()
        .zip(extensions.iter())
        .zip(scrubbable.iter())
        .filter(|((_, ext), elig)| ext.as_str() == extension && **elig)
        .map(|((file, _), _)| file)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Whitelist;
    use tempfile::TempDir;

    fn ctx(scratch: &Path) -> Context {
        Context::new(scratch.to_path_buf(), Whitelist::default())
    }

    #[test]
    fn ignored_files_never_enter_the_file_list() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("skip.py"), "x = 2\n").unwrap();

        let config = Config::from_json_str(r#"{"ignore_files_re": "skip\\.py"}"#, dir.path()).unwrap();
        let dispatcher = Dispatcher::new(&config);
        let files = dispatcher
            .enumerate_files(dir.path(), &dir.path().join("scratch"), None)
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path(), "keep.py");
    }

    #[test]
    fn binary_and_do_not_scrub_files_are_skipped_but_kept_in_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), [0xffu8, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("vendor.py"), "TODO(alice)\n").unwrap();

        let config = Config::from_json_str(
            r#"{"do_not_scrub_files_re": "vendor\\.py", "scrub_unknown_users": true}"#,
            dir.path(),
        )
        .unwrap();
        let dispatcher = Dispatcher::new(&config);
        let mut files = dispatcher
            .enumerate_files(dir.path(), &dir.path().join("scratch"), None)
            .unwrap();
        let mut context = ctx(dir.path());
        dispatcher.run(&mut files, &mut context).unwrap();

        assert!(context.findings.is_empty());
        assert!(!files.iter().any(|f| f.is_modified()));
    }

    #[test]
    fn unknown_extension_is_recorded_and_default_rules_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.weird"), "hello\n").unwrap();

        let config = Config::from_json_str(r#"{"sensitive_words": ["hello"]}"#, dir.path()).unwrap();
        let dispatcher = Dispatcher::new(&config);
        let mut files = dispatcher
            .enumerate_files(dir.path(), &dir.path().join("scratch"), None)
            .unwrap();
        let mut context = ctx(dir.path());
        dispatcher.run(&mut files, &mut context).unwrap();

        assert!(context.unknown_extensions.contains(".weird"));
        assert_eq!(context.findings.len(), 1);
    }

    #[test]
    fn known_bare_filenames_are_skipped_without_recording_unknown() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LICENSE"), "hello\n").unwrap();

        let config = Config::from_json_str(r#"{"sensitive_words": ["hello"]}"#, dir.path()).unwrap();
        let dispatcher = Dispatcher::new(&config);
        let mut files = dispatcher
            .enumerate_files(dir.path(), &dir.path().join("scratch"), None)
            .unwrap();
        let mut context = ctx(dir.path());
        dispatcher.run(&mut files, &mut context).unwrap();

        assert!(context.unknown_extensions.is_empty());
        assert!(context.findings.is_empty());
    }

    #[test]
    fn empty_java_post_batch_deletes_after_per_file_rules_ran() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Empty.java"), "package com.example;\nimport java.util.List;\n").unwrap();

        let config = Config::from_json_str(r#"{"empty_java_file_action": "DELETE"}"#, dir.path()).unwrap();
        let dispatcher = Dispatcher::new(&config);
        let mut files = dispatcher
            .enumerate_files(dir.path(), &dir.path().join("scratch"), None)
            .unwrap();
        let mut context = ctx(dir.path());
        dispatcher.run(&mut files, &mut context).unwrap();

        assert!(files[0].is_deleted());
    }
}
