use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// The in-memory content of a scanned file: text when the whole file
/// decodes as UTF-8, otherwise the raw bytes.
#[derive(Debug, Clone)]
pub enum Content {
    Text(String),
    Binary(Vec<u8>),
}

/// A single file under the codebase, lazily loaded and mutated in place by
/// rules as the dispatcher runs them.
///
/// Invariants (mirrored from the scrubbing engine's data model): content is
/// loaded lazily on first access; once `is_deleted` is set, `is_modified` is
/// also set and content becomes empty text; `is_unicode=false` implies the
/// file is binary and no rule may mutate it; writing back mirrors the
/// executable bit to user/group/other.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute path to the file on disk.
    absolute_path: PathBuf,
    /// Path relative to the codebase root.
    relative_path: String,
    /// Path relative to the output tree; differs from `relative_path` only
    /// when a rename rule has fired.
    output_relative_path: String,
    content: Option<Content>,
    is_unicode: bool,
    is_modified: bool,
    is_deleted: bool,
    scratch_dir: PathBuf,
    mode: Option<u32>,
}

impl ScannedFile {
    pub fn new(absolute_path: PathBuf, relative_path: String, scratch_dir: PathBuf) -> Self {
        let output_relative_path = relative_path.clone();
        Self {
            absolute_path,
            relative_path,
            output_relative_path,
            content: None,
            is_unicode: false,
            is_modified: false,
            is_deleted: false,
            scratch_dir,
            mode: None,
        }
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn output_relative_path(&self) -> &str {
        &self.output_relative_path
    }

    pub fn set_output_relative_path(&mut self, path: String) {
        self.output_relative_path = path;
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn load(&mut self) -> Result<()> {
        if self.content.is_some() {
            return Ok(());
        }
        let bytes = fs::read(&self.absolute_path)?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                self.is_unicode = true;
                self.content = Some(Content::Text(text));
            }
            Err(err) => {
                self.is_unicode = false;
                self.content = Some(Content::Binary(err.into_bytes()));
            }
        }
        Ok(())
    }

    /// Returns the file's text content, reading and UTF-8-decoding the file
    /// on first access. Subsequent calls are O(1).
    ///
    /// Panics if called on a binary file; callers must check `is_binary()`
    /// (or rely on the dispatcher, which never runs rules over binaries)
    /// before calling this.
    pub fn contents(&mut self) -> Result<&str> {
        self.load()?;
        match self.content.as_ref().unwrap() {
            Content::Text(text) => Ok(text),
            Content::Binary(_) => panic!("contents() called on a binary file: {}", self.relative_path),
        }
    }

    /// Forces a load and returns whether the file is binary.
    pub fn is_binary(&mut self) -> Result<bool> {
        self.load()?;
        Ok(!self.is_unicode)
    }

    /// The current in-memory text, if content has already been loaded and
    /// is unicode. Unlike `contents()`, this never forces a load — it is
    /// meant for the emitter, which runs after the dispatcher has already
    /// forced every non-excluded file through `is_binary()`/`contents()`.
    pub fn current_text(&self) -> Option<&str> {
        match self.content.as_ref() {
            Some(Content::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Literal substring replacement over the full text, all occurrences.
    /// Sets `is_modified` only if the text actually changed.
    pub fn rewrite(&mut self, old: &str, new: &str) -> Result<()> {
        self.load()?;
        if old.is_empty() {
            return Ok(());
        }
        if let Some(Content::Text(text)) = self.content.as_mut() {
            if text.contains(old) {
                *text = text.replace(old, new);
                self.is_modified = true;
            }
        }
        Ok(())
    }

    /// Replaces the whole text. Sets `is_modified` only when the text
    /// actually changes.
    pub fn write_contents(&mut self, new_text: String) -> Result<()> {
        self.load()?;
        match self.content.as_mut() {
            Some(Content::Text(text)) => {
                if *text != new_text {
                    *text = new_text;
                    self.is_modified = true;
                }
            }
            _ => {
                self.content = Some(Content::Text(new_text));
                self.is_unicode = true;
                self.is_modified = true;
            }
        }
        Ok(())
    }

    /// Marks the file as deleted: content becomes empty, `is_modified` is
    /// set. Dispatch stops running further rules against a deleted file.
    pub fn delete(&mut self) {
        self.is_deleted = true;
        self.is_modified = true;
        self.content = Some(Content::Text(String::new()));
        self.is_unicode = true;
    }

    /// The original on-disk POSIX mode, captured the first time it is
    /// queried. On non-Unix targets this always returns `None` and callers
    /// fall back to the platform default when writing.
    pub fn set_original_mode(&mut self, mode: Option<u32>) {
        self.mode = mode;
    }

    /// Computes the mode to write back: `rw` base, with `x` added to
    /// user/group/other if the original file had any execute bit, mirroring
    /// the triad across all three classes.
    pub fn output_mode(&self) -> Option<u32> {
        self.mode.map(|original| {
            let executable = original & 0o111 != 0;
            let base: u32 = if executable { 0o7 } else { 0o6 };
            base + (base << 3) + (base << 6)
        })
    }

    /// Materializes the (possibly original) content to `path` using the
    /// computed mode. When `original` is true, re-reads the source file
    /// from disk instead of using the in-memory buffer, satisfying the
    /// emitter's need for a byte-identical `originals/` tree even after the
    /// in-memory buffer has been mutated.
    pub fn write_to(&self, path: &Path, original: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes: Vec<u8> = if original {
            fs::read(&self.absolute_path)?
        } else if self.is_deleted {
            Vec::new()
        } else {
            match self.content.as_ref() {
                Some(Content::Text(text)) => text.as_bytes().to_vec(),
                Some(Content::Binary(bytes)) => bytes.clone(),
                None => fs::read(&self.absolute_path)?,
            }
        };
        fs::write(path, &bytes)?;
        #[cfg(unix)]
        if let Some(mode) = self.output_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
        }
        Ok(())
    }

    /// Path to a file on disk whose bytes equal the current in-memory
    /// contents: the original path if unmodified, else a fresh file under
    /// the scratch directory.
    pub fn contents_filename(&mut self) -> Result<PathBuf> {
        if !self.is_modified {
            return Ok(self.absolute_path.clone());
        }
        self.load()?;
        let scratch_path = self.scratch_dir.join(&self.relative_path);
        if let Some(parent) = scratch_path.parent() {
            fs::create_dir_all(parent)?;
        }
        match self.content.as_ref().unwrap() {
            Content::Text(text) => fs::write(&scratch_path, text.as_bytes())?,
            Content::Binary(bytes) => fs::write(&scratch_path, bytes)?,
        }
        Ok(scratch_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_file(dir: &TempDir, name: &str, contents: &[u8]) -> ScannedFile {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        ScannedFile::new(path, name.to_string(), dir.path().join("scratch"))
    }

    #[test]
    fn contents_loads_lazily_and_caches() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(&dir, "a.txt", b"hello world");
        assert_eq!(file.contents().unwrap(), "hello world");
        assert!(!file.is_modified());
    }

    #[test]
    fn rewrite_sets_modified_only_on_change() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(&dir, "a.txt", b"hello world");
        file.rewrite("nope", "x").unwrap();
        assert!(!file.is_modified());
        file.rewrite("world", "there").unwrap();
        assert!(file.is_modified());
        assert_eq!(file.contents().unwrap(), "hello there");
    }

    #[test]
    fn delete_empties_content_and_marks_modified() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(&dir, "a.txt", b"hello world");
        file.delete();
        assert!(file.is_deleted());
        assert!(file.is_modified());
        assert_eq!(file.contents().unwrap(), "");
    }

    #[test]
    fn binary_file_is_detected() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(&dir, "a.bin", &[0xff, 0xfe, 0x00, 0x10]);
        assert!(file.is_binary().unwrap());
    }

    #[test]
    fn output_mode_mirrors_execute_bit_to_all_classes() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(&dir, "a.sh", b"#!/bin/sh\n");
        file.set_original_mode(Some(0o744));
        assert_eq!(file.output_mode(), Some(0o777));
        file.set_original_mode(Some(0o644));
        assert_eq!(file.output_mode(), Some(0o666));
    }

    #[test]
    fn contents_filename_returns_original_path_when_unmodified() {
        let dir = TempDir::new().unwrap();
        let mut file = make_file(&dir, "a.txt", b"hello");
        let path = file.contents_filename().unwrap();
        assert_eq!(path, dir.path().join("a.txt"));
    }
}
