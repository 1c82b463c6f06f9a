use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use similar::TextDiff;

use crate::context::Context;
use crate::errors::{Error, Result};
use crate::findings::Finding;
use crate::scanned_file::ScannedFile;

/// Which side-artifacts to produce in addition to `output/`, per spec.md
/// §6's filesystem layout and CLI surface.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub modify_in_place: bool,
    pub output_tar: Option<PathBuf>,
}

/// Writes `output/`, `originals/`, `modified/`, `diffs/` under a scratch
/// root, plus the optional in-place overwrite and tar archive, per spec.md
/// §4.11. Per-file writes are independent of one another and run in
/// parallel (the teacher's idiom, via `rayon`); `Context` mutation (finding
/// collection) is serialized afterward, matching spec.md §5's parallel-emit
/// allowance.
pub struct Emitter<'a> {
    root: &'a Path,
}

impl<'a> Emitter<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn originals_dir(&self) -> PathBuf {
        self.root.join("originals")
    }

    pub fn modified_dir(&self) -> PathBuf {
        self.root.join("modified")
    }

    pub fn diffs_dir(&self) -> PathBuf {
        self.root.join("diffs")
    }

    /// Writes every artifact for `files`, recording any per-file or
    /// archive/in-place failure as a `Finding` rather than aborting the run,
    /// per spec.md §7 ("failure of the emitter's diff/tar is recorded as a
    /// finding and the run continues").
    pub fn emit(&self, files: &[ScannedFile], ctx: &mut Context, options: &EmitOptions) -> Result<()> {
        fs::create_dir_all(self.output_dir())?;
        if files.iter().any(|f| f.is_modified()) {
            fs::create_dir_all(self.originals_dir())?;
            fs::create_dir_all(self.modified_dir())?;
            fs::create_dir_all(self.diffs_dir())?;
        }

        let findings: Vec<Finding> = files.par_iter().filter_map(|file| self.emit_one(file).err()).collect();
        for finding in findings {
            ctx.add_finding(finding);
        }

        if options.modify_in_place {
            for file in files {
                if let Err(err) = self.write_in_place(file) {
                    ctx.add_finding(Finding::from_message(
                        file.relative_path(),
                        format!("in-place write failed: {err}"),
                    ));
                }
            }
        }

        if let Some(tar_path) = &options.output_tar {
            if let Err(err) = self.write_tar(tar_path) {
                ctx.add_finding(Finding::from_message("", format!("tar archive failed: {err}")));
            }
        }

        Ok(())
    }

    fn emit_one(&self, file: &ScannedFile) -> std::result::Result<(), Finding> {
        let to_finding = |context: &str, err: Error| {
            Finding::from_message(file.relative_path(), format!("{context}: {err}"))
        };

        if !file.is_deleted() {
            let output_path = self.output_dir().join(file.output_relative_path());
            file.write_to(&output_path, false)
                .map_err(|e| to_finding("failed to write output", e))?;
        }

        if !file.is_modified() {
            return Ok(());
        }

        let originals_path = self.originals_dir().join(file.relative_path());
        file.write_to(&originals_path, true)
            .map_err(|e| to_finding("failed to write originals", e))?;

        if !file.is_deleted() {
            let modified_path = self.modified_dir().join(file.output_relative_path());
            file.write_to(&modified_path, false)
                .map_err(|e| to_finding("failed to write modified", e))?;
        }

        self.write_diff(file).map_err(|e| to_finding("failed to write diff", e))
    }

    /// Computes a unified diff between the on-disk original and the
    /// in-memory modified content, per spec.md §4.11 and the fixed-point
    /// invariant in §8 (`diffs/F` equals `diff(originals/F, modified/F)`).
    /// A deleted file's modified side is empty content under a `/dev/null`
    /// header on the modified side.
    fn write_diff(&self, file: &ScannedFile) -> Result<()> {
        let original_text = fs::read_to_string(file.absolute_path())?;
        let modified_text = file.current_text().unwrap_or("");

        let original_label = format!("originals/{}", file.relative_path());
        let modified_label = if file.is_deleted() {
            "/dev/null".to_string()
        } else {
            format!("modified/{}", file.output_relative_path())
        };

        let diff = TextDiff::from_lines(original_text.as_str(), modified_text);
        let unified = diff
            .unified_diff()
            .header(&original_label, &modified_label)
            .to_string();

        let diff_path = self.diffs_dir().join(file.relative_path());
        if let Some(parent) = diff_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(diff_path, unified)?;
        Ok(())
    }

    /// Overwrites the original file atomically (`write .tmp` then `rename`)
    /// or unlinks it if deleted, per spec.md §4.11's in-place modification.
    fn write_in_place(&self, file: &ScannedFile) -> Result<()> {
        if file.is_deleted() {
            if file.absolute_path().exists() {
                fs::remove_file(file.absolute_path())?;
            }
            return Ok(());
        }
        if !file.is_modified() {
            return Ok(());
        }
        let mut tmp_name = file.absolute_path().as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        file.write_to(&tmp_path, false)?;
        fs::rename(&tmp_path, file.absolute_path())?;
        Ok(())
    }

    /// Archives the `output/` tree byte-for-byte into `tar_path`, per
    /// spec.md §6.
    fn write_tar(&self, tar_path: &Path) -> Result<()> {
        if let Some(parent) = tar_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tar_file = fs::File::create(tar_path)?;
        let mut builder = tar::Builder::new(tar_file);
        builder
            .append_dir_all(".", self.output_dir())
            .map_err(|e| Error::Archive(e.to_string()))?;
        builder.finish().map_err(|e| Error::Archive(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Whitelist;
    use tempfile::TempDir;

    fn ctx(scratch: &Path) -> Context {
        Context::new(scratch.to_path_buf(), Whitelist::default())
    }

    fn make_file(dir: &TempDir, name: &str, contents: &str) -> ScannedFile {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        ScannedFile::new(path, name.to_string(), dir.path().join("scratch"))
    }

    #[test]
    fn unmodified_file_is_copied_without_a_diff() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("run");
        let mut file = make_file(&dir, "a.txt", "hello\n");
        file.contents().unwrap();

        let emitter = Emitter::new(&root);
        let mut context = ctx(&root);
        emitter.emit(&[file], &mut context, &EmitOptions::default()).unwrap();

        assert!(emitter.output_dir().join("a.txt").exists());
        assert!(!emitter.diffs_dir().exists());
    }

    #[test]
    fn modified_file_gets_originals_modified_and_diff() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("run");
        let mut file = make_file(&dir, "a.txt", "hello\n");
        file.write_contents("goodbye\n".to_string()).unwrap();

        let emitter = Emitter::new(&root);
        let mut context = ctx(&root);
        emitter.emit(&[file], &mut context, &EmitOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(emitter.output_dir().join("a.txt")).unwrap(), "goodbye\n");
        assert_eq!(fs::read_to_string(emitter.originals_dir().join("a.txt")).unwrap(), "hello\n");
        assert_eq!(fs::read_to_string(emitter.modified_dir().join("a.txt")).unwrap(), "goodbye\n");
        let diff = fs::read_to_string(emitter.diffs_dir().join("a.txt")).unwrap();
        assert!(diff.contains("-hello"));
        assert!(diff.contains("+goodbye"));
    }

    #[test]
    fn deleted_file_is_absent_from_output_but_diffed_against_dev_null() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("run");
        let mut file = make_file(&dir, "a.txt", "hello\n");
        file.delete();

        let emitter = Emitter::new(&root);
        let mut context = ctx(&root);
        emitter.emit(&[file], &mut context, &EmitOptions::default()).unwrap();

        assert!(!emitter.output_dir().join("a.txt").exists());
        let diff = fs::read_to_string(emitter.diffs_dir().join("a.txt")).unwrap();
        assert!(diff.contains("/dev/null"));
    }

    #[test]
    fn in_place_modification_overwrites_the_source_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("run");
        let mut file = make_file(&dir, "a.txt", "hello\n");
        let source_path = file.absolute_path().to_path_buf();
        file.write_contents("goodbye\n".to_string()).unwrap();

        let emitter = Emitter::new(&root);
        let mut context = ctx(&root);
        let options = EmitOptions {
            modify_in_place: true,
            output_tar: None,
        };
        emitter.emit(&[file], &mut context, &options).unwrap();

        assert_eq!(fs::read_to_string(&source_path).unwrap(), "goodbye\n");
    }
}
