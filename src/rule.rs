use crate::context::Context;
use crate::errors::Result;
use crate::scanned_file::ScannedFile;

/// A rule that accepts a single file and the run context, may mutate the
/// file, and may append findings. Comment rules, line rules, and
/// whole-file rules are all `PerFileRule`s.
pub trait PerFileRule: Send + Sync {
    fn scrub_file(&self, file: &mut ScannedFile, ctx: &mut Context) -> Result<()>;

    /// A short, stable name used only for diagnostics (`tracing` spans);
    /// never surfaced in findings (those carry their own `filter` string).
    fn name(&self) -> &str;
}

/// A rule that observes the set of files sharing an extension, run either
/// before per-file rules (pre-batch) or after (post-batch).
pub trait BatchRule: Send + Sync {
    fn batch_scrub(&self, files: &mut [&mut ScannedFile], ctx: &mut Context) -> Result<()>;

    fn name(&self) -> &str;
}

/// Adapts a `PerFileRule` to run as a `BatchRule` by iterating the batch.
/// Grounded in the original's pre-batch comment stack, which is "applied
/// per file but declared as pre-batch" for language families whose
/// comment scrubbing must run before other per-file rules see the text.
pub struct PerFileAsBatch<R: PerFileRule> {
    inner: R,
}

impl<R: PerFileRule> PerFileAsBatch<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: PerFileRule> BatchRule for PerFileAsBatch<R> {
    fn batch_scrub(&self, files: &mut [&mut ScannedFile], ctx: &mut Context) -> Result<()> {
        for file in files.iter_mut() {
            if file.is_deleted() {
                continue;
            }
            self.inner.scrub_file(file, ctx)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
