//! Saving documents to disk.

use crate::Result;
use crate::config::CodegenConfig;
use crate::document::GeneratedDocument;
use crate::formatter::{CommandFormatter, Formatter};
use crate::merge::{DroppedRegion, MergeAction, MergeEngine, MergeOutcome};
use codegen_fs::{WriteOutcome, read_text_if_exists, write_if_changed_from};
use similar::TextDiff;
use std::path::PathBuf;

/// What happened to the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Created,
    Updated,
    /// Content was byte-identical; the file was not touched.
    Unchanged,
}

impl From<WriteOutcome> for SaveStatus {
    fn from(outcome: WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Created => Self::Created,
            WriteOutcome::Updated => Self::Updated,
            WriteOutcome::Unchanged => Self::Unchanged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    /// For dry runs, the status a real save would have had.
    pub status: SaveStatus,
    pub action: MergeAction,
    /// Manual sections whose content was not carried over.
    pub dropped: Vec<DroppedRegion>,
    pub dry_run: bool,
    /// Unified diff against the current file; only set for dry runs that
    /// would change something.
    pub diff: Option<String>,
}

/// Merges documents with their files and writes the result atomically.
///
/// A file is only touched when its content actually changes, and never
/// when the merge refuses.
pub struct FileWriter {
    config: CodegenConfig,
    formatter: Option<Box<dyn Formatter>>,
    dry_run: bool,
}

impl FileWriter {
    /// A writer using the formatter named in `config`, if any.
    pub fn new(config: CodegenConfig) -> Self {
        let formatter = config
            .formatter
            .as_ref()
            .map(|f| Box::new(CommandFormatter::from_config(f)) as Box<dyn Formatter>);
        Self {
            config,
            formatter,
            dry_run: false,
        }
    }

    /// Replace the configured formatter.
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Compute everything but leave the filesystem alone.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    fn engine(&self) -> MergeEngine<'_> {
        let engine = MergeEngine::new(&self.config);
        match self.formatter.as_deref() {
            Some(formatter) => engine.with_formatter(formatter),
            None => engine,
        }
    }

    /// The text [`save`](Self::save) would write, given `old` as the
    /// current file content.
    pub fn render(&self, doc: &GeneratedDocument, old: Option<&str>) -> Result<MergeOutcome> {
        self.engine().merge(doc, old)
    }

    /// Merge `doc` with its file and write the result.
    ///
    /// # Errors
    /// Refusals from the merge leave the file untouched. I/O errors are
    /// reported with the offending path.
    pub fn save(&self, doc: &GeneratedDocument) -> Result<SaveReport> {
        let path = doc.path();
        let old = read_text_if_exists(path)?;
        let outcome = self.render(doc, old.as_deref())?;

        // Compare against the snapshot the merge was based on
        let (status, diff) = if self.dry_run {
            let status = SaveStatus::from(WriteOutcome::between(old.as_deref(), &outcome.content));
            let diff = (status != SaveStatus::Unchanged).then(|| {
                let label = path.display().to_string();
                TextDiff::from_lines(old.as_deref().unwrap_or(""), &outcome.content)
                    .unified_diff()
                    .header(&label, &label)
                    .to_string()
            });
            (status, diff)
        } else {
            let written = write_if_changed_from(path, old.as_deref(), &outcome.content)?;
            (written.into(), None)
        };

        tracing::info!(
            path = %path.display(),
            ?status,
            action = ?outcome.action,
            dry_run = self.dry_run,
            "Saved generated file"
        );

        Ok(SaveReport {
            path: path.to_path_buf(),
            status,
            action: outcome.action,
            dropped: outcome.dropped,
            dry_run: self.dry_run,
            diff,
        })
    }

    /// Save every document, continuing past failures.
    ///
    /// Results come back in input order.
    pub fn save_all<'d, I>(&self, docs: I) -> Vec<Result<SaveReport>>
    where
        I: IntoIterator<Item = &'d GeneratedDocument>,
    {
        docs.into_iter()
            .map(|doc| {
                let result = self.save(doc);
                if let Err(e) = &result {
                    tracing::error!(path = %doc.path().display(), error = %e, "Failed to save generated file");
                }
                result
            })
            .collect()
    }
}
