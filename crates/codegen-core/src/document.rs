//! The text product of one generation pass for one file.

use crate::config::CodegenConfig;
use crate::signature::{FileKind, SignatureCodec};
use codegen_blocks::RegionMarker;
use std::path::{Path, PathBuf};

const GENERATED_NOTICE: &[&str] = &["This file is generated. Do not modify it manually!"];
const PARTIALLY_GENERATED_NOTICE: &[&str] = &[
    "This file is partially generated. Only make modifications between BEGIN",
    "MANUAL SECTION and END MANUAL SECTION designators.",
];

/// A generated file before it is merged with what is on disk.
///
/// Built once per run from the generator's body text; options are applied
/// with the consuming `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    path: PathBuf,
    body: String,
    signed: bool,
    clobber: bool,
    kind: Option<FileKind>,
    doc_comment: Option<String>,
    preamble: Option<String>,
}

impl GeneratedDocument {
    /// A signed document whose kind is detected from its body.
    pub fn new(path: impl Into<PathBuf>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
            signed: true,
            clobber: false,
            kind: None,
            doc_comment: None,
            preamble: None,
        }
    }

    /// Force the file kind instead of detecting it.
    pub fn with_kind(mut self, kind: FileKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Unsigned documents carry no signing token. The file on disk is
    /// still checked before it is replaced.
    pub fn with_signature(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Replace the file on disk whatever it holds, even hand-written or
    /// tampered content.
    pub fn with_clobber(mut self, clobber: bool) -> Self {
        self.clobber = clobber;
        self
    }

    /// Extra text for the leading doc-block.
    pub fn with_doc_comment(mut self, comment: impl Into<String>) -> Self {
        self.doc_comment = Some(comment.into());
        self
    }

    /// A line emitted before the doc-block, such as a shebang.
    pub fn with_preamble(mut self, line: impl Into<String>) -> Self {
        self.preamble = Some(line.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn clobbers(&self) -> bool {
        self.clobber
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    /// The forced kind, or partially generated if the body has a manual
    /// section.
    pub fn kind(&self, marker: &RegionMarker) -> FileKind {
        self.kind.unwrap_or_else(|| {
            if marker.contains_manual_section(&self.body) {
                FileKind::PartiallyGenerated
            } else {
                FileKind::Generated
            }
        })
    }

    /// The full unsigned text: preamble, doc-block with the signing
    /// placeholder, then the body.
    pub fn render(&self, config: &CodegenConfig) -> String {
        let kind = self.kind(&config.region_marker());
        let mut lines: Vec<String> = config.file_header.clone();

        if self.signed {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            let notice = match kind {
                FileKind::Generated => GENERATED_NOTICE,
                FileKind::PartiallyGenerated => PARTIALLY_GENERATED_NOTICE,
            };
            lines.extend(notice.iter().map(|line| line.to_string()));
        }

        if let Some(comment) = self.doc_comment.as_deref().filter(|c| !c.trim().is_empty()) {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.extend(comment.trim_end().lines().map(str::to_string));
        }

        if self.signed {
            lines.push(String::new());
            lines.push(SignatureCodec::signing_token(kind));
        }

        let mut out = String::new();
        if let Some(preamble) = &self.preamble {
            out.push_str(preamble);
            out.push('\n');
        }
        if !lines.is_empty() {
            out.push_str(&config.comment_style.comment_block(&lines));
            out.push('\n');
        }
        out.push_str(&self.body);
        if !self.body.is_empty() && !self.body.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}
