//! Deciding how a fresh generation combines with the previous file.
//!
//! | Previous file                     | Result                                  |
//! |-----------------------------------|-----------------------------------------|
//! | missing                           | fresh signed text                       |
//! | present, no signature             | [`Error::NoSignature`]                  |
//! | present, signature does not match | [`Error::BadSignature`] / [`Error::CorruptRegion`] |
//! | valid, fully generated            | fresh signed text                       |
//! | valid, partially generated        | fresh text with old manual sections spliced in |
//!
//! Unsigned documents go through the same table; they only skip the final
//! signing step. Since their own output carries no signature, an unsigned
//! file is only accepted as-is when it already holds exactly the new
//! content. Documents marked [`with_clobber`] replace whatever is on disk.
//!
//! [`with_clobber`]: GeneratedDocument::with_clobber

use crate::config::CodegenConfig;
use crate::document::GeneratedDocument;
use crate::formatter::Formatter;
use crate::signature::{FileKind, SignatureCodec, SignatureVerdict};
use crate::{Error, Result};
use codegen_blocks::{extract_all, splice_regions};

/// Manual content that had no place in the new generation.
///
/// Not an error: the merge still succeeds, but the caller must surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRegion {
    pub name: String,
    pub content: String,
}

/// What the merge did with the previous file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// No previous file.
    Created,
    /// Previous fully generated file replaced.
    Regenerated,
    /// Manual sections of the previous file carried over.
    Merged,
    /// Previous file replaced without inspection, as the document asked.
    Clobbered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Final text; signed unless the document is unsigned.
    pub content: String,
    pub kind: FileKind,
    pub action: MergeAction,
    pub dropped: Vec<DroppedRegion>,
}

/// Combines a [`GeneratedDocument`] with the previous content of its file.
pub struct MergeEngine<'a> {
    config: &'a CodegenConfig,
    codec: SignatureCodec,
    formatter: Option<&'a dyn Formatter>,
}

impl<'a> MergeEngine<'a> {
    pub fn new(config: &'a CodegenConfig) -> Self {
        Self {
            config,
            codec: SignatureCodec::new(config.region_marker()),
            formatter: None,
        }
    }

    pub fn with_formatter(mut self, formatter: &'a dyn Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Produce the text to write for `doc`, given the file's current
    /// content (`None` if it does not exist).
    ///
    /// # Errors
    /// Refuses with [`Error::NoSignature`], [`Error::BadSignature`], or
    /// [`Error::CorruptRegion`] when `old` cannot be replaced safely.
    /// Formatter and signing failures are passed on.
    pub fn merge(&self, doc: &GeneratedDocument, old: Option<&str>) -> Result<MergeOutcome> {
        let kind = doc.kind(&self.config.region_marker());
        let rendered = doc.render(self.config);

        let (merged, action, dropped) = match old {
            None => (rendered, MergeAction::Created, Vec::new()),
            Some(_) if doc.clobbers() => {
                tracing::debug!(path = %doc.path().display(), "Clobbering previous content");
                (rendered, MergeAction::Clobbered, Vec::new())
            }
            Some(old) => self.reconcile(doc, kind, old, rendered)?,
        };

        for region in &dropped {
            tracing::warn!(
                path = %doc.path().display(),
                section = %region.name,
                "Manual section is no longer generated; its content is dropped"
            );
        }

        let content = self.finish(doc, kind, merged)?;
        tracing::debug!(path = %doc.path().display(), ?action, %kind, "Merged document");

        Ok(MergeOutcome {
            content,
            kind,
            action,
            dropped,
        })
    }

    fn reconcile(
        &self,
        doc: &GeneratedDocument,
        kind: FileKind,
        old: &str,
        rendered: String,
    ) -> Result<(String, MergeAction, Vec<DroppedRegion>)> {
        let marker = self.config.region_marker();
        let path = doc.path().to_path_buf();

        match self.codec.verify(old) {
            SignatureVerdict::Absent => {
                // Unsigned output has no token to check; only an exact match is ours
                if !doc.is_signed() && self.finish(doc, kind, rendered.clone())? == old {
                    Ok((rendered, MergeAction::Regenerated, Vec::new()))
                } else {
                    Err(Error::NoSignature { path })
                }
            }
            SignatureVerdict::Invalid(FileKind::PartiallyGenerated) => {
                match extract_all(old, &marker) {
                    Err(source) => Err(Error::CorruptRegion { path, source }),
                    Ok(_) => Err(Error::BadSignature { path }),
                }
            }
            SignatureVerdict::Invalid(FileKind::Generated) => Err(Error::BadSignature { path }),
            SignatureVerdict::Valid(FileKind::Generated) => {
                Ok((rendered, MergeAction::Regenerated, Vec::new()))
            }
            SignatureVerdict::Valid(FileKind::PartiallyGenerated) => {
                let regions = extract_all(old, &marker)
                    .map_err(|source| Error::CorruptRegion { path, source })?;
                let splice = splice_regions(&rendered, &marker, &regions)?;
                let dropped = splice
                    .dropped
                    .into_iter()
                    .map(|region| DroppedRegion {
                        name: region.name,
                        content: region.content,
                    })
                    .collect();
                Ok((splice.text, MergeAction::Merged, dropped))
            }
        }
    }

    /// Format, then sign if the document is signed.
    fn finish(&self, doc: &GeneratedDocument, kind: FileKind, text: String) -> Result<String> {
        let formatted = self.format(doc, text)?;
        if doc.is_signed() {
            self.codec.sign(kind, &formatted)
        } else {
            Ok(formatted)
        }
    }

    fn format(&self, doc: &GeneratedDocument, text: String) -> Result<String> {
        let Some(formatter) = self.formatter else {
            return Ok(text);
        };
        let extension = doc.path().extension().and_then(|ext| ext.to_str());
        formatter
            .format(&text, extension)
            .map_err(|source| Error::Formatter {
                path: doc.path().to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::FormatterError;

    fn partial_body(content: &str) -> String {
        format!(
            "function extra(): int {{\n/* BEGIN MANUAL SECTION Extra */\n{content}\n/* END MANUAL SECTION */\n}}\n"
        )
    }

    #[test]
    fn unsigned_documents_carry_no_token() {
        let config = CodegenConfig::default();
        let doc = GeneratedDocument::new("out.txt", "plain").with_signature(false);
        let outcome = MergeEngine::new(&config).merge(&doc, None).unwrap();
        assert_eq!(outcome.action, MergeAction::Created);
        assert_eq!(outcome.content, "plain\n");
    }

    #[test]
    fn unsigned_documents_refuse_foreign_content() {
        let config = CodegenConfig::default();
        let doc = GeneratedDocument::new("out.txt", "plain").with_signature(false);
        let err = MergeEngine::new(&config)
            .merge(&doc, Some("anything at all"))
            .unwrap_err();
        assert!(matches!(err, Error::NoSignature { .. }));
    }

    #[test]
    fn unsigned_documents_accept_their_own_output() {
        let config = CodegenConfig::default();
        let doc = GeneratedDocument::new("out.txt", "plain").with_signature(false);
        let outcome = MergeEngine::new(&config)
            .merge(&doc, Some("plain\n"))
            .unwrap();
        assert_eq!(outcome.action, MergeAction::Regenerated);
        assert_eq!(outcome.content, "plain\n");
    }

    #[test]
    fn unsigned_documents_keep_manual_sections_of_a_signed_file() {
        let config = CodegenConfig::default();
        let engine = MergeEngine::new(&config);
        let signed = engine
            .merge(&GeneratedDocument::new("a.php", partial_body("// TODO")), None)
            .unwrap();
        let edited = signed.content.replace("// TODO", "return 42;");

        let unsigned = GeneratedDocument::new("a.php", "plain\n").with_signature(false);
        let outcome = engine.merge(&unsigned, Some(&edited)).unwrap();
        assert_eq!(outcome.action, MergeAction::Merged);
        assert_eq!(
            outcome.dropped,
            vec![DroppedRegion {
                name: "Extra".to_string(),
                content: "return 42;\n".to_string(),
            }]
        );
        assert!(!SignatureCodec::is_signed(&outcome.content));
    }

    #[test]
    fn clobber_replaces_anything() {
        let config = CodegenConfig::default();
        let doc = GeneratedDocument::new("out.txt", "plain")
            .with_signature(false)
            .with_clobber(true);
        let outcome = MergeEngine::new(&config)
            .merge(&doc, Some("hand written"))
            .unwrap();
        assert_eq!(outcome.action, MergeAction::Clobbered);
        assert_eq!(outcome.content, "plain\n");
    }

    #[test]
    fn formatter_runs_before_signing() {
        let config = CodegenConfig::default();
        let shout = |source: &str, _: Option<&str>| -> std::result::Result<String, FormatterError> {
            Ok(source.replace("return", "RETURN"))
        };
        let doc = GeneratedDocument::new("a.php", partial_body("return 1;"));
        let outcome = MergeEngine::new(&config)
            .with_formatter(&shout)
            .merge(&doc, None)
            .unwrap();

        assert!(outcome.content.contains("RETURN 1;"));
        assert_eq!(
            SignatureCodec::new(config.region_marker()).verify(&outcome.content),
            SignatureVerdict::Valid(FileKind::PartiallyGenerated)
        );
    }

    #[test]
    fn formatter_failure_names_the_file() {
        let config = CodegenConfig::default();
        let broken = |_: &str, _: Option<&str>| -> std::result::Result<String, FormatterError> {
            Err(FormatterError::Rejected("syntax error".to_string()))
        };
        let doc = GeneratedDocument::new("gen/a.php", "x\n");
        let err = MergeEngine::new(&config)
            .with_formatter(&broken)
            .merge(&doc, None)
            .unwrap_err();
        assert!(matches!(err, Error::Formatter { ref path, .. } if path.ends_with("a.php")));
    }

    #[test]
    fn formatter_dropping_the_token_fails_signing() {
        let config = CodegenConfig::default();
        let strip = |_: &str, _: Option<&str>| -> std::result::Result<String, FormatterError> {
            Ok("stripped\n".to_string())
        };
        let doc = GeneratedDocument::new("a.php", "x\n");
        let err = MergeEngine::new(&config)
            .with_formatter(&strip)
            .merge(&doc, None)
            .unwrap_err();
        assert!(matches!(err, Error::SigningToken { found: 0, .. }));
    }
}
