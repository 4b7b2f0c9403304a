//! Error types for codegen-core

use crate::formatter::FormatterError;
use crate::signature::FileKind;
use std::path::PathBuf;

/// Result type for codegen-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering, merging, or saving a document.
///
/// The first three variants are refusals: the file on disk cannot be
/// regenerated without losing someone's work, so nothing is written.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target exists but carries no signature, i.e. it was written by hand.
    #[error("Refusing to overwrite {path}: the file exists but carries no signature")]
    NoSignature { path: PathBuf },

    /// The target is signed but its generated parts no longer match the signature.
    #[error(
        "Refusing to overwrite {path}: the signature does not match; generated code was edited outside a manual section or the file is corrupt"
    )]
    BadSignature { path: PathBuf },

    /// The target's manual-section markers cannot be paired up.
    #[error("Refusing to overwrite {path}: {source}")]
    CorruptRegion {
        path: PathBuf,
        #[source]
        source: codegen_blocks::Error,
    },

    /// Rendered text did not contain exactly one signing placeholder.
    #[error("Expected exactly one {kind} signing token in the rendered text, found {found}")]
    SigningToken { kind: FileKind, found: usize },

    #[error("Formatter failed for {path}: {source}")]
    Formatter {
        path: PathBuf,
        #[source]
        source: FormatterError,
    },

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Manual-section error in freshly generated text
    #[error(transparent)]
    Blocks(#[from] codegen_blocks::Error),

    /// Filesystem error from codegen-fs
    #[error(transparent)]
    Fs(#[from] codegen_fs::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error protects on-disk content from being clobbered.
    ///
    /// Such errors need a human decision; regenerating again will not help.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::NoSignature { .. } | Self::BadSignature { .. } | Self::CorruptRegion { .. }
        )
    }
}
