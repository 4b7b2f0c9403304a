//! Error types for codegen-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid manual section name {name:?}: names may only contain ASCII letters, digits, '_', '-', '.', and ':'")]
    InvalidRegionName { name: String },

    #[error("Corrupt manual section markers at line {line}: {message}")]
    CorruptRegion { line: usize, message: String },

    #[error("Manual section {name:?} appears more than once")]
    DuplicateRegion { name: String },
}

impl Error {
    pub(crate) fn corrupt(line: usize, message: impl Into<String>) -> Self {
        Self::CorruptRegion {
            line,
            message: message.into(),
        }
    }
}
