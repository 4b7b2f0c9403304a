//! Signed generated source files that survive regeneration.
//!
//! - [`TextAssembler`] builds the body text with indentation tracking and
//!   width-aware line breaking.
//! - [`GeneratedDocument`] wraps a body with its doc-block and signing token.
//! - [`SignatureCodec`] signs text and tells valid, tampered, and unsigned
//!   files apart.
//! - [`MergeEngine`] decides whether the previous file may be replaced and
//!   carries its manual sections over.
//! - [`FileWriter`] runs the merge and writes the result atomically, only
//!   when it changes.
//!
//! ```no_run
//! use codegen_core::{CodegenConfig, FileWriter, GeneratedDocument, TextAssembler};
//!
//! # fn main() -> codegen_core::Result<()> {
//! let config = CodegenConfig::default();
//! let mut body = TextAssembler::new(&config);
//! body.append_line("function extra(): int {").indent();
//! body.manual_section("Extra", "// TODO")?;
//! body.unindent().append_line("}");
//!
//! let doc = GeneratedDocument::new("gen/extra.php", body.finalize());
//! let report = FileWriter::new(config).save(&doc)?;
//! println!("{:?}", report.status);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod config;
pub mod document;
pub mod error;
pub mod formatter;
pub mod logging;
pub mod merge;
pub mod signature;
pub mod writer;

pub use assembler::{SUGGESTED_BREAK, TextAssembler, pack_segments};
pub use config::{CodegenConfig, FormatterConfig};
pub use document::GeneratedDocument;
pub use error::{Error, Result};
pub use formatter::{CommandFormatter, Formatter, FormatterError};
pub use merge::{DroppedRegion, MergeAction, MergeEngine, MergeOutcome};
pub use signature::{FileKind, HASH_LEN, SignatureCodec, SignatureVerdict};
pub use writer::{FileWriter, SaveReport, SaveStatus};

// Re-export the lower layers so generators need only one dependency
pub use codegen_blocks::{self as blocks, CommentStyle, ManualRegion, RegionMarker};
pub use codegen_fs as fs;
