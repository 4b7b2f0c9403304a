//! Filesystem primitives for signed code generation
//!
//! Reads that tolerate a missing target and atomic writes that skip
//! byte-identical content.

pub mod error;
pub mod io;

pub use error::{Error, Result};
pub use io::{
    WriteOutcome, read_text_if_exists, write_atomic, write_if_changed, write_if_changed_from,
};
