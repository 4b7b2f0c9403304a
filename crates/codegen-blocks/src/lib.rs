//! Manual-section handling for partially generated files.
//!
//! A partially generated file interleaves generator-owned text with named
//! manual sections that a developer may edit:
//!
//! ```text
//! /* BEGIN MANUAL SECTION Demo::getName */
//! return $this->name;
//! /* END MANUAL SECTION */
//! ```
//!
//! This crate produces the marker lines ([`RegionMarker`]), extracts the
//! sections from existing text ([`extract_all`]), strips their content for
//! hashing ([`strip_manual_content`]), and carries them into freshly
//! generated text ([`splice_regions`]). The comment delimiters around the
//! markers follow a [`CommentStyle`].

pub mod error;
pub mod marker;
pub mod parser;
pub mod style;
pub mod writer;

pub use error::{Error, Result};
pub use marker::{RegionMarker, validate_region_name};
pub use parser::{ManualRegion, extract_all, find_region, strip_manual_content};
pub use style::CommentStyle;
pub use writer::{Splice, splice_regions};
