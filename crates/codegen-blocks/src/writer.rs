//! Carrying manual sections from an old text into a freshly generated one.

use crate::error::Result;
use crate::marker::RegionMarker;
use crate::parser::{ManualRegion, Piece, scan};
use std::collections::HashSet;

/// Result of [`splice_regions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// The new text with preserved manual content spliced in.
    pub text: String,
    /// Old sections whose name no longer exists in the new text.
    pub dropped: Vec<ManualRegion>,
}

/// Replace the content of each manual section in `new_text` with the content
/// of the same-named section in `old_regions`.
///
/// Sections of the new text with no old counterpart keep the content the
/// generator produced. Old sections with no counterpart are returned in
/// [`Splice::dropped`] in their original order; the caller decides how to
/// surface the loss.
///
/// # Errors
/// Fails if `new_text` itself has unbalanced markers or duplicate names.
///
/// # Example
/// ```
/// use codegen_blocks::{ManualRegion, RegionMarker, splice_regions};
///
/// let marker = RegionMarker::default();
/// let old = vec![ManualRegion {
///     name: "body".into(),
///     content: "return 42;\n".into(),
///     start_line: 2,
///     end_line: 4,
/// }];
/// let fresh = "/* BEGIN MANUAL SECTION body */\n// TODO\n/* END MANUAL SECTION */\n";
/// let splice = splice_regions(fresh, &marker, &old).unwrap();
/// assert!(splice.text.contains("return 42;"));
/// assert!(splice.dropped.is_empty());
/// ```
pub fn splice_regions(
    new_text: &str,
    marker: &RegionMarker,
    old_regions: &[ManualRegion],
) -> Result<Splice> {
    let pieces = scan(new_text, marker)?;
    let mut text = String::with_capacity(new_text.len());
    let mut present = HashSet::new();

    for piece in pieces {
        match piece {
            Piece::Generated(generated) => text.push_str(generated),
            Piece::Manual { name, content, .. } => {
                present.insert(name);
                match old_regions.iter().find(|region| region.name == name) {
                    Some(old) => text.push_str(&old.content),
                    None => {
                        tracing::debug!(section = name, "No previous content, keeping generated default");
                        text.push_str(content);
                    }
                }
            }
        }
    }

    let dropped = old_regions
        .iter()
        .filter(|region| !present.contains(region.name.as_str()))
        .cloned()
        .collect();

    Ok(Splice { text, dropped })
}
