//! Scanning text for manual sections.
//!
//! The scan is line based and strict: every begin marker needs an end marker
//! before the next begin marker or the end of the text, and a name may only
//! appear once. Anything else means the text cannot be merged safely.

use crate::error::{Error, Result};
use crate::marker::{MarkerLine, RegionMarker, validate_region_name};
use std::collections::HashSet;

/// A manual section found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualRegion {
    /// The name from the begin marker.
    pub name: String,
    /// Raw text between the marker lines, line terminators included.
    pub content: String,
    /// The 1-based line number of the begin marker.
    pub start_line: usize,
    /// The 1-based line number of the end marker.
    pub end_line: usize,
}

/// A slice of scanned text: either generated text (marker lines included)
/// or the content of one manual section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Generated(&'a str),
    Manual {
        name: &'a str,
        content: &'a str,
        start_line: usize,
        end_line: usize,
    },
}

#[derive(Clone, Copy)]
struct OpenRegion<'a> {
    name: &'a str,
    content_start: usize,
    start_line: usize,
}

pub(crate) fn scan<'a>(text: &'a str, marker: &RegionMarker) -> Result<Vec<Piece<'a>>> {
    let mut pieces = Vec::new();
    let mut seen = HashSet::new();
    let mut open: Option<OpenRegion<'a>> = None;
    let mut generated_start = 0;
    let mut offset = 0;

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let line_start = offset;
        offset += line.len();

        match (marker.classify(line), open) {
            (None, _) => {}
            (Some(MarkerLine::Begin(name)), None) => {
                validate_region_name(name).map_err(|_| {
                    Error::corrupt(line_no, format!("invalid section name {name:?}"))
                })?;
                if !seen.insert(name) {
                    return Err(Error::DuplicateRegion {
                        name: name.to_string(),
                    });
                }
                open = Some(OpenRegion {
                    name,
                    content_start: offset,
                    start_line: line_no,
                });
            }
            (Some(MarkerLine::Begin(name)), Some(current)) => {
                return Err(Error::corrupt(
                    line_no,
                    format!(
                        "section {name:?} begins before section {:?} ends",
                        current.name
                    ),
                ));
            }
            (Some(MarkerLine::End), Some(current)) => {
                pieces.push(Piece::Generated(&text[generated_start..current.content_start]));
                pieces.push(Piece::Manual {
                    name: current.name,
                    content: &text[current.content_start..line_start],
                    start_line: current.start_line,
                    end_line: line_no,
                });
                generated_start = line_start;
                open = None;
            }
            (Some(MarkerLine::End), None) => {
                return Err(Error::corrupt(
                    line_no,
                    "END MANUAL SECTION without a matching BEGIN",
                ));
            }
        }
    }

    if let Some(current) = open {
        return Err(Error::corrupt(
            current.start_line,
            format!("section {:?} is never closed", current.name),
        ));
    }

    pieces.push(Piece::Generated(&text[generated_start..]));
    Ok(pieces)
}

/// Extract every manual section of `text`, in order of appearance.
///
/// # Example
/// ```
/// use codegen_blocks::{RegionMarker, extract_all};
///
/// let text = "fn demo() {\n/* BEGIN MANUAL SECTION body */\nreturn 1;\n/* END MANUAL SECTION */\n}\n";
/// let regions = extract_all(text, &RegionMarker::default()).unwrap();
/// assert_eq!(regions.len(), 1);
/// assert_eq!(regions[0].name, "body");
/// assert_eq!(regions[0].content, "return 1;\n");
/// ```
pub fn extract_all(text: &str, marker: &RegionMarker) -> Result<Vec<ManualRegion>> {
    Ok(scan(text, marker)?
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Manual {
                name,
                content,
                start_line,
                end_line,
            } => Some(ManualRegion {
                name: name.to_string(),
                content: content.to_string(),
                start_line,
                end_line,
            }),
            Piece::Generated(_) => None,
        })
        .collect())
}

/// Find a single manual section by name.
pub fn find_region(text: &str, marker: &RegionMarker, name: &str) -> Result<Option<ManualRegion>> {
    Ok(extract_all(text, marker)?
        .into_iter()
        .find(|region| region.name == name))
}

/// Remove the content of every manual section, keeping the marker lines.
///
/// What remains is exactly the generator-owned text of a partially
/// generated file.
pub fn strip_manual_content(text: &str, marker: &RegionMarker) -> Result<String> {
    Ok(scan(text, marker)?
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Generated(generated) => Some(generated),
            Piece::Manual { .. } => None,
        })
        .collect())
}
