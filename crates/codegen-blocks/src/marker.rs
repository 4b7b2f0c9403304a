//! Literal marker lines delimiting manual sections.
//!
//! A manual section is written as:
//! ```text
//! /* BEGIN MANUAL SECTION Demo::getName */
//! hand-written content
//! /* END MANUAL SECTION */
//! ```
//! The comment delimiters follow the configured [`CommentStyle`]. Markers are
//! recognized on the trimmed line, so indentation in front of them is free.

use crate::error::{Error, Result};
use crate::style::CommentStyle;
use regex::Regex;
use std::sync::LazyLock;

const BEGIN_KEYWORD: &str = "BEGIN MANUAL SECTION";
const END_KEYWORD: &str = "END MANUAL SECTION";

/// Section names are identifier-like; `.` and `:` allow `Class::method` ids.
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.:-]*$").expect("Invalid section name regex")
});

/// Check that `name` can be embedded in a begin marker unambiguously.
pub fn validate_region_name(name: &str) -> Result<()> {
    if NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidRegionName {
            name: name.to_string(),
        })
    }
}

/// What a single line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerLine<'a> {
    /// A begin marker; the name has not been validated yet.
    Begin(&'a str),
    End,
}

/// Produces and recognizes manual-section marker lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionMarker {
    style: CommentStyle,
}

impl RegionMarker {
    pub fn new(style: CommentStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> CommentStyle {
        self.style
    }

    /// The begin marker line for `name`, without a line terminator.
    pub fn begin_marker(&self, name: &str) -> Result<String> {
        validate_region_name(name)?;
        Ok(self.style.wrap(&format!("{BEGIN_KEYWORD} {name}")))
    }

    /// The end marker line, without a line terminator.
    pub fn end_marker(&self) -> String {
        self.style.wrap(END_KEYWORD)
    }

    pub(crate) fn classify<'a>(&self, line: &'a str) -> Option<MarkerLine<'a>> {
        let inner = self.style.unwrap(line.trim())?;
        if inner == END_KEYWORD {
            return Some(MarkerLine::End);
        }
        let rest = inner.strip_prefix(BEGIN_KEYWORD)?;
        if rest.is_empty() {
            return Some(MarkerLine::Begin(""));
        }
        rest.strip_prefix(' ').map(MarkerLine::Begin)
    }

    /// Whether any line of `text` is a begin marker.
    pub fn contains_manual_section(&self, text: &str) -> bool {
        text.lines()
            .any(|line| matches!(self.classify(line), Some(MarkerLine::Begin(_))))
    }
}
