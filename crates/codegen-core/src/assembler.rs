//! Indentation-aware text buffer that generated fragments flow through.

use crate::Result;
use crate::config::CodegenConfig;
use codegen_blocks::RegionMarker;

/// Marks a place where [`TextAssembler::append_with_suggested_breaks`] may
/// split a long logical line.
pub const SUGGESTED_BREAK: char = '\t';

/// Columns kept free for indentation and opening braces.
const BREAK_MARGIN: usize = 2;
/// Extra columns kept free inside function bodies.
const FUNCTION_MARGIN: usize = 2;
/// Prefix of continuation lines produced by packing.
const CONTINUATION_INDENT: &str = "  ";

/// A text buffer that tracks indentation and line starts.
///
/// Methods chain through `&mut Self`. The buffer is read out exactly once
/// with [`finalize`](Self::finalize), which consumes it.
#[derive(Debug)]
pub struct TextAssembler {
    code: String,
    spaces_per_indent: usize,
    max_line_length: usize,
    marker: RegionMarker,
    indentation_level: usize,
    is_new_line: bool,
    inside_function: bool,
}

impl TextAssembler {
    pub fn new(config: &CodegenConfig) -> Self {
        Self {
            code: String::new(),
            spaces_per_indent: config.spaces_per_indent,
            max_line_length: config.max_line_length,
            marker: config.region_marker(),
            indentation_level: 0,
            is_new_line: true,
            inside_function: false,
        }
    }

    /// An empty assembler sharing this one's settings, indentation level,
    /// and function context. Nothing already written is carried over.
    pub fn fork(&self) -> Self {
        Self {
            code: String::new(),
            spaces_per_indent: self.spaces_per_indent,
            max_line_length: self.max_line_length,
            marker: self.marker,
            indentation_level: self.indentation_level,
            is_new_line: true,
            inside_function: self.inside_function,
        }
    }

    pub fn indentation_level(&self) -> usize {
        self.indentation_level
    }

    pub fn is_inside_function(&self) -> bool {
        self.inside_function
    }

    pub fn new_line(&mut self) -> &mut Self {
        self.code.push('\n');
        self.is_new_line = true;
        self
    }

    /// Break the line unless the cursor already sits at a line start.
    pub fn ensure_new_line(&mut self) -> &mut Self {
        if !self.is_new_line {
            self.new_line();
        }
        self
    }

    /// Leave the cursor at the start of a line that follows an empty line.
    pub fn ensure_empty_line(&mut self) -> &mut Self {
        self.ensure_new_line().new_line()
    }

    /// Append `code`, which may contain line breaks.
    ///
    /// Each line is indented to the current level the first time
    /// non-whitespace content lands on it. Whitespace-only fragments add
    /// nothing, so blank lines never carry trailing spaces.
    pub fn append(&mut self, code: &str) -> &mut Self {
        let last = match code.rsplit_once('\n') {
            Some((head, last)) => {
                for line in head.split('\n') {
                    self.append_line(line);
                }
                last
            }
            None => code,
        };

        if last.trim().is_empty() {
            return self;
        }

        if self.is_new_line {
            let width = self.spaces_per_indent * self.indentation_level;
            self.code.extend(std::iter::repeat_n(' ', width));
            self.is_new_line = false;
        }
        self.code.push_str(last);
        self
    }

    pub fn append_line(&mut self, code: &str) -> &mut Self {
        self.append(code).new_line()
    }

    pub fn append_if(&mut self, condition: bool, code: &str) -> &mut Self {
        if condition {
            self.append(code);
        }
        self
    }

    pub fn append_line_if(&mut self, condition: bool, code: &str) -> &mut Self {
        if condition {
            self.append_line(code);
        }
        self
    }

    pub fn append_lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.append_line(line.as_ref());
        }
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indentation_level += 1;
        self
    }

    /// # Panics
    /// Panics if the indentation level is already zero.
    pub fn unindent(&mut self) -> &mut Self {
        assert!(
            self.indentation_level > 0,
            "Indentation level cannot go below zero"
        );
        self.indentation_level -= 1;
        self
    }

    /// Mark what follows as a function body, tightening the width budget.
    pub fn set_inside_function(&mut self) -> &mut Self {
        self.inside_function = true;
        self
    }

    /// Columns available to code at the current indentation level.
    pub fn max_code_length(&self) -> usize {
        self.max_line_length
            .saturating_sub(self.spaces_per_indent * self.indentation_level)
    }

    fn break_budget(&self) -> usize {
        let budget = self.max_code_length().saturating_sub(BREAK_MARGIN);
        if self.inside_function {
            budget.saturating_sub(FUNCTION_MARGIN)
        } else {
            budget
        }
    }

    /// Append `code`, choosing line breaks among the caller's suggestions.
    ///
    /// Every [`SUGGESTED_BREAK`] becomes either a space or a line break.
    /// Segments are packed greedily under the width budget; continuation
    /// lines get two extra spaces. A segment wider than the budget is
    /// emitted untouched on its own line. Real line breaks in `code` are
    /// kept, and each line is packed on its own.
    pub fn append_with_suggested_breaks(&mut self, code: &str) -> &mut Self {
        if let Some((head, last)) = code.rsplit_once('\n') {
            self.append_lines_with_suggested_breaks(head.split('\n'));
            return self.append_with_suggested_breaks(last);
        }

        let lines = pack_segments(code, self.break_budget());
        self.append(&lines.join(&format!("\n{CONTINUATION_INDENT}")))
    }

    pub fn append_lines_with_suggested_breaks<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.append_with_suggested_breaks(line.as_ref()).new_line();
        }
        self
    }

    /// Start a manual section on a fresh line.
    pub fn begin_manual_section(&mut self, name: &str) -> Result<&mut Self> {
        let begin = self.marker.begin_marker(name)?;
        Ok(self.ensure_new_line().append_line(&begin))
    }

    pub fn end_manual_section(&mut self) -> &mut Self {
        let end = self.marker.end_marker();
        self.ensure_new_line().append_line(&end)
    }

    /// A complete manual section holding `default_content` until someone
    /// edits it.
    pub fn manual_section(&mut self, name: &str, default_content: &str) -> Result<&mut Self> {
        self.begin_manual_section(name)?
            .append(default_content)
            .ensure_new_line();
        Ok(self.end_manual_section())
    }

    /// Read out the accumulated text.
    pub fn finalize(self) -> String {
        self.code
    }
}

/// Greedily pack the [`SUGGESTED_BREAK`]-separated segments of `text` into
/// lines of at most `budget` characters.
///
/// Empty segments are skipped. Adjacent segments are joined with one space
/// while the result fits; a segment that alone exceeds the budget becomes
/// its own line.
pub fn pack_segments(text: &str, budget: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for segment in text.split(SUGGESTED_BREAK).filter(|s| !s.is_empty()) {
        match lines.last_mut() {
            Some(current) if width(current) + 1 + width(segment) <= budget => {
                current.push(' ');
                current.push_str(segment);
            }
            _ => lines.push(segment.to_string()),
        }
    }
    lines
}

fn width(text: &str) -> usize {
    text.chars().count()
}
