//! Comment syntax used for doc-blocks and manual-section markers

use serde::{Deserialize, Serialize};

/// Comment syntax of the generated language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    /// C-style block comments: `/* comment */`
    #[default]
    Block,
    /// Line comments: `// comment`
    Line,
    /// Hash: `# comment`
    Hash,
    /// HTML-style: `<!-- comment -->`
    Html,
}

impl CommentStyle {
    /// Opening and closing delimiters for a single-line comment.
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            Self::Block => ("/* ", " */"),
            Self::Line => ("// ", ""),
            Self::Hash => ("# ", ""),
            Self::Html => ("<!-- ", " -->"),
        }
    }

    /// Wrap `text` in a single-line comment.
    pub fn wrap(&self, text: &str) -> String {
        let (open, close) = self.delimiters();
        format!("{open}{text}{close}")
    }

    /// Strip the single-line comment delimiters from an already trimmed line.
    pub(crate) fn unwrap<'a>(&self, trimmed: &'a str) -> Option<&'a str> {
        let (open, close) = self.delimiters();
        trimmed.strip_prefix(open)?.strip_suffix(close)
    }

    /// Render a multi-line comment block, one output line per input line.
    ///
    /// Empty input lines become bare continuation lines. The result always
    /// ends with a line break.
    pub fn comment_block<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let mut out = String::new();
        match self {
            Self::Block => {
                out.push_str("/**\n");
                for line in lines {
                    push_prefixed(&mut out, " *", line.as_ref());
                }
                out.push_str(" */\n");
            }
            Self::Line => {
                for line in lines {
                    push_prefixed(&mut out, "//", line.as_ref());
                }
            }
            Self::Hash => {
                for line in lines {
                    push_prefixed(&mut out, "#", line.as_ref());
                }
            }
            Self::Html => {
                out.push_str("<!--\n");
                for line in lines {
                    out.push_str(line.as_ref());
                    out.push('\n');
                }
                out.push_str("-->\n");
            }
        }
        out
    }
}

fn push_prefixed(out: &mut String, prefix: &str, line: &str) {
    out.push_str(prefix);
    if !line.is_empty() {
        out.push(' ');
        out.push_str(line);
    }
    out.push('\n');
}
