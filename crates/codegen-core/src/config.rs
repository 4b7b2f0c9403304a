//! Generator configuration
//!
//! One value is built per run and passed explicitly to every entry point.
//!
//! ```toml
//! spaces_per_indent = 4
//! max_line_length = 100
//! comment_style = "line"
//! file_header = ["Copyright (c) Example Corp."]
//!
//! [formatter]
//! command = "rustfmt"
//! args = ["--emit", "stdout"]
//! extensions = ["rs"]
//! ```

use crate::{Error, Result};
use codegen_blocks::{CommentStyle, RegionMarker};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    /// Spaces emitted per indentation level.
    pub spaces_per_indent: usize,
    /// Soft width budget used when packing suggested line breaks.
    pub max_line_length: usize,
    /// Comment syntax for the doc-block and manual-section markers.
    pub comment_style: CommentStyle,
    /// Lines placed at the top of every generated doc-block.
    pub file_header: Vec<String>,
    /// External formatter run before signing.
    pub formatter: Option<FormatterConfig>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            spaces_per_indent: 2,
            max_line_length: 80,
            comment_style: CommentStyle::default(),
            file_header: Vec::new(),
            formatter: None,
        }
    }
}

/// An external formatter program: reads source on stdin, writes it on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Only files with these extensions are formatted; empty means all.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl CodegenConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| codegen_fs::Error::io(path, e))?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The marker producer matching this configuration's comment style.
    pub fn region_marker(&self) -> RegionMarker {
        RegionMarker::new(self.comment_style)
    }
}
