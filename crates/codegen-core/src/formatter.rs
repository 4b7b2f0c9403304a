//! Hook for a language-specific pretty printer.
//!
//! The formatter runs on merged text before signing, so the signature
//! always covers the formatted bytes.

use crate::config::FormatterConfig;
use std::io::Write;
use std::process::{Command, Stdio};

#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{command} produced output that is not valid UTF-8")]
    InvalidOutput { command: String },

    #[error("{0}")]
    Rejected(String),
}

/// Reformats source text.
///
/// `extension` is the target file's extension, if it has one.
pub trait Formatter: Send + Sync {
    fn format(&self, source: &str, extension: Option<&str>) -> Result<String, FormatterError>;
}

impl<F> Formatter for F
where
    F: Fn(&str, Option<&str>) -> Result<String, FormatterError> + Send + Sync,
{
    fn format(&self, source: &str, extension: Option<&str>) -> Result<String, FormatterError> {
        self(source, extension)
    }
}

/// Pipes text through an external program (stdin to stdout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    command: String,
    args: Vec<String>,
    extensions: Vec<String>,
}

impl CommandFormatter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict formatting to these extensions; other files pass through.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_config(config: &FormatterConfig) -> Self {
        Self::new(config.command.clone())
            .with_args(config.args.iter().cloned())
            .with_extensions(config.extensions.iter().cloned())
    }

    fn applies_to(&self, extension: Option<&str>) -> bool {
        self.extensions.is_empty()
            || extension.is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }

    fn spawn_error(&self, source: std::io::Error) -> FormatterError {
        FormatterError::Spawn {
            command: self.command.clone(),
            source,
        }
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, source: &str, extension: Option<&str>) -> Result<String, FormatterError> {
        if !self.applies_to(extension) {
            return Ok(source.to_string());
        }

        tracing::debug!(command = %self.command, ?extension, "Running formatter");
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Feed stdin from a separate thread so a large output cannot block
        // the child while we are still writing.
        let mut stdin = child.stdin.take().ok_or_else(|| {
            self.spawn_error(std::io::Error::other("stdin was not captured"))
        })?;
        let input = source.to_string();
        let feeder = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        let fed = feeder
            .join()
            .map_err(|_| FormatterError::Rejected("stdin writer panicked".to_string()))?;

        if !output.status.success() {
            return Err(FormatterError::Failed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        fed.map_err(|e| self.spawn_error(e))?;

        String::from_utf8(output.stdout).map_err(|_| FormatterError::InvalidOutput {
            command: self.command.clone(),
        })
    }
}
