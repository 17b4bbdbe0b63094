//! Miette-based error diagnostics for CLI error presentation.
//!
//! TOML parse failures in the configuration or desires file are shown with
//! the offending source region highlighted.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::error::{ConfigError, Error};

/// Parse error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(tradecut::config))]
pub struct TomlDiagnostic {
    /// Human-readable error message.
    pub message: String,

    /// Source content with its file name.
    #[source_code]
    pub src: miette::NamedSource<String>,

    /// Byte offset and length of the problematic region.
    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl TomlDiagnostic {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        name: impl AsRef<str>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: miette::NamedSource::new(name, src.into()),
            span: (offset, len).into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Build a diagnostic for a TOML parse failure that carries a span.
    #[must_use]
    pub fn from_error(err: &Error, name: &str, src: &str) -> Option<Self> {
        let Error::Config(ConfigError::Parse(parse)) = err else {
            return None;
        };
        let span = parse.span()?;
        Some(Self::new(parse.message(), name, src, span.start, span.len()))
    }
}

/// Print a rich diagnostic to stderr when `err` is a TOML parse failure.
pub fn report_parse_error(err: &Error, name: &str, src: &str, help: &str) {
    if let Some(diagnostic) = TomlDiagnostic::from_error(err, name, src) {
        eprintln!("{:?}", miette::Report::new(diagnostic.with_help(help)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::Config;

    #[test]
    fn parse_error_points_at_source() {
        let src = "[optimizer]\nnum_reads = \"many\"\n";
        let err = Config::parse_toml_with_env(src, |_| None).unwrap_err();

        let diagnostic = TomlDiagnostic::from_error(&err, "config.toml", src).unwrap();
        let start = diagnostic.span.offset();
        assert!(start >= src.find("num_reads").unwrap());
        assert!(start < src.len());
    }

    #[test]
    fn desires_parse_error_points_at_source() {
        let src = "[[desire]]\nhas = \"A\"\nwants = \n";
        let err = crate::adapter::inbound::cli::desires::parse(src).unwrap_err();

        let diagnostic = TomlDiagnostic::from_error(&err, "desires.toml", src).unwrap();
        assert!(diagnostic.span.offset() >= src.find("wants").unwrap());
    }

    #[test]
    fn validation_errors_have_no_diagnostic() {
        let err = Config::parse_toml_with_env("[optimizer]\nnum_reads = 0\n", |_| None).unwrap_err();
        assert!(TomlDiagnostic::from_error(&err, "config.toml", "").is_none());
    }
}
