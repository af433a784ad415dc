//! Error types with rich diagnostics using miette
//!
//! Only *inputs* can fail: tour definitions and CSS declaration blocks.
//! Everything downstream of a successfully loaded definition degrades
//! gracefully instead of erroring.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename, or "<styleProps>" / "<tour>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Byte offset of a 1-based `line`/`column` pair, clamped to the source.
    pub fn offset_of(&self, line: usize, column: usize) -> usize {
        let mut offset = 0;
        for (idx, text) in self.source.split_inclusive('\n').enumerate() {
            if idx + 1 == line {
                return (offset + column.saturating_sub(1)).min(self.source.len());
            }
            offset += text.len();
        }
        self.source.len()
    }
}

/// Errors raised while loading tour configuration
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("invalid style declaration: {message}")]
    #[diagnostic(
        code(guided_tour::config::invalid_style),
        help("styleProps strings are CSS declaration blocks, e.g. `min-height: 350px; max-width: 450px`")
    )]
    InvalidStyle {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("cannot parse this")]
        span: SourceSpan,
    },

    #[error("invalid tour definition: {message}")]
    #[diagnostic(code(guided_tour::config::invalid_definition))]
    InvalidDefinition {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },
}

impl ConfigError {
    /// Build an `InvalidDefinition` from a serde_json error, pointing at the
    /// line/column serde reports.
    pub fn from_json(ctx: &SourceContext, err: &serde_json::Error) -> Self {
        let offset = ctx.offset_of(err.line(), err.column());
        ConfigError::InvalidDefinition {
            message: err.to_string(),
            src: ctx.named_source(),
            span: SourceSpan::from((offset, 0)),
        }
    }
}

/// A control name that does not map to a tour action.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("unknown tour action `{0}`")]
#[diagnostic(
    code(guided_tour::action::unknown),
    help("expected one of `next`, `prev`, `skip`, `finish`, optionally prefixed with `guided-tour-`")
)]
pub struct UnknownAction(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_of_first_line() {
        let ctx = SourceContext::new("<t>", "abc\ndef");
        assert_eq!(ctx.offset_of(1, 1), 0);
        assert_eq!(ctx.offset_of(1, 3), 2);
    }

    #[test]
    fn offset_of_later_line() {
        let ctx = SourceContext::new("<t>", "abc\ndef\n");
        assert_eq!(ctx.offset_of(2, 2), 5);
    }

    #[test]
    fn offset_of_clamps_past_end() {
        let ctx = SourceContext::new("<t>", "abc");
        assert_eq!(ctx.offset_of(9, 9), 3);
        assert_eq!(ctx.offset_of(1, 99), 3);
    }

    #[test]
    fn json_error_carries_code() {
        let ctx = SourceContext::new("tour.json", "{ \"steps\": [ }");
        let err = serde_json::from_str::<serde_json::Value>(&ctx.source).unwrap_err();
        let diag = ConfigError::from_json(&ctx, &err);
        let code = diag.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("guided_tour::config::invalid_definition"));
    }
}
