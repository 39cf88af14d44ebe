//! Error types for template parsing and invocation

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range inside a single fragment
pub type Span = std::ops::Range<usize>;

/// Token used to stand in for a placeholder when fragments are joined for display
pub const PLACEHOLDER: &str = "${}";

/// A template whose fragments the grammar cannot consume
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The scanner reached text it has no rule for
    #[error("parse error in fragment {fragment} at {span:?}: cannot make progress on {found:?}")]
    NoProgress {
        fragment: usize,
        span: Span,
        found: String,
    },

    /// A placeholder sits inside a tag without an attribute name to bind to
    #[error("placeholder {index} inside a tag is not bound to an attribute")]
    UnboundPlaceholder {
        fragment: usize,
        span: Span,
        index: usize,
    },

    /// A quoted binding (`attr="${}"`) whose closing quote does not follow the placeholder
    #[error("placeholder {index} must be followed by the closing quote {quote}")]
    UnclosedQuote {
        fragment: usize,
        span: Span,
        index: usize,
        quote: char,
    },
}

impl ParseError {
    /// Index of the fragment the error was detected in
    pub fn fragment(&self) -> usize {
        match self {
            ParseError::NoProgress { fragment, .. }
            | ParseError::UnboundPlaceholder { fragment, .. }
            | ParseError::UnclosedQuote { fragment, .. } => *fragment,
        }
    }

    /// Span of the error relative to its fragment
    pub fn span(&self) -> &Span {
        match self {
            ParseError::NoProgress { span, .. }
            | ParseError::UnboundPlaceholder { span, .. }
            | ParseError::UnclosedQuote { span, .. } => span,
        }
    }

    /// Span of the error in the fragments joined with [`PLACEHOLDER`]
    pub fn source_span(&self, fragments: &[&str]) -> Span {
        let base: usize = fragments
            .iter()
            .take(self.fragment())
            .map(|f| f.len() + PLACEHOLDER.len())
            .sum();
        let span = self.span();
        base + span.start..base + span.end
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, fragments: &[&str], filename: &str) -> String {
        let source = fragments.join(PLACEHOLDER);
        let span = self.source_span(fragments);
        let message = self.to_string();
        let hint = match self {
            ParseError::NoProgress { .. } => "no grammar rule matches here",
            ParseError::UnboundPlaceholder { .. } => "expected `name=` before the placeholder",
            ParseError::UnclosedQuote { .. } => "the quote opened before the placeholder",
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(hint)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}

/// Errors raised when a template is invoked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The fragments do not form a valid template
    #[error("malformed template: {0}")]
    Malformed(#[from] ParseError),

    /// The number of values does not match the number of placeholders
    #[error("template has {expected} placeholders but {found} values were supplied")]
    ArityMismatch { expected: usize, found: usize },
}
