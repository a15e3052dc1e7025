//! Error types for location parsing and pattern dictionary edits

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::pattern::Placement;

/// Byte range in a location token
pub type Span = std::ops::Range<usize>;

/// An offset token that could not be parsed.
///
/// Extraction recovers from these locally; only the strict parser and the
/// lint pass surface them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("malformed location token '{token}' at {span:?}: {reason}")]
    MalformedToken {
        token: String,
        span: Span,
        reason: String,
    },
}

impl LocationError {
    pub fn malformed(token: impl Into<String>, span: Span, reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            token: token.into(),
            span,
            reason: reason.into(),
        }
    }

    /// Format the error with the offending token underlined using ariadne
    pub fn format(&self, source_name: &str) -> String {
        let mut buf = Vec::new();
        match self {
            LocationError::MalformedToken {
                token,
                span,
                reason,
            } => {
                // ariadne needs a non-empty source to point into
                let source = if token.is_empty() { " " } else { token.as_str() };
                let span = span.start.min(source.len())..span.end.min(source.len());

                let written = Report::build(ReportKind::Error, source_name, span.start)
                    .with_message("malformed location token")
                    .with_label(
                        Label::new((source_name, span))
                            .with_message(reason)
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((source_name, Source::from(source)), &mut buf);

                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Errors raised by extraction and by edits to the pattern dictionary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// Two entries resolve to the same pattern id
    #[error("duplicate pattern name '{name}'")]
    DuplicatePatternName { name: String },

    /// An `extends` edge targets a pattern that does not exist
    #[error("pattern '{pattern}' extends unknown pattern '{target}'")]
    UnknownExtendsTarget { pattern: String, target: String },

    /// An `extends` edge would close a cycle
    #[error("cyclic extends: {}", cycle.join(" -> "))]
    CyclicExtends { cycle: Vec<String> },

    /// An `extends` edge that is already present
    #[error("pattern '{pattern}' already extends '{target}'")]
    DuplicateExtends { pattern: String, target: String },

    /// A component name already used in the same inner/outer map
    #[error("pattern '{pattern}' already has an {placement} component named '{name}'")]
    ComponentNameCollision {
        pattern: String,
        placement: Placement,
        name: String,
    },

    /// Referenced pattern id is not in the dictionary
    #[error("pattern '{name}' not found")]
    UnknownPattern { name: String },

    /// Referenced component is not in the parent's inner/outer map
    #[error("pattern '{pattern}' has no {placement} component named '{name}'")]
    UnknownComponent {
        pattern: String,
        placement: Placement,
        name: String,
    },
}

impl GrammarError {
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicatePatternName { name: name.into() }
    }

    pub fn cyclic(cycle: Vec<String>) -> Self {
        Self::CyclicExtends { cycle }
    }

    pub fn unknown_pattern(name: impl Into<String>) -> Self {
        Self::UnknownPattern { name: name.into() }
    }

    pub fn component_collision(
        pattern: impl Into<String>,
        placement: Placement,
        name: impl Into<String>,
    ) -> Self {
        Self::ComponentNameCollision {
            pattern: pattern.into(),
            placement,
            name: name.into(),
        }
    }

    pub fn unknown_component(
        pattern: impl Into<String>,
        placement: Placement,
        name: impl Into<String>,
    ) -> Self {
        Self::UnknownComponent {
            pattern: pattern.into(),
            placement,
            name: name.into(),
        }
    }
}
