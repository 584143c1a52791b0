//! Diagnostics for parse and eval failures: a message, optional help text,
//! and one or more labeled spans into the original source, rendered with
//! `ariadne`. Spans are byte offsets, matching `cfdg_lexer::SourceReader`.

use std::ops::Range;

macro_rules! next_or_err {
    ($reader: ident) => {
        $reader.read_char().ok_or_else(|| {
            crate::error_reporting::SourceReport::new(
                $reader.position(),
                "Unexpected end of input.",
                None,
            )
            .with_label($reader.position(), "here")
        })
    };
}

macro_rules! expect_char {
    ($reader: ident, $ch: expr, $name: literal) => {{
        let pos = $reader.position();
        match $reader.read_char() {
            Some(c) if c == $ch => Ok(()),
            _ => Err(crate::error_reporting::SourceReport::new(
                pos,
                concat!("Expected \"", $name, "\"."),
                Some("Add the missing token."),
            )
            .with_label(pos, "here")),
        }
    }};
}

macro_rules! expect_some {
    ($option: expr, $pos: expr, $expected_kind: literal) => {
        $option.ok_or_else(|| {
            crate::error_reporting::SourceReport::new(
                $pos,
                concat!("Expected to find ", $expected_kind, "."),
                None,
            )
            .with_label($pos, concat!("this was not parsed as ", $expected_kind))
        })
    };
}

pub(crate) use expect_char;
pub(crate) use expect_some;
pub(crate) use next_or_err;

#[derive(Debug, Clone)]
pub struct SourceReport {
    location: usize,
    message: String,
    suggestion: Option<String>,
    labels: Vec<(Range<usize>, String)>,
}

impl SourceReport {
    #[must_use]
    pub fn new(location: usize, message: &str, suggestion: Option<&str>) -> Self {
        SourceReport {
            location,
            message: message.to_string(),
            suggestion: suggestion.map(str::to_string),
            labels: vec![],
        }
    }

    #[must_use]
    pub fn with_label(mut self, location: usize, message: &str) -> Self {
        self.labels.push((location..location + 1, message.to_string()));
        self
    }

    #[must_use]
    pub fn with_span_label(mut self, span: Range<usize>, message: &str) -> Self {
        self.labels.push((span, message.to_string()));
        self
    }

    /// Render the diagnostic to stderr: message, then a marker line
    /// highlighting the offending position, per spec.
    pub fn eprint(&self, source: &str) {
        let end = self.location.min(source.len());
        let mut builder =
            ariadne::Report::build(ariadne::ReportKind::Error, (), end).with_message(&self.message);

        if self.labels.is_empty() {
            builder = builder.with_label(
                ariadne::Label::new(end..(end + 1).min(source.len())).with_message("here"),
            );
        } else {
            builder = builder.with_labels(self.labels.iter().map(|(span, message)| {
                ariadne::Label::new(span.start.min(source.len())..span.end.min(source.len()))
                    .with_message(message)
            }));
        }

        if let Some(help) = &self.suggestion {
            builder = builder.with_help(help);
        }

        let _ = builder.finish().eprint(ariadne::Source::from(source));
    }
}

/// Engine-level failures that are not tied to a single source span: they
/// abort the expand pass rather than a single directive (spec.md §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    UnknownStartShape(String),
    UnknownRule(String),
    UnknownBuiltin(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::UnknownStartShape(name) => {
                write!(f, "no rule named \"{name}\" to use as the start shape")
            }
            EngineError::UnknownRule(name) => write!(f, "reference to undefined rule \"{name}\""),
            EngineError::UnknownBuiltin(name) => {
                write!(f, "unrecognized builtin \"{name}\"")
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_missing_rule() {
        assert!(EngineError::UnknownStartShape("FOO".into())
            .to_string()
            .contains("FOO"));
    }
}
