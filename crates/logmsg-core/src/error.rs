use std::fmt;

use thiserror::Error;

use crate::binder::Parameter;

/// Why a single attribute instance produced no binding.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// An argument has the wrong shape for its parameter.
    #[error("argument `{parameter}` must be {expected}, found {found}")]
    MalformedAttributeArgument {
        parameter: Parameter,
        expected: &'static str,
        found: &'static str,
    },

    /// A required argument is absent, or an empty string.
    #[error("required argument `{0}` is missing or empty")]
    MissingRequiredField(Parameter),

    /// The template has no typed placeholder.
    #[error("format `{format}` contains no `{{Name:Type}}` placeholder")]
    NoPlaceholdersInFormat { format: String },

    /// A placeholder type does not name exactly one visible type.
    #[error("type `{token}` matches {candidates} visible types, expected exactly one")]
    AmbiguousOrUnresolvedType { token: String, candidates: usize },

    /// A positional index or name outside the parameter table.
    #[error("there is no parameter {0}")]
    ParameterOutOfRange(String),
}

/// Why an annotated declaration was excluded as a whole.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    /// The declaration has no enclosing namespace.
    #[error("`{declaration}` is not inside a namespace")]
    MissingEnclosingNamespace { declaration: String },

    /// The declaration sits inside something other than a namespace or type.
    #[error("`{declaration}` is nested in a {scope}, which cannot hold generated messages")]
    DisallowedScope { declaration: String, scope: String },
}

/// Returned when a pass was abandoned through a cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("generation was cancelled")]
pub struct Cancelled;

/// A dropped binding or excluded declaration, reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the declaration.
    pub declaration: String,
    /// What was skipped and why.
    pub kind: DiagnosticKind,
}

/// What was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The attribute at this index (among the matching attributes) was dropped.
    Binding { attribute: usize, error: BindError },
    /// The whole declaration was excluded.
    Declaration(CollectError),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::Binding { attribute, error } => write!(
                f,
                "{}: logger message #{} skipped: {error}",
                self.declaration,
                attribute + 1
            ),
            DiagnosticKind::Declaration(error) => {
                write!(f, "{}: skipped: {error}", self.declaration)
            }
        }
    }
}
