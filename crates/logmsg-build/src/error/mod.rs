use std::error::Error;
use std::fmt;

mod kind;

#[allow(clippy::module_name_repetitions)]
pub use kind::ErrorKind;

/// Result of any generation step.
pub type Fallible<T> = Result<T, GenError>;

/// Error type for the generator
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct GenError {
    inner: Box<Inner>,
}

#[derive(Debug)]
struct Inner {
    kind: ErrorKind,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl GenError {
    /// The exit code a command line front end should use for this error
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        self.inner.kind.exit_code()
    }

    /// Create a new `GenError` instance including a source error
    pub fn from_source<E>(source: E, kind: ErrorKind) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self {
            inner: Box::new(Inner {
                kind,
                source: Some(source.into()),
            }),
        }
    }

    /// Get a reference to the `ErrorKind` for this error
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.kind.fmt(f)
    }
}

impl Error for GenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn Error + 'static))
    }
}

impl From<ErrorKind> for GenError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            inner: Box::new(Inner { kind, source: None }),
        }
    }
}

impl From<logmsg_core::Cancelled> for GenError {
    fn from(_: logmsg_core::Cancelled) -> Self {
        ErrorKind::Cancelled.into()
    }
}

/// Trait providing the `with_context` method to easily convert any Result error into a `GenError`
pub trait Context<T> {
    /// # Errors
    ///
    /// Returns a `GenError` if the underlying result is an error.
    fn with_context<F>(self, f: F) -> Fallible<T>
    where
        F: FnOnce() -> ErrorKind;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    fn with_context<F>(self, f: F) -> Fallible<T>
    where
        F: FnOnce() -> ErrorKind,
    {
        self.map_err(|e| GenError::from_source(e, f()))
    }
}

/// Exit codes supported by generator errors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitCode {
    /// No error occurred.
    Success = 0,

    /// An unknown error occurred.
    UnknownError = 1,

    /// An invalid combination of command-line arguments was supplied.
    InvalidArguments = 3,

    /// A file could not be read or written.
    FileSystemError = 7,

    /// The configuration or an input source is missing or incorrect.
    ConfigurationError = 8,

    /// Some logger messages were skipped.
    GenerationDiagnostics = 9,
}

impl ExitCode {
    /// Exits the process with this code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32);
    }
}
