use std::fmt;
use std::path::PathBuf;

use super::ExitCode;

const REPORT_BUG_CTA: &str =
    "Please rerun the command that triggered this error with the environment
variable `LOGMSG_LOGLEVEL` set to `debug` and open an issue with the details!";

const PERMISSIONS_CTA: &str = "Please ensure you have correct permissions to the output directory.";

/// Every way a generation run can fail.
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum ErrorKind {
    /// Thrown when generation was abandoned through a cancellation token
    Cancelled,

    /// Thrown when the output directory could not be created
    CreateDirError {
        dir: PathBuf,
    },

    /// Thrown when a `check` run skipped some logger messages
    DiagnosticsReported {
        count: usize,
    },

    /// Thrown when two annotated types would be written to the same file
    DuplicateFileName {
        name: String,
        first: String,
        second: String,
    },

    /// Thrown when an explicit event id is not a 32-bit integer
    InvalidEventId {
        message: String,
        value: String,
    },

    /// Thrown when a log level is not one of the known severities or `None`
    InvalidLogLevel {
        message: String,
        level: String,
    },

    /// Thrown when a resolved placeholder type cannot be written as a Rust type
    InvalidPlaceholderType {
        message: String,
        ty: String,
    },

    /// Thrown when a configured crate path or attribute name is not a Rust path
    InvalidConfigPath {
        field: &'static str,
        value: String,
    },

    /// Thrown when neither an output directory nor `OUT_DIR` is available
    NoOutDir,

    /// Thrown when no source file was given
    NoSources,

    /// Thrown when `generate --check` finds generated files that differ from a fresh run
    OutOfDate {
        count: usize,
    },

    /// Thrown when the configuration file is not valid JSON for `Config`
    ParseConfigError {
        file: PathBuf,
    },

    /// Thrown when a source file is not valid Rust
    ParseSourceError {
        file: PathBuf,
    },

    /// Thrown when the configuration file could not be read
    ReadConfigError {
        file: PathBuf,
    },

    /// Thrown when a source file could not be read
    ReadSourceError {
        file: PathBuf,
    },

    /// Thrown when a generated file could not be written
    WriteFileError {
        file: PathBuf,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("Generation was cancelled."),
            Self::CreateDirError { dir } => write!(
                f,
                "Could not create directory {}

{PERMISSIONS_CTA}",
                dir.display()
            ),
            Self::DiagnosticsReported { count } => write!(
                f,
                "{count} logger message(s) could not be generated.

The warnings above explain why each one was skipped."
            ),
            Self::DuplicateFileName {
                name,
                first,
                second,
            } => write!(
                f,
                "`{first}` and `{second}` would both be generated into {name}

Please rename one of the types."
            ),
            Self::InvalidEventId { message, value } => write!(
                f,
                "Invalid event id `{value}` for logger message `{message}`.

Event ids must be 32-bit integers."
            ),
            Self::InvalidLogLevel { message, level } => write!(
                f,
                "Unknown log level `{level}` for logger message `{message}`.

Use one of `Trace`, `Debug`, `Information`, `Warning`, `Error`, `Critical` or `None`."
            ),
            Self::InvalidPlaceholderType { message, ty } => write!(
                f,
                "Could not write type `{ty}` for logger message `{message}`.

{REPORT_BUG_CTA}"
            ),
            Self::InvalidConfigPath { field, value } => write!(
                f,
                "Configuration field `{field}` is not a valid Rust path: `{value}`"
            ),
            Self::NoOutDir => f.write_str(
                "No output directory was configured.

Pass `--out-dir`, set `out_dir` in the configuration, or run from a build script where
`OUT_DIR` is set.",
            ),
            Self::NoSources => f.write_str("No source files were given."),
            Self::OutOfDate { count } => write!(
                f,
                "{count} generated file(s) are out of date.

Rerun `logmsg generate` without `--check` to update them."
            ),
            Self::ParseConfigError { file } => write!(
                f,
                "Could not parse configuration file {}

Please ensure the file is valid JSON and only uses known fields.",
                file.display()
            ),
            Self::ParseSourceError { file } => write!(
                f,
                "Could not parse source file {}

Please ensure the file is valid Rust.",
                file.display()
            ),
            Self::ReadConfigError { file } => write!(
                f,
                "Could not read configuration file {}",
                file.display()
            ),
            Self::ReadSourceError { file } => write!(
                f,
                "Could not read source file {}",
                file.display()
            ),
            Self::WriteFileError { file } => write!(
                f,
                "Could not write generated file {}

{PERMISSIONS_CTA}",
                file.display()
            ),
        }
    }
}

impl ErrorKind {
    /// Process exit code for this kind of error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Cancelled | Self::InvalidPlaceholderType { .. } => ExitCode::UnknownError,
            Self::NoSources => ExitCode::InvalidArguments,
            Self::CreateDirError { .. }
            | Self::ReadConfigError { .. }
            | Self::ReadSourceError { .. }
            | Self::WriteFileError { .. } => ExitCode::FileSystemError,
            Self::DuplicateFileName { .. }
            | Self::InvalidEventId { .. }
            | Self::InvalidLogLevel { .. }
            | Self::InvalidConfigPath { .. }
            | Self::NoOutDir
            | Self::ParseConfigError { .. }
            | Self::ParseSourceError { .. } => ExitCode::ConfigurationError,
            Self::DiagnosticsReported { .. } | Self::OutOfDate { .. } => {
                ExitCode::GenerationDiagnostics
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Context, GenError};
    use std::error::Error;
    use std::io;

    #[test]
    fn context_keeps_source() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let error: GenError = result
            .with_context(|| ErrorKind::ReadSourceError {
                file: PathBuf::from("src/lib.rs"),
            })
            .unwrap_err();

        assert_eq!(error.exit_code(), ExitCode::FileSystemError);
        assert_eq!(error.to_string(), "Could not read source file src/lib.rs");
        assert_eq!(error.source().map(ToString::to_string).as_deref(), Some("gone"));
    }

    #[test]
    fn cancellation_converts() {
        let error = GenError::from(logmsg_core::Cancelled);
        assert_eq!(error.kind(), &ErrorKind::Cancelled);
        assert!(error.source().is_none());
    }
}
