use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use thiserror::Error;

/// A process to run from a test, similar to `std::process::Command` but
/// cloneable and printable.
#[derive(Clone, Debug)]
pub struct Builder {
    program: OsString,
    args: Vec<OsString>,
    /// `None` removes the variable from the inherited environment.
    env: HashMap<String, Option<OsString>>,
    cwd: Option<PathBuf>,
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        write!(f, "`")
    }
}

impl Builder {
    /// Adds an argument.
    pub fn arg<T: AsRef<OsStr>>(&mut self, arg: T) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Adds several arguments.
    pub fn args<T: AsRef<OsStr>>(&mut self, arguments: &[T]) -> &mut Self {
        self.args
            .extend(arguments.iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Sets the working directory of the process.
    pub fn cwd<T: AsRef<Path>>(&mut self, path: T) -> &mut Self {
        self.cwd = Some(path.as_ref().to_owned());
        self
    }

    /// Sets an environment variable for the process.
    pub fn env<T: AsRef<OsStr>>(&mut self, key: &str, value: T) -> &mut Self {
        self.env
            .insert(key.to_owned(), Some(value.as_ref().to_os_string()));
        self
    }

    /// Removes an environment variable for the process.
    pub fn env_remove(&mut self, key: &str) -> &mut Self {
        self.env.insert(key.to_owned(), None);
        self
    }

    /// Runs the process to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the process could not be started and
    /// [`Error::Failed`] if it exited unsuccessfully.
    pub fn exec_with_output(&self) -> Result<Output, Error> {
        let output = self.build_command().output().map_err(|source| Error::Spawn {
            command: self.to_string(),
            source,
        })?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(Error::Failed {
                command: self.to_string(),
                output,
            })
        }
    }

    /// The `std::process::Command` this builder describes.
    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command.args(&self.args);
        for (key, value) in &self.env {
            match value {
                Some(value) => command.env(key, value),
                None => command.env_remove(key),
            };
        }
        command
    }
}

/// Creates a [`Builder`] for `program`.
pub fn process<T: AsRef<OsStr>>(program: T) -> Builder {
    Builder {
        program: program.as_ref().to_os_string(),
        args: Vec::new(),
        env: HashMap::new(),
        cwd: None,
    }
}

/// Why running a process failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not execute process {command}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("process didn't exit successfully: {command} ({})", output.status)]
    Failed { command: String, output: Output },
}

impl Error {
    /// Captured output, if the process ran at all.
    #[must_use]
    pub const fn output(&self) -> Option<&Output> {
        match self {
            Self::Spawn { .. } => None,
            Self::Failed { output, .. } => Some(output),
        }
    }
}
