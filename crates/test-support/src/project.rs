//! Throwaway crates for running `logmsg` against.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::process::{process, Builder};

/// Builds a temporary project directory with source files and an optional
/// `logmsg.json` configuration.
#[allow(clippy::module_name_repetitions)]
#[must_use]
pub struct ProjectBuilder {
    files: Vec<(PathBuf, String)>,
}

impl ProjectBuilder {
    /// Adds a file at `path`, relative to the project root.
    pub fn file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.push((path.into(), contents.to_owned()));
        self
    }

    /// Adds `logmsg.json` with the given contents.
    pub fn config(self, json: &str) -> Self {
        self.file("logmsg.json", json)
    }

    /// Writes every file to a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory or a file cannot be created.
    #[must_use]
    pub fn build(self) -> Project {
        let root = TempDir::new().expect("could not create project directory");
        for (path, contents) in self.files {
            let path = root.path().join(path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("could not create project subdirectory");
            }
            fs::write(&path, contents).expect("could not write project file");
        }
        Project { root }
    }
}

/// Starts an empty project.
#[must_use]
pub const fn project() -> ProjectBuilder {
    ProjectBuilder { files: Vec::new() }
}

/// A project on disk, removed when dropped.
pub struct Project {
    root: TempDir,
}

impl Project {
    /// Root directory of the project.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of a file inside the project.
    #[must_use]
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root().join(relative)
    }

    /// Reads a file of the project.
    ///
    /// # Panics
    ///
    /// Panics if the file does not exist or is not UTF-8.
    #[must_use]
    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|error| panic!("could not read {}: {error}", path.display()))
    }

    /// A command running `binary` from the project root with logging left at
    /// its default level.
    pub fn command(&self, binary: impl AsRef<Path>) -> Builder {
        let mut builder = process(binary.as_ref());
        builder.cwd(self.root()).env_remove("LOGMSG_LOGLEVEL");
        builder
    }
}
