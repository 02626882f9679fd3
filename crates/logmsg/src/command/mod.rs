pub mod check;
pub mod generate;

pub use check::Check;
pub use generate::Generate;

use std::path::PathBuf;

use log::debug;
use logmsg_build::error::{ExitCode, Fallible};
use logmsg_build::{Config, Generator};

use crate::session::Session;

/// A `logmsg` subcommand.
pub trait Command: Sized {
    /// Executes the command. Returns the exit code on success, and `Err(e)`
    /// if the process should return `e.exit_code()`.
    fn run(self, session: &Session) -> Fallible<ExitCode>;
}

/// Source arguments shared by every subcommand.
#[derive(clap::Args)]
pub struct Sources {
    /// Rust source files to scan
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Module path of the given files, e.g. `crate::net`
    #[arg(long, value_name = "path", default_value = "crate")]
    module: String,

    /// JSON configuration file
    #[arg(long, value_name = "file")]
    config: Option<PathBuf>,
}

impl Sources {
    pub(crate) fn generator(&self, session: &Session) -> Fallible<Generator> {
        let config = match &self.config {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Config::load(path)?
            }
            None => Config::default(),
        };
        Ok(self.files.iter().fold(
            Generator::new()
                .with_config(config)
                .cancellation(session.cancellation()),
            |generator, file| generator.source(file, &self.module),
        ))
    }
}
