//! The console logger installed by the command line.
//!
//! The level comes from the `--quiet`, `--verbose` and `--very-verbose`
//! flags unless `LOGMSG_LOGLEVEL` names one (`error`, `warn`, `info`,
//! `debug`, `trace` or `off`).

use std::env;
use std::fmt::Display;

use console::style;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use textwrap::{Options, fill};

use crate::style::{error_prefix, text_width, warning_prefix};

const LOGLEVEL_VAR: &str = "LOGMSG_LOGLEVEL";
const WARNING_PREFIX_WIDTH: usize = "warning: ".len();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Default,
    Verbose,
    VeryVerbose,
}

impl Verbosity {
    const fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Error,
            Self::Default => LevelFilter::Info,
            Self::Verbose => LevelFilter::Debug,
            Self::VeryVerbose => LevelFilter::Trace,
        }
    }
}

pub struct Logger {
    level: LevelFilter,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => eprintln!("{} {}", error_prefix(), wrap(record.args())),
            Level::Warn => eprintln!("{} {}", warning_prefix(), wrap(record.args())),
            Level::Info => println!("{}", record.args()),
            Level::Debug | Level::Trace => eprintln!(
                "{} {}",
                style(format!("[{}]", record.target())).dim(),
                record.args()
            ),
        }
    }

    fn flush(&self) {}
}

impl Logger {
    /// Installs the logger as the global `log` logger.
    ///
    /// # Errors
    ///
    /// Fails if a logger was already installed.
    pub fn init(verbosity: Verbosity) -> Result<(), SetLoggerError> {
        let logger = Self::new(verbosity, env::var(LOGLEVEL_VAR).ok().as_deref());
        log::set_max_level(logger.level);
        log::set_boxed_logger(Box::new(logger))
    }

    fn new(verbosity: Verbosity, from_env: Option<&str>) -> Self {
        let level = from_env
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| verbosity.level());
        Self { level }
    }
}

/// Wraps a message to the terminal, leaving room for the prefix on the
/// first line.
fn wrap(message: impl Display) -> String {
    let message = message.to_string();
    match text_width() {
        Some(width) => fill(
            &message,
            Options::new(width).initial_indent(&" ".repeat(WARNING_PREFIX_WIDTH)),
        )
        .trim_start()
        .to_owned(),
        None => message,
    }
}
