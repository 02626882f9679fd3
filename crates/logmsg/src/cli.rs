use clap::{Parser, builder::styling};

use crate::command::{self, Command};
use crate::logger::Verbosity;
use crate::session::Session;
use crate::style::{MAX_WIDTH, text_width};
use logmsg_build::error::{ExitCode, Fallible};

#[derive(Parser)]
#[command(
    name = "logmsg",
    about = "Generates typed logger message helpers",
    long_about = "Generates typed logger message helpers

    Annotate a type with `#[logger_message(...)]`, then use `logmsg generate`
    to write its helpers or `logmsg check` to see which messages bind.",
    version,
    styles = styles(),
    term_width = text_width().unwrap_or(MAX_WIDTH),
)]
pub struct Logmsg {
    #[command(subcommand)]
    pub(crate) command: Subcommand,

    /// Enables verbose diagnostics
    #[arg(long, global = true)]
    pub(crate) verbose: bool,

    /// Enables trace-level diagnostics.
    #[arg(long, global = true, requires = "verbose")]
    pub(crate) very_verbose: bool,

    /// Prevents unnecessary output
    #[arg(
        long,
        global = true,
        conflicts_with = "verbose",
        aliases = &["silent"]
    )]
    pub(crate) quiet: bool,
}

impl Logmsg {
    pub(crate) const fn verbosity(&self) -> Verbosity {
        match (self.quiet, self.very_verbose, self.verbose) {
            (true, _, _) => Verbosity::Quiet,
            (false, true, _) => Verbosity::VeryVerbose,
            (false, false, true) => Verbosity::Verbose,
            (false, false, false) => Verbosity::Default,
        }
    }

    pub(crate) fn run(self, session: &Session) -> Fallible<ExitCode> {
        self.command.run(session)
    }
}

#[derive(clap::Subcommand)]
pub enum Subcommand {
    /// Writes the logger message helpers of the given sources
    Generate(command::Generate),

    /// Binds the logger messages of the given sources and reports problems
    ///
    /// Nothing is written. Exits with status 9 when any message or
    /// annotated type was skipped.
    Check(command::Check),
}

impl Subcommand {
    pub(crate) fn run(self, session: &Session) -> Fallible<ExitCode> {
        match self {
            Self::Generate(generate) => generate.run(session),
            Self::Check(check) => check.run(session),
        }
    }
}

fn styles() -> styling::Styles {
    styling::Styles::plain()
        .header(
            styling::AnsiColor::Yellow.on_default()
                | styling::Effects::BOLD
                | styling::Effects::ITALIC,
        )
        .usage(
            styling::AnsiColor::Yellow.on_default()
                | styling::Effects::BOLD
                | styling::Effects::ITALIC,
        )
        .literal(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::BrightBlue.on_default())
}
