mod cli;
mod command;
mod logger;
mod reporter;
mod session;
mod style;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use logmsg_build::error::ExitCode;

use crate::logger::Logger;
use crate::session::Session;

fn main() {
    let logmsg = match cli::Logmsg::try_parse() {
        Ok(logmsg) => logmsg,
        Err(error) => {
            let _ = error.print();
            match error.kind() {
                ClapErrorKind::DisplayHelp
                | ClapErrorKind::DisplayVersion
                | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    ExitCode::Success.exit()
                }
                _ => ExitCode::InvalidArguments.exit(),
            }
        }
    };

    if let Err(error) = Logger::init(logmsg.verbosity()) {
        eprintln!("Unable to initialize logging: {error}");
    }

    let session = Session::init();
    let exit_code = logmsg.run(&session).unwrap_or_else(|error| {
        reporter::report_error(&error);
        error.exit_code()
    });
    exit_code.exit();
}
