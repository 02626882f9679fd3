use log::info;
use logmsg_build::error::{ErrorKind, ExitCode, Fallible};

use crate::command::{Command, Sources};
use crate::session::Session;

#[derive(clap::Args)]
pub struct Check {
    #[command(flatten)]
    sources: Sources,
}

impl Command for Check {
    fn run(self, session: &Session) -> Fallible<ExitCode> {
        let collection = self.sources.generator(session)?.collect()?;

        for (declaration, binding, event_id) in collection.messages() {
            info!(
                "{}::{} {} (event id {event_id})",
                declaration.namespace(),
                declaration.type_name(),
                binding.name()
            );
        }

        // Each diagnostic was already logged as a warning while collecting.
        let count = collection.diagnostics.len();
        if count > 0 {
            return Err(ErrorKind::DiagnosticsReported { count }.into());
        }
        Ok(ExitCode::Success)
    }
}
