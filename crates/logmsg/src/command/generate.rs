use std::path::PathBuf;

use log::{info, warn};
use logmsg_build::error::{ErrorKind, ExitCode, Fallible};

use crate::command::{Command, Sources};
use crate::session::Session;

#[derive(clap::Args)]
pub struct Generate {
    #[command(flatten)]
    sources: Sources,

    /// Directory to write generated files to [default: `out_dir` from the configuration]
    #[arg(long, value_name = "dir")]
    out_dir: Option<PathBuf>,

    /// Only verifies that the generated files are up to date
    #[arg(long)]
    check: bool,
}

impl Command for Generate {
    fn run(self, session: &Session) -> Fallible<ExitCode> {
        let mut generator = self.sources.generator(session)?;
        if let Some(dir) = self.out_dir {
            generator = generator.out_dir(dir);
        }

        if self.check {
            let stale = generator.stale()?;
            for path in &stale {
                warn!("{} is out of date", path.display());
            }
            if !stale.is_empty() {
                return Err(ErrorKind::OutOfDate { count: stale.len() }.into());
            }
            info!("Generated files are up to date");
            return Ok(ExitCode::Success);
        }

        for path in generator.write()? {
            info!("Wrote {}", path.display());
        }
        Ok(ExitCode::Success)
    }
}
