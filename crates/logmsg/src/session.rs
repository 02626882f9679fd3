//! State shared by every command of a single `logmsg` invocation.

use log::debug;
use logmsg_build::logmsg_core::CancellationToken;

pub struct Session {
    cancellation: CancellationToken,
}

impl Session {
    /// Creates the session and routes Ctrl-C to its cancellation token.
    pub fn init() -> Self {
        let cancellation = CancellationToken::new();
        let handler = cancellation.clone();
        if let Err(error) = ctrlc::set_handler(move || handler.cancel()) {
            debug!("Could not install the Ctrl-C handler: {error}");
        }
        Self { cancellation }
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }
}
