use std::error::Error;

use log::{debug, error};
use logmsg_build::error::GenError;

use crate::style::format_error_cause;

/// Reports an error to the console. Its causes are only shown at the
/// verbose level.
pub fn report_error(err: &GenError) {
    error!("{err}");
    if let Some(details) = compose_error_details(err) {
        debug!("{details}");
    }
}

fn compose_error_details(err: &GenError) -> Option<String> {
    let mut current = err.source()?;
    let mut details = format_error_cause(current);
    while let Some(cause) = current.source() {
        details.push_str("\n\n");
        details.push_str(&format_error_cause(cause));
        current = cause;
    }
    Some(details)
}
