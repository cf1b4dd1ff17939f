//! Lifecycle events of one greenlight invocation.

use tracing::{error, info};

use crate::errors::GreenlightError;

pub fn log_command_started(command: &str) {
    info!(
        event = "core.greenlight.command_started",
        command = command,
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_command_finished(command: &str, succeeded: bool) {
    info!(
        event = "core.greenlight.command_finished",
        command = command,
        succeeded = succeeded
    );
}

/// Log a failure with its stable error code. User errors (bad id, bad URL)
/// are tagged so they can be told apart from backend trouble.
pub fn log_greenlight_error(error: &dyn GreenlightError) {
    error!(
        event = "core.greenlight.error_occurred",
        error = %error,
        error_code = error.error_code(),
        user_error = error.is_user_error()
    );
}
