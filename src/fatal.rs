//! Fatal error handling.
//!
//! Kiosk deployments favor a visible crash plus an external supervisor
//! restart over degraded operation, so there is exactly one sink for
//! unrecoverable runtime errors and it terminates the process. Callers at
//! asynchronous boundaries (server startup, window creation, URL
//! resolution) invoke it explicitly instead of relying on ambient
//! process-level hooks.

/// Exit code for unrecoverable runtime errors. Distinct from the exit
/// code `1` used for CLI and validation failures.
pub const FATAL_EXIT_CODE: i32 = 255;

/// Logs a fatal error and terminates the process with [`FATAL_EXIT_CODE`].
pub fn exit_with(context: &str, error: &dyn std::fmt::Display) -> ! {
    tracing::error!(error = %error, "{context}");
    eprintln!("{context}: {error}");
    std::process::exit(FATAL_EXIT_CODE);
}
