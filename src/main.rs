//! Binary entrypoint for the NeuroLine terminal client.

use std::process::ExitCode;

/// Start the interactive chat client against the configured backend.
fn main() -> ExitCode {
    neuroline::repl::run()
}
