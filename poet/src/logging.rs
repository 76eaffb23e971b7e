//! Diagnostic logging to stderr.
//!
//! `KTPOET_LOG` takes `RUST_LOG`-style directives, e.g.
//! `KTPOET_LOG=ktpoet_codegen=debug`. Without it only warnings are shown.
//! Rendered Kotlin goes to stdout, so logs never mix with it.

use tracing_subscriber::{EnvFilter, fmt};

const ENV_VAR: &str = "KTPOET_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

pub fn init() {
    let filter =
        EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    // Ignore a second initialisation, e.g. from tests.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
