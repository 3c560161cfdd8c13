use crate::error::NationError;
use tracing_subscriber::EnvFilter;

/// Resolves the filter directive from CLI verbosity, falling back to config.
pub fn filter_directive(verbose: u8, quiet: bool, configured: &str) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over `directive`.
pub fn init(directive: &str) -> Result<(), NationError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive).map_err(|e| {
            NationError::Telemetry(format!("invalid log filter '{directive}': {e}"))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|e| NationError::Telemetry(e.to_string()))
}
