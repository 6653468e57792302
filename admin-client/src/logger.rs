//! Logging setup for hosts embedding the link board
//!
//! `RUST_LOG` wins over the level passed in. JSON output is meant for
//! hosted deployments, the plain format for local development.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter when neither `RUST_LOG` nor a level is supplied
pub const DEFAULT_LEVEL: &str = "info";

/// Install the global subscriber.
///
/// # Examples
/// ```no_run
/// admin_client::logger::init_logger("debug", false)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false),
            )
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init_logger(DEFAULT_LEVEL, false);
        assert!(init_logger(DEFAULT_LEVEL, true).is_err());
    }
}
