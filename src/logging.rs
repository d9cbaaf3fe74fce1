/*!
 * Logging and tracing initialization
 */

use std::fs::File;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::ClientConfig;
use crate::error::{AmxError, Result};

/// Crates whose events the default filter lets through
const LOG_TARGETS: [&str; 3] = ["amx", "amx_connect", "amx_core_interface"];

/// Level the subscriber is set to for this configuration
pub fn effective_level(config: &ClientConfig) -> Level {
    if config.verbose {
        Level::DEBUG
    } else {
        config.log_level.to_tracing_level()
    }
}

/// Filter directives enabling every AMX crate at `level`, e.g. `amx=info,amx_connect=info,...`
pub fn default_directives(level: Level) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level.as_str().to_lowercase()))
        .collect::<Vec<_>>()
        .join(",")
}

/// `RUST_LOG` when set, otherwise the AMX crates at `level`
fn build_filter(level: Level) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))
        .map_err(|e| AmxError::Config(format!("Failed to create log filter: {}", e)))
}

/// Initialize structured logging based on configuration.
///
/// Events go to stderr so stdout stays free for command output, or to
/// `log_file` as JSON lines when one is configured.
pub fn init_logging(config: &ClientConfig) -> Result<()> {
    let env_filter = build_filter(effective_level(config))?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_file {
        Some(ref log_path) => {
            let file = File::create(log_path).map_err(|e| {
                AmxError::Config(format!(
                    "Failed to create log file {}: {}",
                    log_path.display(),
                    e
                ))
            })?;
            registry
                .with(
                    fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_file(true)
                        .with_line_number(true)
                        .json(),
                )
                .init();
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_span_events(FmtSpan::NONE)
                        .compact(),
                )
                .init();
        }
    }

    Ok(())
}

/// Route AMX debug events to the test harness's captured output
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(default_directives(Level::DEBUG)))
        .with(fmt::layer().with_test_writer().with_target(false).compact())
        .try_init();
}
