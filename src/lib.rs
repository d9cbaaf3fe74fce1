/*!
 * AMX - browse and manage trees of management beans
 *
 * The client side of an AMX deployment:
 * - `AmxClient` proxies (from `amx-connect`) over any `MBeanConnection`
 * - An in-memory connection (`system::MemoryServer`) fed from JSON snapshots
 * - Tree walks and table rendering for the `amx` CLI
 * - TOML configuration and structured logging
 */

pub mod browse;
pub mod cli_style;
pub mod config;
pub mod error;
pub mod logging;
pub mod snapshot;
pub mod system;

// Re-export commonly used types
pub use amx_connect::{AmxClient, AmxMBean, InvokeError, RemoteAccessError};
pub use amx_core_interface::{MBeanConnection, ObjectName, Value};
pub use config::{ClientConfig, LogLevel};
pub use error::{AmxError, Result};
pub use system::{MemoryBean, MemoryServer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
