//! AMX Connect: client-side proxies for remote management beans
//!
//! This crate lets a caller walk and manipulate a tree of management beans
//! held by a (possibly remote) server, through any `MBeanConnection`.
//!
//! # Architecture
//!
//! - **AmxClient**: Proxy for one bean; forwards attribute, operation and
//!   introspection calls to the connection and wraps failures in one error type
//! - **AmxMBean**: Navigation trait (`name`, `meta`, `parent`, `children`)
//!   implemented by `AmxClient`
//!
//! # Example
//!
//! ```rust,no_run
//! use amx_connect::{AmxClient, AmxMBean};
//! use amx_core_interface::MBeanConnection;
//! use std::sync::Arc;
//!
//! async fn example(conn: Arc<dyn MBeanConnection>) -> anyhow::Result<()> {
//!     let cache = AmxClient::new(conn, "amx:pp=/,type=cache,name=cache-0".parse()?);
//!
//!     println!("{} has {}", cache.name().await?, cache.get_attribute("Size").await?);
//!     if let Some(parent) = cache.parent().await? {
//!         println!("parent: {}", parent);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

pub use client::{AmxClient, AmxMBean};
pub use error::{InvokeError, RemoteAccessError};
