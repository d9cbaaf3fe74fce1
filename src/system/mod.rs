//! Connection implementations for the MBeanConnection trait
//!
//! - `MemoryServer`: in-process bean table, used for snapshots and in tests

mod memory;

pub use memory::{MemoryBean, MemoryServer, OperationHandler};
