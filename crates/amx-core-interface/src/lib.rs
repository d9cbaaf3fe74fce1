//! AMX Core Interface: the management-bean connection abstraction
//!
//! This crate defines the `MBeanConnection` trait, which is the only capability
//! an AMX client consumes from a (possibly remote) management server, together
//! with the value types that cross it.
//!
//! # Architecture
//!
//! The `MBeanConnection` trait provides three categories of operations:
//!
//! 1. **Attributes**: Read and write single attributes or batches of them
//! 2. **Operations**: Invoke a named operation with parameters and a signature
//! 3. **Introspection**: Fetch the `MBeanInfo` describing a bean
//!
//! # Example
//!
//! ```rust,no_run
//! use amx_core_interface::{MBeanConnection, ObjectName};
//!
//! async fn cache_size<C: MBeanConnection>(conn: &C) -> anyhow::Result<i64> {
//!     let name: ObjectName = "amx:pp=/,type=cache,name=cache-0".parse()?;
//!     let size = conn.get_attribute(&name, "Size").await?;
//!     Ok(i64::try_from(size)?)
//! }
//! ```
//!
//! # Null references
//!
//! Beans report "no object" for reference-valued attributes with the reserved
//! name [`NULL_OBJECT_NAME`] (`null:type=Null,name=Null`). `Value::into_reference`
//! turns both that name and `Value::Null` into `None`.

use async_trait::async_trait;
use thiserror::Error;

mod info;
mod name;
mod value;

pub use info::{AttributeInfo, Descriptor, Impact, MBeanInfo, OperationInfo, ParameterInfo};
pub use name::{MalformedObjectName, ObjectName, NULL_OBJECT_NAME, NULL_OBJECT_NAME_STR};
pub use value::{Attribute, AttributeList, Value, ValueTypeError};

/// Failure kinds a management connection can report
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Instance not found: {0}")]
    InstanceNotFound(ObjectName),

    #[error("Attribute {attribute} not found on {object_name}")]
    AttributeNotFound {
        object_name: ObjectName,
        attribute: String,
    },

    #[error("Invalid value for attribute {attribute}: {reason}")]
    InvalidAttributeValue { attribute: String, reason: String },

    /// The bean's own accessor or operation failed
    #[error("MBean operation failed: {0}")]
    MBean(String),

    #[error("Reflection error: {0}")]
    Reflection(String),

    #[error("Introspection error: {0}")]
    Introspection(String),

    #[error("Runtime operations error: {0}")]
    RuntimeOperations(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ConnectionError>;

/// A channel to a management server holding beans addressed by `ObjectName`
///
/// Implementations:
/// - an in-process bean table (see the `amx` crate's `MemoryServer`)
/// - network clients speaking a management protocol
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so that one connection can
/// be shared by many proxies behind an `Arc`. Whether concurrent calls are
/// serialised is up to the implementation.
#[async_trait]
pub trait MBeanConnection: Send + Sync + 'static {
    // ═══════════════════════════════════════════════════════════════════════
    // 1. Attribute Operations
    // ═══════════════════════════════════════════════════════════════════════

    /// Read one attribute
    ///
    /// # Errors
    ///
    /// `InstanceNotFound` if no bean has this name, `AttributeNotFound` if the
    /// bean has no such attribute.
    async fn get_attribute(&self, name: &ObjectName, attribute: &str) -> Result<Value>;

    /// Write one attribute
    ///
    /// # Errors
    ///
    /// Additionally returns `InvalidAttributeValue` when the bean rejects the value.
    async fn set_attribute(&self, name: &ObjectName, attribute: Attribute) -> Result<()>;

    /// Read several attributes in one round trip
    ///
    /// Attributes that cannot be read are left out of the result rather than
    /// failing the whole call.
    async fn get_attributes(&self, name: &ObjectName, attributes: &[String])
        -> Result<AttributeList>;

    /// Write several attributes in one round trip
    ///
    /// Returns the attributes that were actually set.
    async fn set_attributes(
        &self,
        name: &ObjectName,
        attributes: AttributeList,
    ) -> Result<AttributeList>;

    // ═══════════════════════════════════════════════════════════════════════
    // 2. Operation Invocation
    // ═══════════════════════════════════════════════════════════════════════

    /// Invoke a named operation
    ///
    /// `signature` holds the parameter type names used to pick an overload.
    ///
    /// # Errors
    ///
    /// `MBean` when the operation itself fails, `Reflection` when no matching
    /// operation exists.
    async fn invoke(
        &self,
        name: &ObjectName,
        operation: &str,
        params: Vec<Value>,
        signature: Vec<String>,
    ) -> Result<Value>;

    // ═══════════════════════════════════════════════════════════════════════
    // 3. Introspection
    // ═══════════════════════════════════════════════════════════════════════

    /// Fetch the bean's introspection metadata, including its descriptor
    async fn get_info(&self, name: &ObjectName) -> Result<MBeanInfo>;
}

/// Convenience methods derived from the core trait
#[async_trait]
pub trait MBeanConnectionExt: MBeanConnection {
    /// Check whether a bean is registered under `name`
    async fn is_registered(&self, name: &ObjectName) -> bool {
        self.get_info(name).await.is_ok()
    }
}

// Blanket implementation for all MBeanConnection implementations
impl<T: MBeanConnection + ?Sized> MBeanConnectionExt for T {}
