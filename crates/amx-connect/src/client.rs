//! AmxClient: a proxy for one remote management bean

use amx_core_interface::{
    Attribute, AttributeList, MBeanConnection, MBeanInfo, ObjectName, Value, ValueTypeError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

use crate::error::{InvokeError, RemoteAccessError};

pub type Result<T> = std::result::Result<T, RemoteAccessError>;

/// Navigation interface of an AMX bean: its name, metadata and place in the tree.
#[async_trait]
pub trait AmxMBean: Sized + Send + Sync {
    /// The bean's `Name` attribute
    async fn name(&self) -> Result<String>;

    /// Descriptor fields from the bean's introspection metadata
    async fn meta(&self) -> Result<HashMap<String, Value>>;

    /// The containing bean, or `None` at the root
    async fn parent(&self) -> Result<Option<Self>>;

    /// Directly contained beans, in the order the bean reports them.
    ///
    /// Null and sentinel entries are removed, so positions need not match the
    /// remote `Children` array.
    async fn children(&self) -> Result<Vec<Self>>;
}

/// A proxy that forwards every call to a bean on a (possibly remote) connection.
///
/// The proxy only holds the connection and the bean's `ObjectName`; every call
/// is one round trip on the connection. Parent and child proxies are created on
/// demand and share the same connection. Cloning is cheap.
///
/// Equality, hashing and `Display` depend on the object name alone; two proxies
/// for the same name are equal even when they were built on different connections.
///
/// # Example
///
/// ```rust,no_run
/// use amx_connect::{AmxClient, AmxMBean};
/// use amx_core_interface::{MBeanConnection, ObjectName};
/// use std::sync::Arc;
///
/// # async fn example(conn: Arc<dyn MBeanConnection>) -> anyhow::Result<()> {
/// let root = AmxClient::new(conn, "amx:pp=,type=domain-root".parse()?);
///
/// for child in root.children().await? {
///     println!("{} -> {}", child, child.name().await?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AmxClient {
    /// Shared connection; not owned by any one proxy
    connection: Arc<dyn MBeanConnection>,

    object_name: ObjectName,
}

impl AmxClient {
    /// Create a proxy for `object_name` on `connection`.
    ///
    /// Nothing is checked here; a name that is not registered only shows up
    /// as an error on the first call.
    pub fn new(connection: Arc<dyn MBeanConnection>, object_name: ObjectName) -> Self {
        Self {
            connection,
            object_name,
        }
    }

    /// The bean this proxy addresses
    pub fn object_name(&self) -> &ObjectName {
        &self.object_name
    }

    pub fn connection(&self) -> &Arc<dyn MBeanConnection> {
        &self.connection
    }

    /// Proxy for `name` on the same connection, or `None` for a null reference
    fn make_amx(&self, name: Option<ObjectName>) -> Option<AmxClient> {
        name.map(|on| AmxClient::new(self.connection.clone(), on))
    }

    /// Read `attribute` and convert it, mapping null references to `None`.
    /// Failures are labelled with `operation`.
    async fn fetch_attribute<T>(
        &self,
        operation: &'static str,
        attribute: &str,
    ) -> Result<Option<T>>
    where
        T: TryFrom<Value, Error = ValueTypeError>,
    {
        debug!("Fetching {} from {}", attribute, self.object_name);

        let value = self
            .connection
            .get_attribute(&self.object_name, attribute)
            .await
            .map_err(|e| RemoteAccessError::connection(operation, e))?;

        if value.is_null_reference() {
            return Ok(None);
        }

        T::try_from(value)
            .map(Some)
            .map_err(|source| RemoteAccessError::UnexpectedType {
                operation,
                attribute: attribute.to_string(),
                source,
            })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Dynamic attribute access
    // ═══════════════════════════════════════════════════════════════════════

    pub async fn get_attribute(&self, attribute: &str) -> Result<Value> {
        debug!("getAttribute {} on {}", attribute, self.object_name);

        self.connection
            .get_attribute(&self.object_name, attribute)
            .await
            .map_err(|e| RemoteAccessError::connection("getAttribute", e))
    }

    pub async fn set_attribute(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_attribute_entry(Attribute::new(name, value)).await
    }

    pub async fn set_attribute_entry(&self, attribute: Attribute) -> Result<()> {
        debug!("setAttribute {} on {}", attribute.name, self.object_name);

        self.connection
            .set_attribute(&self.object_name, attribute)
            .await
            .map_err(|e| RemoteAccessError::connection("setAttribute", e))
    }

    pub async fn get_attributes(&self, attributes: &[String]) -> Result<AttributeList> {
        debug!(
            "getAttributes ({} names) on {}",
            attributes.len(),
            self.object_name
        );

        self.connection
            .get_attributes(&self.object_name, attributes)
            .await
            .map_err(|e| RemoteAccessError::connection("getAttributes", e))
    }

    /// Write several attributes; returns those the bean actually accepted
    pub async fn set_attributes(&self, attributes: AttributeList) -> Result<AttributeList> {
        debug!(
            "setAttributes ({} values) on {}",
            attributes.len(),
            self.object_name
        );

        self.connection
            .set_attributes(&self.object_name, attributes)
            .await
            .map_err(|e| RemoteAccessError::connection("setAttributes", e))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Operations and introspection
    // ═══════════════════════════════════════════════════════════════════════

    /// Invoke an operation on the bean.
    ///
    /// # Errors
    ///
    /// - `InvokeError::Operation` if the operation ran and failed
    /// - `InvokeError::Reflection` if the bean has no matching operation
    /// - `InvokeError::Access` for everything else (missing bean, transport)
    pub async fn invoke(
        &self,
        operation: &str,
        params: Vec<Value>,
        signature: Vec<String>,
    ) -> std::result::Result<Value, InvokeError> {
        debug!(
            "invoke {}({} params) on {}",
            operation,
            params.len(),
            self.object_name
        );

        Ok(self
            .connection
            .invoke(&self.object_name, operation, params, signature)
            .await?)
    }

    pub async fn mbean_info(&self) -> Result<MBeanInfo> {
        debug!("getMBeanInfo on {}", self.object_name);

        self.connection
            .get_info(&self.object_name)
            .await
            .map_err(|e| RemoteAccessError::connection("getMBeanInfo", e))
    }
}

#[async_trait]
impl AmxMBean for AmxClient {
    async fn name(&self) -> Result<String> {
        self.fetch_attribute::<String>("getName", "Name")
            .await?
            .ok_or_else(|| RemoteAccessError::UnexpectedType {
                operation: "getName",
                attribute: "Name".to_string(),
                source: ValueTypeError {
                    expected: "string",
                    found: "null",
                },
            })
    }

    async fn meta(&self) -> Result<HashMap<String, Value>> {
        let info = self
            .connection
            .get_info(&self.object_name)
            .await
            .map_err(|e| RemoteAccessError::connection("getMBeanInfo", e))?;

        Ok(info
            .descriptor
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect())
    }

    async fn parent(&self) -> Result<Option<AmxClient>> {
        let parent = self
            .fetch_attribute::<ObjectName>("getParent", "Parent")
            .await?;
        Ok(self.make_amx(parent))
    }

    async fn children(&self) -> Result<Vec<AmxClient>> {
        let Some(entries) = self
            .fetch_attribute::<Vec<Value>>("getChildren", "Children")
            .await?
        else {
            return Ok(Vec::new());
        };

        let mut result = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry
                .into_reference()
                .map_err(|source| RemoteAccessError::UnexpectedType {
                    operation: "getChildren",
                    attribute: "Children".to_string(),
                    source,
                })?;
            result.extend(self.make_amx(name));
        }

        Ok(result)
    }
}

impl PartialEq for AmxClient {
    fn eq(&self, other: &Self) -> bool {
        self.object_name == other.object_name
    }
}

impl Eq for AmxClient {}

impl Hash for AmxClient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object_name.hash(state);
    }
}

impl fmt::Display for AmxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AmxClient[{}]", self.object_name)
    }
}

impl fmt::Debug for AmxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmxClient")
            .field("object_name", &self.object_name)
            .finish_non_exhaustive()
    }
}
