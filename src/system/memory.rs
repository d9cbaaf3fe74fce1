//! In-memory management server
//!
//! This provides an in-process implementation of MBeanConnection. A local bean
//! table is itself a valid connection, which makes it useful for browsing
//! snapshots and for driving `AmxClient` in tests without a network.

use amx_core_interface::{
    Attribute, AttributeInfo, AttributeList, ConnectionError, Descriptor, Impact, MBeanConnection,
    MBeanInfo, ObjectName, OperationInfo, ParameterInfo, Result, Value,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Body of an operation; an `Err` is reported as `ConnectionError::MBean`
pub type OperationHandler =
    Arc<dyn Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync>;

#[derive(Clone)]
struct Operation {
    info: OperationInfo,
    handler: OperationHandler,
}

/// One bean held by a `MemoryServer`
#[derive(Clone, Default)]
pub struct MemoryBean {
    class_name: String,
    description: String,
    attributes: BTreeMap<String, Value>,
    read_only: BTreeSet<String>,
    descriptor: Descriptor,
    operations: BTreeMap<String, Operation>,
}

impl MemoryBean {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a writable attribute
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add an attribute that rejects writes
    pub fn read_only_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.read_only.insert(name.clone());
        self.attributes.insert(name, value.into());
        self
    }

    /// Add a descriptor field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.descriptor.set_field(name, value);
        self
    }

    /// Add an operation. `signature` lists `(parameter name, type name)` pairs.
    pub fn operation<F>(
        mut self,
        name: impl Into<String>,
        signature: &[(&str, &str)],
        return_type: impl Into<String>,
        impact: Impact,
        handler: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        let name = name.into();
        let info = OperationInfo {
            name: name.clone(),
            description: String::new(),
            signature: signature
                .iter()
                .map(|(n, t)| ParameterInfo {
                    name: n.to_string(),
                    type_name: t.to_string(),
                })
                .collect(),
            return_type: return_type.into(),
            impact,
        };
        self.operations.insert(
            name,
            Operation {
                info,
                handler: Arc::new(handler),
            },
        );
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    /// Set an attribute without the read-only and type checks applied to remote writes
    pub fn put(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(attribute.into(), value.into());
    }

    fn info(&self) -> MBeanInfo {
        MBeanInfo {
            class_name: self.class_name.clone(),
            description: self.description.clone(),
            attributes: self
                .attributes
                .iter()
                .map(|(name, value)| AttributeInfo {
                    name: name.clone(),
                    type_name: value.type_name().to_string(),
                    description: String::new(),
                    readable: true,
                    writable: !self.read_only.contains(name),
                })
                .collect(),
            operations: self.operations.values().map(|op| op.info.clone()).collect(),
            descriptor: self.descriptor.clone(),
        }
    }

    /// Apply a remote write, enforcing read-only attributes and value kinds
    fn write(&mut self, name: &ObjectName, attribute: Attribute) -> Result<()> {
        let current = self
            .attributes
            .get(&attribute.name)
            .ok_or_else(|| ConnectionError::AttributeNotFound {
                object_name: name.clone(),
                attribute: attribute.name.clone(),
            })?;

        if self.read_only.contains(&attribute.name) {
            return Err(ConnectionError::InvalidAttributeValue {
                attribute: attribute.name,
                reason: "attribute is read-only".to_string(),
            });
        }

        if !current.is_null() && !attribute.value.is_null() && !current.same_kind(&attribute.value)
        {
            return Err(ConnectionError::InvalidAttributeValue {
                reason: format!(
                    "expected {} value, found {}",
                    current.type_name(),
                    attribute.value.type_name()
                ),
                attribute: attribute.name,
            });
        }

        self.attributes.insert(attribute.name, attribute.value);
        Ok(())
    }
}

impl fmt::Debug for MemoryBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBean")
            .field("class_name", &self.class_name)
            .field("attributes", &self.attributes)
            .field("read_only", &self.read_only)
            .field("descriptor", &self.descriptor)
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// In-memory bean table implementing `MBeanConnection`
///
/// Cloning shares the same table.
///
/// # Example
///
/// ```rust
/// use amx::system::{MemoryBean, MemoryServer};
/// use amx_core_interface::{MBeanConnection, Value};
///
/// # tokio_test::block_on(async {
/// let server = MemoryServer::new();
/// let name = "amx:type=cache,name=cache-0".parse().unwrap();
/// server.insert(name, MemoryBean::new("Cache").attribute("Size", 42i64));
///
/// let size = server.get_attribute(&"amx:type=cache,name=cache-0".parse().unwrap(), "Size").await;
/// assert_eq!(size.unwrap(), Value::Int(42));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryServer {
    beans: Arc<RwLock<HashMap<ObjectName, MemoryBean>>>,
}

impl MemoryServer {
    /// Create a new empty server
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a bean, returning the one it replaced
    pub fn insert(&self, name: ObjectName, bean: MemoryBean) -> Option<MemoryBean> {
        self.beans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, bean)
    }

    pub fn remove(&self, name: &ObjectName) -> Option<MemoryBean> {
        self.beans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn contains(&self, name: &ObjectName) -> bool {
        self.beans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Names of all beans, sorted by canonical name
    pub fn names(&self) -> Vec<ObjectName> {
        let mut names: Vec<_> = self
            .beans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort_by(|a, b| a.canonical_name().cmp(b.canonical_name()));
        names
    }

    pub fn len(&self) -> usize {
        self.beans.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of one bean's current state
    pub fn bean(&self, name: &ObjectName) -> Option<MemoryBean> {
        self.beans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Run `f` against a bean under the read lock
    fn with_bean<T>(
        &self,
        name: &ObjectName,
        f: impl FnOnce(&MemoryBean) -> Result<T>,
    ) -> Result<T> {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        let bean = beans
            .get(name)
            .ok_or_else(|| ConnectionError::InstanceNotFound(name.clone()))?;
        f(bean)
    }

    /// Run `f` against a bean under the write lock
    fn with_bean_mut<T>(
        &self,
        name: &ObjectName,
        f: impl FnOnce(&mut MemoryBean) -> Result<T>,
    ) -> Result<T> {
        let mut beans = self.beans.write().unwrap_or_else(PoisonError::into_inner);
        let bean = beans
            .get_mut(name)
            .ok_or_else(|| ConnectionError::InstanceNotFound(name.clone()))?;
        f(bean)
    }
}

#[async_trait::async_trait]
impl MBeanConnection for MemoryServer {
    async fn get_attribute(&self, name: &ObjectName, attribute: &str) -> Result<Value> {
        self.with_bean(name, |bean| {
            bean.get(attribute)
                .cloned()
                .ok_or_else(|| ConnectionError::AttributeNotFound {
                    object_name: name.clone(),
                    attribute: attribute.to_string(),
                })
        })
    }

    async fn set_attribute(&self, name: &ObjectName, attribute: Attribute) -> Result<()> {
        self.with_bean_mut(name, |bean| bean.write(name, attribute))
    }

    async fn get_attributes(
        &self,
        name: &ObjectName,
        attributes: &[String],
    ) -> Result<AttributeList> {
        self.with_bean(name, |bean| {
            Ok(attributes
                .iter()
                .filter_map(|a| bean.get(a).map(|v| Attribute::new(a.as_str(), v.clone())))
                .collect())
        })
    }

    async fn set_attributes(
        &self,
        name: &ObjectName,
        attributes: AttributeList,
    ) -> Result<AttributeList> {
        self.with_bean_mut(name, |bean| {
            let mut applied = Vec::with_capacity(attributes.len());
            for attribute in attributes {
                match bean.write(name, attribute.clone()) {
                    Ok(()) => applied.push(attribute),
                    Err(e) => debug!("Skipping {} on {}: {}", attribute.name, name, e),
                }
            }
            Ok(applied)
        })
    }

    async fn invoke(
        &self,
        name: &ObjectName,
        operation: &str,
        params: Vec<Value>,
        signature: Vec<String>,
    ) -> Result<Value> {
        let op = self.with_bean(name, |bean| {
            bean.operations.get(operation).cloned().ok_or_else(|| {
                ConnectionError::Reflection(format!("No such operation: {}", operation))
            })
        })?;

        let expected: Vec<&str> = op
            .info
            .signature
            .iter()
            .map(|p| p.type_name.as_str())
            .collect();
        if !signature.is_empty()
            && signature
                .iter()
                .map(String::as_str)
                .ne(expected.iter().copied())
        {
            return Err(ConnectionError::Reflection(format!(
                "No operation {}({}) on {}",
                operation,
                signature.join(", "),
                name
            )));
        }
        if params.len() != expected.len() {
            return Err(ConnectionError::RuntimeOperations(format!(
                "{} expects {} parameters, got {}",
                operation,
                expected.len(),
                params.len()
            )));
        }

        debug!("Running {} on {}", operation, name);
        (op.handler)(&params).map_err(ConnectionError::MBean)
    }

    async fn get_info(&self, name: &ObjectName) -> Result<MBeanInfo> {
        self.with_bean(name, |bean| Ok(bean.info()))
    }
}
