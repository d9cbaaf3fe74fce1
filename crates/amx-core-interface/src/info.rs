//! Introspection metadata returned by `MBeanConnection::get_info`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::Value;

/// Name -> value metadata fields describing a bean
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor {
    fields: BTreeMap<String, Value>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn field_value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub description: String,
    pub readable: bool,
    pub writable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub type_name: String,
}

/// What an operation does to the bean
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Read-only
    Info,
    /// Modifies state
    Action,
    /// Modifies state and returns information
    ActionInfo,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub signature: Vec<ParameterInfo>,
    pub return_type: String,
    #[serde(default)]
    pub impact: Impact,
}

/// Full introspection result for one bean
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MBeanInfo {
    pub class_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
    #[serde(default)]
    pub operations: Vec<OperationInfo>,
    #[serde(default)]
    pub descriptor: Descriptor,
}

impl MBeanInfo {
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn operation(&self, name: &str) -> Option<&OperationInfo> {
        self.operations.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_fields() {
        let desc = Descriptor::new()
            .with_field("amx.isSingleton", true)
            .with_field("amx.group", "monitoring");

        assert_eq!(desc.len(), 2);
        assert_eq!(
            desc.field_names().collect::<Vec<_>>(),
            vec!["amx.group", "amx.isSingleton"]
        );
        assert_eq!(desc.field_value("amx.isSingleton"), Some(&Value::Bool(true)));
        assert_eq!(desc.field_value("missing"), None);
    }

    #[test]
    fn test_info_lookup() {
        let info = MBeanInfo {
            class_name: "Cache".to_string(),
            attributes: vec![AttributeInfo {
                name: "Size".to_string(),
                type_name: "int".to_string(),
                description: String::new(),
                readable: true,
                writable: false,
            }],
            ..Default::default()
        };

        assert!(info.attribute("Size").is_some());
        assert!(info.attribute("Name").is_none());
        assert!(info.operation("clear").is_none());
    }
}
