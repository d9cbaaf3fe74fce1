//! Dynamically typed attribute and operation values

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::name::ObjectName;

/// A typed extraction found a value of a different kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} value, found {found}")]
pub struct ValueTypeError {
    pub expected: &'static str,
    pub found: &'static str,
}

/// Value of an attribute, operation parameter or operation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    ObjectName(ObjectName),
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the value's kind, as used in error messages and type descriptions
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::ObjectName(_) => "object_name",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for `Null` and for the reserved null object name
    pub fn is_null_reference(&self) -> bool {
        match self {
            Value::Null => true,
            Value::ObjectName(name) => name.is_null(),
            _ => false,
        }
    }

    /// Whether both values are of the same kind
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Interpret this value as a reference to another bean.
    ///
    /// `Null` and the reserved null object name both become `None`; any
    /// other object name is returned as-is.
    pub fn into_reference(self) -> Result<Option<ObjectName>, ValueTypeError> {
        match self {
            Value::Null => Ok(None),
            Value::ObjectName(name) if name.is_null() => Ok(None),
            Value::ObjectName(name) => Ok(Some(name)),
            other => Err(ValueTypeError {
                expected: "object_name",
                found: other.type_name(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::ObjectName(name) => write!(f, "{}", name),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

macro_rules! value_conversions {
    ($($ty:ty => $variant:ident, $kind:literal;)*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = ValueTypeError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(ValueTypeError {
                            expected: $kind,
                            found: other.type_name(),
                        }),
                    }
                }
            }
        )*
    };
}

value_conversions! {
    bool => Bool, "bool";
    i64 => Int, "int";
    f64 => Float, "float";
    String => String, "string";
    ObjectName => ObjectName, "object_name";
    Vec<Value> => Array, "array";
}

/// A named attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

pub type AttributeList = Vec<Attribute>;
