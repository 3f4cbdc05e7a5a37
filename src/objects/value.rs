//! Dynamic values stored in instance and class members

use super::{Class, ForeignObject, Instance};

/// A value held by a member
///
/// Plain data is kept as JSON-compatible values; instances, classes and
/// foreign objects are shared handles, so copying a `Value` never copies the
/// object behind it.
#[derive(Debug, Clone)]
pub enum Value {
    /// Plain data (null, booleans, numbers, strings, arrays, maps)
    Data(serde_json::Value),
    /// An instance of some class
    Instance(Instance),
    /// A class
    Class(Class),
    /// An object built by a foreign constructor
    Foreign(ForeignObject),
}

impl Value {
    /// The null value
    pub fn null() -> Self {
        Value::Data(serde_json::Value::Null)
    }

    /// Check if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Data(serde_json::Value::Null))
    }

    /// Get the plain data, if this is a data value
    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Data(v) => Some(v),
            _ => None,
        }
    }

    /// Get value as string
    pub fn as_str(&self) -> Option<&str> {
        self.as_data().and_then(|v| v.as_str())
    }

    /// Get value as i64
    pub fn as_i64(&self) -> Option<i64> {
        self.as_data().and_then(|v| v.as_i64())
    }

    /// Get value as f64
    pub fn as_f64(&self) -> Option<f64> {
        self.as_data().and_then(|v| v.as_f64())
    }

    /// Get value as bool
    pub fn as_bool(&self) -> Option<bool> {
        self.as_data().and_then(|v| v.as_bool())
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Value::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_foreign(&self) -> Option<&ForeignObject> {
        match self {
            Value::Foreign(f) => Some(f),
            _ => None,
        }
    }

    /// Short name of the value's kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Data(_) => "data",
            Value::Instance(_) => "instance",
            Value::Class(_) => "class",
            Value::Foreign(_) => "foreign",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

/// Data compares by value, handles compare by identity
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Data(a), Value::Data(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => a.ptr_eq(b),
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Foreign(a), Value::Foreign(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Data(v)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::null()
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Data(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Data(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Data(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Data(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Data(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Data(v.into())
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Value::Instance(v)
    }
}

impl From<Class> for Value {
    fn from(v: Class) -> Self {
        Value::Class(v)
    }
}

impl From<ForeignObject> for Value {
    fn from(v: ForeignObject) -> Self {
        Value::Foreign(v)
    }
}
