//! Foreign object types
//!
//! A foreign type is the plain constructor-plus-prototype shape that knows
//! nothing about parent chains: one constructor that initializes a fresh
//! object, and a table of named methods shared by every object of the type.
//! `convert` adapts such a type into a `Class`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{ClassError, Value};

/// Foreign constructor; initializes a freshly created object
pub type ForeignCtor = dyn Fn(&ForeignObject, &[Value]) -> Result<(), ClassError> + Send + Sync;

/// Foreign prototype method
pub type ForeignFn = dyn Fn(&ForeignObject, &[Value]) -> Result<Value, ClassError> + Send + Sync;

/// A foreign object type
#[derive(Clone)]
pub struct ForeignType(Arc<ForeignTypeInner>);

struct ForeignTypeInner {
    name: String,
    constructor: Box<ForeignCtor>,
    prototype: RwLock<HashMap<String, Arc<ForeignFn>>>,
}

impl ForeignType {
    /// Create a foreign type with a constructor and an empty prototype
    pub fn new<F>(name: &str, constructor: F) -> Self
    where
        F: Fn(&ForeignObject, &[Value]) -> Result<(), ClassError> + Send + Sync + 'static,
    {
        Self(Arc::new(ForeignTypeInner {
            name: name.to_string(),
            constructor: Box::new(constructor),
            prototype: RwLock::new(HashMap::new()),
        }))
    }

    /// Create a foreign type whose constructor does nothing
    pub fn empty(name: &str) -> Self {
        Self::new(name, |_, _| Ok(()))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Add (or replace) a prototype method
    pub fn add_method<F>(&self, name: &str, f: F)
    where
        F: Fn(&ForeignObject, &[Value]) -> Result<Value, ClassError> + Send + Sync + 'static,
    {
        self.0.prototype.write().insert(name.to_string(), Arc::new(f));
    }

    /// Check if the prototype has a method
    pub fn has_method(&self, name: &str) -> bool {
        self.0.prototype.read().contains_key(name)
    }

    /// Names of all prototype methods, sorted
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.prototype.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Create an object and run the constructor on it
    pub fn instantiate(&self, args: &[Value]) -> Result<ForeignObject, ClassError> {
        let object = ForeignObject {
            ty: self.clone(),
            fields: Arc::new(RwLock::new(HashMap::new())),
        };
        (self.0.constructor)(&object, args)?;
        Ok(object)
    }

    fn method(&self, name: &str) -> Option<Arc<ForeignFn>> {
        self.0.prototype.read().get(name).cloned()
    }
}

impl PartialEq for ForeignType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ForeignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignType")
            .field("name", &self.0.name)
            .field("methods", &self.method_names())
            .finish()
    }
}

/// An object created by a foreign constructor
#[derive(Clone)]
pub struct ForeignObject {
    ty: ForeignType,
    fields: Arc<RwLock<HashMap<String, Value>>>,
}

impl ForeignObject {
    /// The type this object was constructed from
    pub fn foreign_type(&self) -> &ForeignType {
        &self.ty
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    /// Set a field value
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.fields.write().insert(name.to_string(), value.into());
    }

    /// Call a prototype method with this object as receiver
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ClassError> {
        let method = self
            .ty
            .method(name)
            .ok_or_else(|| ClassError::NoSuchForeignMethod {
                ty: self.ty.name().to_string(),
                name: name.to_string(),
            })?;
        method(self, args)
    }

    pub fn ptr_eq(&self, other: &ForeignObject) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}

impl fmt::Debug for ForeignObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignObject({})", self.ty.name())
    }
}
