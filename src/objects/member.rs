//! Instance and class-level member tables
//!
//! A member table maps names to plain values or callables. This module owns
//! the merge policy applied when a class is extended:
//! - inherited entries first, declared entries overlaid on top (child wins)
//! - a declared method gets a super binding iff the parent table holds a
//!   method of the same name
//! - declared values replace same-named members as-is
//! - class-level members are copied by handle and never removed

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::{Class, ClassError, Instance, Options, Scope, Value};

/// Body of an instance method
pub type MethodFn = dyn Fn(&Scope<'_>, &[Value]) -> Result<Value, ClassError> + Send + Sync;

/// Body of a class-level function; receives the class it is invoked through
pub type ClassFn = dyn Fn(&Class, &[Value]) -> Result<Value, ClassError> + Send + Sync;

/// Instance member table
pub type MemberTable = HashMap<String, Member>;

/// Class-level member table
pub type ClassMemberTable = HashMap<String, ClassMember>;

/// An instance method
///
/// Declared methods are unbound. When a class is built, each declared method
/// is bound to its name, to the same-named method of the parent (if any) and
/// to the defining class's options. Bound methods are immutable and cheap to
/// clone.
#[derive(Clone)]
pub struct Method {
    inner: Arc<MethodInner>,
}

struct MethodInner {
    name: Option<String>,
    body: Arc<MethodFn>,
    parent: Option<Method>,
    expose_class_members: bool,
}

impl Method {
    /// Create an unbound method from a body
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Scope<'_>, &[Value]) -> Result<Value, ClassError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(MethodInner {
                name: None,
                body: Arc::new(body),
                parent: None,
                expose_class_members: false,
            }),
        }
    }

    /// Name the method was bound to, None while unbound
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// The overridden parent method captured at definition time
    pub fn parent(&self) -> Option<&Method> {
        self.inner.parent.as_ref()
    }

    /// Check if this method overrides a parent method
    pub fn has_parent(&self) -> bool {
        self.inner.parent.is_some()
    }

    /// Check if class members resolve from inside this method's body
    pub fn exposes_class_members(&self) -> bool {
        self.inner.expose_class_members
    }

    /// Check if two handles refer to the same bound method
    pub fn ptr_eq(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run the method body with `this` as receiver
    pub fn invoke(&self, this: &Instance, args: &[Value]) -> Result<Value, ClassError> {
        self.invoke_within(this, args, false)
    }

    /// Run the method body from inside another call. Class members exposed
    /// by the caller stay visible to this body.
    pub(crate) fn invoke_within(
        &self,
        this: &Instance,
        args: &[Value],
        exposing: bool,
    ) -> Result<Value, ClassError> {
        let scope = Scope::new(this, self, exposing || self.exposes_class_members());
        (self.inner.body)(&scope, args)
    }

    fn bind(&self, name: &str, parent: Option<Method>, options: Options) -> Method {
        Method {
            inner: Arc::new(MethodInner {
                name: Some(name.to_string()),
                body: self.inner.body.clone(),
                parent,
                expose_class_members: options.expose_class_members,
            }),
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.inner.name)
            .field("overrides", &self.has_parent())
            .finish()
    }
}

/// A class-level function
#[derive(Clone)]
pub struct ClassFunction(Arc<ClassFn>);

impl ClassFunction {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Class, &[Value]) -> Result<Value, ClassError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the function with `receiver` as the effective class
    pub fn invoke(&self, receiver: &Class, args: &[Value]) -> Result<Value, ClassError> {
        trace!(class = %receiver, "calling class function");
        (self.0)(receiver, args)
    }

    pub fn ptr_eq(&self, other: &ClassFunction) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ClassFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClassFunction")
    }
}

/// An entry in an instance member table
#[derive(Debug, Clone)]
pub enum Member {
    Value(Value),
    Method(Method),
}

impl Member {
    pub fn is_callable(&self) -> bool {
        matches!(self, Member::Method(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Member::Value(v) => Some(v),
            Member::Method(_) => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Member::Method(m) => Some(m),
            Member::Value(_) => None,
        }
    }
}

impl From<Value> for Member {
    fn from(v: Value) -> Self {
        Member::Value(v)
    }
}

impl From<Method> for Member {
    fn from(m: Method) -> Self {
        Member::Method(m)
    }
}

/// An entry in a class-level member table
#[derive(Debug, Clone)]
pub enum ClassMember {
    Value(Value),
    Function(ClassFunction),
}

impl ClassMember {
    pub fn is_callable(&self) -> bool {
        matches!(self, ClassMember::Function(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ClassMember::Value(v) => Some(v),
            ClassMember::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&ClassFunction> {
        match self {
            ClassMember::Function(f) => Some(f),
            ClassMember::Value(_) => None,
        }
    }
}

impl From<Value> for ClassMember {
    fn from(v: Value) -> Self {
        ClassMember::Value(v)
    }
}

impl From<ClassFunction> for ClassMember {
    fn from(f: ClassFunction) -> Self {
        ClassMember::Function(f)
    }
}

/// Build a child's instance table from the parent's prototype table
pub(crate) fn overlay_instance_members(
    parent: &MemberTable,
    declared: MemberTable,
    options: Options,
) -> MemberTable {
    let mut table = parent.clone();

    for (name, member) in declared {
        let member = match member {
            Member::Method(method) => {
                let overridden = parent
                    .get(&name)
                    .and_then(|m| m.as_method())
                    .cloned();
                Member::Method(method.bind(&name, overridden, options))
            }
            value => value,
        };
        table.insert(name, member);
    }

    table
}

/// Build a child's class member table from the inherited one
pub(crate) fn overlay_class_members(
    inherited: ClassMemberTable,
    declared: ClassMemberTable,
) -> ClassMemberTable {
    let mut table = inherited;
    table.extend(declared);
    table
}
