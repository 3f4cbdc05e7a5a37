//! Instances and method call scopes

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::member::{ClassMember, Member, MemberTable, Method};
use super::{Class, ClassError, Value};

/// Unique instance identifier
pub type InstanceId = u64;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// An instance of a class
///
/// The member table starts as a copy of the class prototype table and then
/// holds the instance's own state. Cloning an `Instance` clones the handle.
#[derive(Clone)]
pub struct Instance(Arc<InstanceInner>);

struct InstanceInner {
    id: InstanceId,
    class: Class,
    members: RwLock<MemberTable>,
}

impl Instance {
    pub(crate) fn from_template(class: Class) -> Self {
        let members = class.prototype().clone();
        Self(Arc::new(InstanceInner {
            id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
            class,
            members: RwLock::new(members),
        }))
    }

    pub fn id(&self) -> InstanceId {
        self.0.id
    }

    /// The exact class this instance was created from
    pub fn class(&self) -> &Class {
        &self.0.class
    }

    /// Check if this instance belongs to `class` or one of its subclasses
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class() == class || self.class().extends_from(class)
    }

    /// Get a member, returning None if not set
    pub fn member(&self, name: &str) -> Option<Member> {
        self.0.members.read().get(name).cloned()
    }

    /// Get a method member
    pub fn method(&self, name: &str) -> Option<Method> {
        self.member(name).and_then(|m| m.as_method().cloned())
    }

    /// Get a value member, None if missing or callable
    pub fn get(&self, name: &str) -> Option<Value> {
        self.member(name).and_then(|m| m.as_value().cloned())
    }

    /// Set a value member
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.0
            .members
            .write()
            .insert(name.to_string(), Member::Value(value.into()));
    }

    /// Set a member of any kind
    pub fn set_member(&self, name: &str, member: Member) {
        self.0.members.write().insert(name.to_string(), member);
    }

    /// Remove a member
    pub fn remove(&self, name: &str) -> Option<Member> {
        self.0.members.write().remove(name)
    }

    /// Check if instance has a member
    pub fn has(&self, name: &str) -> bool {
        self.0.members.read().contains_key(name)
    }

    /// Names of all members, sorted
    pub fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.members.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Call a method on this instance
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ClassError> {
        match self.member(name) {
            Some(Member::Method(method)) => method.invoke(self, args),
            Some(Member::Value(_)) => Err(ClassError::NotCallable {
                class: self.class().name().to_string(),
                name: name.to_string(),
            }),
            None => Err(ClassError::NoSuchMember {
                class: self.class().name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Check if two handles refer to the same instance
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({}#{})", self.0.class.name(), self.0.id)
    }
}

enum Resolved {
    Instance(Member),
    Class(ClassMember),
}

/// The receiver side of a running method
///
/// A scope pairs the instance a method runs on with the method itself. The
/// method carries its overridden parent (if any), which is what
/// `super_call` dispatches to; nothing is stored on the instance.
///
/// Class member exposure is a property of the whole call: once an exposing
/// method runs, every method it reaches through `super_call` or `call`
/// resolves class members too.
pub struct Scope<'a> {
    this: &'a Instance,
    method: &'a Method,
    exposing: bool,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(this: &'a Instance, method: &'a Method, exposing: bool) -> Self {
        Self {
            this,
            method,
            exposing,
        }
    }

    /// The instance the method runs on
    pub fn this(&self) -> &Instance {
        self.this
    }

    /// The instance's class
    pub fn class(&self) -> &Class {
        self.this.class()
    }

    /// Name of the running method
    pub fn method_name(&self) -> &str {
        self.method.name().unwrap_or("<unbound>")
    }

    /// Check if the running method overrides a parent method
    pub fn has_super(&self) -> bool {
        self.method.has_parent()
    }

    /// Invoke the overridden parent method on the same instance
    pub fn super_call(&self, args: &[Value]) -> Result<Value, ClassError> {
        let Some(parent) = self.method.parent() else {
            return Err(ClassError::NoSuperMethod {
                class: self.class().name().to_string(),
                name: self.method_name().to_string(),
            });
        };

        trace!(
            class = %self.class(),
            method = self.method_name(),
            "dispatching to super method"
        );
        parent.invoke_within(self.this, args, self.exposing)
    }

    /// Read a value by name.
    ///
    /// Instance members come first; class members are consulted only while
    /// exposure is active for this call and the instance has no member of
    /// that name.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.resolve(name)? {
            Resolved::Instance(Member::Value(v)) => Some(v),
            Resolved::Class(ClassMember::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Write a value on the instance. Exposed class members are never written.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.this.set(name, value);
    }

    /// Check if a name resolves from this scope
    pub fn has(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Call a method or exposed class function by name
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ClassError> {
        match self.resolve(name) {
            Some(Resolved::Instance(Member::Method(m))) => m.invoke_within(self.this, args, self.exposing),
            Some(Resolved::Class(ClassMember::Function(f))) => f.invoke(self.class(), args),
            Some(_) => Err(ClassError::NotCallable {
                class: self.class().name().to_string(),
                name: name.to_string(),
            }),
            None => Err(ClassError::NoSuchMember {
                class: self.class().name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    fn resolve(&self, name: &str) -> Option<Resolved> {
        if let Some(member) = self.this.member(name) {
            return Some(Resolved::Instance(member));
        }
        if !self.exposing {
            return None;
        }
        self.class().class_member(name).map(Resolved::Class)
    }
}
