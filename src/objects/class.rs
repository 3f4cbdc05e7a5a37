//! Class system with single inheritance
//!
//! Every class is built by extending a parent class. The root class is a
//! process-wide singleton with no members; every other class derives from it.
//! A class precomputes its full instance member table when it is defined, so
//! instances are allocated from that table without walking the parent chain.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::debug;

use super::member::{self, ClassFunction, ClassMember, ClassMemberTable, Member, MemberTable, Method};
use super::{ClassError, Instance, Options, Scope, Value};

/// Unique class identifier
pub type ClassId = u64;

/// Name the root class reports
pub const ROOT_CLASS_NAME: &str = "Class";

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

static ROOT: LazyLock<Class> = LazyLock::new(|| {
    Class(Arc::new(ClassInner {
        id: 0,
        name: ROOT_CLASS_NAME.to_string(),
        parent: None,
        subclasses: RwLock::new(Vec::new()),
        class_members: RwLock::new(ClassMemberTable::new()),
        prototype: MemberTable::new(),
        options: Options::default(),
    }))
});

/// A class definition: the members a new class adds on top of its parent
#[derive(Debug, Clone, Default)]
pub struct ClassDef {
    /// Class name (None for an anonymous class)
    pub name: Option<String>,
    /// Instance members declared by this class
    pub instance_members: MemberTable,
    /// Class-level members declared by this class
    pub class_members: ClassMemberTable,
    /// Options for this class (None = defaults)
    pub options: Option<Options>,
}

impl ClassDef {
    /// Create a new, empty class definition
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Create a definition for an anonymous class
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create a definition from prebuilt member tables
    pub fn from_tables(
        instance_members: MemberTable,
        class_members: ClassMemberTable,
        options: Options,
    ) -> Self {
        Self {
            name: None,
            instance_members,
            class_members,
            options: Some(options),
        }
    }

    /// Set an instance field default
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.instance_members
            .insert(name.to_string(), Member::Value(value.into()));
    }

    /// Add an instance method
    pub fn add_method<F>(&mut self, name: &str, body: F)
    where
        F: Fn(&Scope<'_>, &[Value]) -> Result<Value, ClassError> + Send + Sync + 'static,
    {
        self.instance_members
            .insert(name.to_string(), Member::Method(Method::new(body)));
    }

    /// Set a class-level value
    pub fn set_class_value(&mut self, name: &str, value: impl Into<Value>) {
        self.class_members
            .insert(name.to_string(), ClassMember::Value(value.into()));
    }

    /// Add a class-level function
    pub fn add_class_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Class, &[Value]) -> Result<Value, ClassError> + Send + Sync + 'static,
    {
        self.class_members
            .insert(name.to_string(), ClassMember::Function(ClassFunction::new(f)));
    }

    /// Set the options record
    pub fn set_options(&mut self, options: Options) {
        self.options = Some(options);
    }

    /// Check if an instance member is declared
    pub fn declares(&self, name: &str) -> bool {
        self.instance_members.contains_key(name)
    }
}

/// A class: shared handle to an immutable blueprint
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

struct ClassInner {
    id: ClassId,
    name: String,
    parent: Option<Class>,
    subclasses: RwLock<Vec<Class>>,
    class_members: RwLock<ClassMemberTable>,
    prototype: MemberTable,
    options: Options,
}

impl Class {
    /// The root class every other class derives from
    pub fn root() -> Class {
        ROOT.clone()
    }

    pub fn id(&self) -> ClassId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Check if this is the root class
    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Options this class was defined with
    pub fn options(&self) -> Options {
        self.0.options
    }

    /// Direct parent (None for the root class)
    pub fn superclass(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// Classes that extend this class directly, in definition order
    pub fn subclasses(&self) -> Vec<Class> {
        self.0.subclasses.read().clone()
    }

    /// Get the inheritance chain (parent -> ... -> root)
    pub fn ancestors(&self) -> Vec<Class> {
        let mut chain = Vec::new();
        let mut current = self.superclass();

        while let Some(class) = current {
            chain.push(class.clone());
            current = class.superclass();
        }

        chain
    }

    /// Check if this class derives, directly or transitively, from `target`.
    /// A class never derives from itself.
    pub fn extends_from(&self, target: &Class) -> bool {
        match self.superclass() {
            None => false,
            Some(parent) if parent == target => true,
            Some(parent) if parent.is_root() => false,
            Some(parent) => parent.extends_from(target),
        }
    }

    /// Define a new class extending this one
    pub fn extend(&self, def: ClassDef) -> Class {
        let ClassDef {
            name,
            instance_members,
            class_members,
            options,
        } = def;
        let options = options.unwrap_or_default();

        let id = NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed);
        let name = name.unwrap_or_else(|| format!("{}#{}", ROOT_CLASS_NAME, id));

        let prototype = member::overlay_instance_members(&self.0.prototype, instance_members, options);
        let class_members = member::overlay_class_members(self.class_members(), class_members);

        let class = Class(Arc::new(ClassInner {
            id,
            name,
            parent: Some(self.clone()),
            subclasses: RwLock::new(Vec::new()),
            class_members: RwLock::new(class_members),
            prototype,
            options,
        }));

        self.0.subclasses.write().push(class.clone());

        debug!(
            class = %class,
            parent = %self,
            members = class.0.prototype.len(),
            "defined class"
        );
        class
    }

    /// The precomputed instance member table (template for new instances)
    pub fn prototype(&self) -> &MemberTable {
        &self.0.prototype
    }

    /// Check if instances of this class carry a member
    pub fn has_instance_member(&self, name: &str) -> bool {
        self.0.prototype.contains_key(name)
    }

    /// Snapshot of the class-level member table
    pub fn class_members(&self) -> ClassMemberTable {
        self.0.class_members.read().clone()
    }

    /// Get a class-level member
    pub fn class_member(&self, name: &str) -> Option<ClassMember> {
        self.0.class_members.read().get(name).cloned()
    }

    /// Get a class-level value, None if missing or callable
    pub fn class_value(&self, name: &str) -> Option<Value> {
        self.class_member(name).and_then(|m| m.as_value().cloned())
    }

    /// Check if this class has a class-level member
    pub fn has_class_member(&self, name: &str) -> bool {
        self.0.class_members.read().contains_key(name)
    }

    /// Replace the value of an existing class-level member.
    ///
    /// The set of class member names is fixed when the class is defined, so
    /// unknown names are rejected. Only this class is affected.
    pub fn set_class_member(&self, name: &str, member: impl Into<ClassMember>) -> Result<(), ClassError> {
        let mut members = self.0.class_members.write();
        match members.get_mut(name) {
            Some(slot) => {
                *slot = member.into();
                Ok(())
            }
            None => Err(ClassError::NoSuchClassMember {
                class: self.name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Call a class-level function with this class as receiver
    pub fn call_class_member(&self, name: &str, args: &[Value]) -> Result<Value, ClassError> {
        match self.class_member(name) {
            Some(ClassMember::Function(f)) => f.invoke(self, args),
            Some(ClassMember::Value(_)) => Err(ClassError::NotCallable {
                class: self.name().to_string(),
                name: name.to_string(),
            }),
            None => Err(ClassError::NoSuchClassMember {
                class: self.name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Allocate an instance from the prototype table without running `init`
    pub fn allocate(&self) -> Instance {
        Instance::from_template(self.clone())
    }

    /// Create an instance and forward `args` to its `init` method, if any
    pub fn new_instance(&self, args: &[Value]) -> Result<Instance, ClassError> {
        let instance = self.allocate();
        if let Some(init) = instance.method("init") {
            init.invoke(&instance, args)?;
        }
        Ok(instance)
    }

    /// Invoke the class like a constructor.
    ///
    /// An `init` that returns an instance, class or foreign object replaces
    /// the result. Plain data returned from `init` is discarded and the new
    /// instance is returned.
    pub fn call(&self, args: &[Value]) -> Result<Value, ClassError> {
        let instance = self.allocate();
        let Some(init) = instance.method("init") else {
            return Ok(Value::Instance(instance));
        };

        match init.invoke(&instance, args)? {
            Value::Data(_) => Ok(Value::Instance(instance)),
            handle => Ok(handle),
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({}#{})", self.0.name, self.0.id)
    }
}
