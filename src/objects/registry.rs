//! Registry of named classes

use std::collections::HashMap;

use tracing::debug;

use super::class::ROOT_CLASS_NAME;
use super::name::validate_class_name;
use super::{Class, ClassDef, ClassError, Options};

/// Registry of classes by name
///
/// The root class is always registered as `Class`. Definitions that do not
/// carry their own options receive the registry defaults.
#[derive(Debug)]
pub struct ClassRegistry {
    classes: HashMap<String, Class>,
    defaults: Options,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a new registry holding only the root class
    pub fn new() -> Self {
        Self::with_defaults(Options::default())
    }

    /// Create a registry applying `defaults` to definitions without options
    pub fn with_defaults(defaults: Options) -> Self {
        let mut classes = HashMap::new();
        classes.insert(ROOT_CLASS_NAME.to_string(), Class::root());
        Self { classes, defaults }
    }

    /// Default options for new definitions
    pub fn defaults(&self) -> Options {
        self.defaults
    }

    /// Define and register a class.
    ///
    /// `parent` names a registered class; None extends the root class.
    pub fn define(
        &mut self,
        name: &str,
        parent: Option<&str>,
        mut def: ClassDef,
    ) -> Result<Class, ClassError> {
        let name = validate_class_name(name)?;
        if self.classes.contains_key(&name) {
            return Err(ClassError::AlreadyDefined(name));
        }

        let parent = match parent {
            Some(p) => self
                .classes
                .get(p)
                .cloned()
                .ok_or_else(|| ClassError::UnknownClass(p.to_string()))?,
            None => Class::root(),
        };

        def.name = Some(name.clone());
        if def.options.is_none() {
            def.options = Some(self.defaults);
        }

        let class = parent.extend(def);
        debug!(class = %name, parent = %parent, "registered class");
        self.classes.insert(name, class.clone());
        Ok(class)
    }

    /// Register an already built class (e.g., from `convert`) under its name
    pub fn register(&mut self, class: Class) -> Result<(), ClassError> {
        let name = validate_class_name(class.name())?;
        if self.classes.contains_key(&name) {
            return Err(ClassError::AlreadyDefined(name));
        }
        debug!(class = %name, "registered class");
        self.classes.insert(name, class);
        Ok(())
    }

    /// Get a class by name
    pub fn get(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    /// Check if a class exists
    pub fn exists(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the inheritance chain for a class (child -> ... -> root)
    pub fn get_chain(&self, name: &str) -> Vec<String> {
        let Some(class) = self.classes.get(name) else {
            return Vec::new();
        };

        std::iter::once(class.clone())
            .chain(class.ancestors())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Check if a class is, or descends from, another class
    pub fn is_a(&self, child: &str, ancestor: &str) -> bool {
        match (self.classes.get(child), self.classes.get(ancestor)) {
            (Some(c), Some(a)) => c == a || c.extends_from(a),
            _ => false,
        }
    }

    /// Resolve all instance member names for a class (includes inherited), sorted
    pub fn resolve_members(&self, name: &str) -> Vec<String> {
        let Some(class) = self.classes.get(name) else {
            return Vec::new();
        };

        let mut members: Vec<String> = class.prototype().keys().cloned().collect();
        members.sort();
        members
    }
}
