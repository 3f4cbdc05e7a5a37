//! Construction helpers: argument-list construction and foreign type conversion

use tracing::debug;

use super::{Class, ClassDef, ClassError, ForeignObject, ForeignType, Instance, Options, Value};

/// Something that can be constructed from a positional argument list
pub trait Constructible {
    type Output;

    fn construct_with(&self, args: &[Value]) -> Result<Self::Output, ClassError>;
}

impl Constructible for Class {
    type Output = Instance;

    fn construct_with(&self, args: &[Value]) -> Result<Instance, ClassError> {
        self.new_instance(args)
    }
}

impl Constructible for ForeignType {
    type Output = ForeignObject;

    fn construct_with(&self, args: &[Value]) -> Result<ForeignObject, ClassError> {
        self.instantiate(args)
    }
}

/// Construct `cls` with `args` as its argument list.
///
/// For a `Class` the result matches `cls.new_instance(args)`: same class, same
/// `init` side effects.
pub fn construct<C>(cls: &C, args: &[Value]) -> Result<C::Output, ClassError>
where
    C: Constructible + ?Sized,
{
    cls.construct_with(args)
}

/// Adapt a foreign type into a class extending the root.
///
/// The class's `init` constructs a foreign object from its arguments and
/// stores it under `slot`. Each prototype method present now (except `init`)
/// becomes a method forwarding to the stored object.
pub fn convert(foreign: &ForeignType, slot: &str, options: Options) -> Class {
    let mut def = ClassDef::new(foreign.name());
    def.set_options(options);

    let ty = foreign.clone();
    let init_slot = slot.to_string();
    def.add_method("init", move |scope, args| {
        let object = construct(&ty, args)?;
        scope.set(&init_slot, object);
        Ok(Value::null())
    });

    let methods = foreign.method_names();
    for name in methods.iter().filter(|name| name.as_str() != "init") {
        let method = name.clone();
        let slot = slot.to_string();
        def.add_method(name, move |scope, args| match scope.this().get(&slot) {
            Some(Value::Foreign(object)) => object.call(&method, args),
            _ => Err(ClassError::EmptySlot { slot: slot.clone() }),
        });
    }

    debug!(
        foreign = foreign.name(),
        slot,
        methods = methods.len(),
        "converted foreign type"
    );
    Class::root().extend(def)
}
