//! Object model - classes, instances and single-inheritance composition

mod class;
mod construct;
mod error;
mod foreign;
mod instance;
mod member;
mod name;
mod options;
mod registry;
mod value;

pub use class::{Class, ClassDef, ClassId, ROOT_CLASS_NAME};
pub use construct::{construct, convert, Constructible};
pub use error::ClassError;
pub use foreign::{ForeignCtor, ForeignFn, ForeignObject, ForeignType};
pub use instance::{Instance, InstanceId, Scope};
pub use member::{
    ClassFn, ClassFunction, ClassMember, ClassMemberTable, Member, MemberTable, Method, MethodFn,
};
pub use name::{namespace_of, short_name, validate_class_name, NameValidationError, MAX_NAME_LEN};
pub use options::Options;
pub use registry::ClassRegistry;
pub use value::Value;
