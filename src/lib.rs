//! ookit - runtime class composition over a dynamic object model
//!
//! Classes are built by extending a parent class with instance members,
//! class-level members and options. Methods that override a parent method
//! can dispatch to it through their call scope, and class-level members can
//! optionally be resolved by name from inside instance methods.

pub mod config;
pub mod objects;

pub use config::Config;
pub use objects::{
    construct, convert, Class, ClassDef, ClassError, ClassRegistry, ForeignType, Instance,
    Options, Scope, Value,
};
