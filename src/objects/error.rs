//! Errors raised by the object model

use thiserror::Error;

use super::name::NameValidationError;

/// Errors that can occur while defining, instantiating or calling classes
#[derive(Debug, Error)]
pub enum ClassError {
    #[error("{class} has no member named '{name}'")]
    NoSuchMember { class: String, name: String },

    #[error("member '{name}' of {class} is not callable")]
    NotCallable { class: String, name: String },

    #[error("method '{name}' of {class} has no super method")]
    NoSuperMethod { class: String, name: String },

    #[error("{class} has no class member named '{name}'")]
    NoSuchClassMember { class: String, name: String },

    #[error("foreign type {ty} has no method named '{name}'")]
    NoSuchForeignMethod { ty: String, name: String },

    #[error("slot '{slot}' does not hold a converted object")]
    EmptySlot { slot: String },

    #[error("invalid class name: {0}")]
    InvalidName(#[from] NameValidationError),

    #[error("class '{0}' is already defined")]
    AlreadyDefined(String),

    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("{0}")]
    Raised(String),
}

impl ClassError {
    /// Build an error from inside a method body
    pub fn raise(message: impl Into<String>) -> Self {
        ClassError::Raised(message.into())
    }
}
