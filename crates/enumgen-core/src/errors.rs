use crate::value::{Repr, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no values defined for type {type_name}")]
    NoValues { type_name: String },

    #[error("type {type_name} is not declared in the manifest")]
    UnknownType { type_name: String },

    #[error("enumerants of type {type_name} disagree on signedness")]
    MixedSignedness { type_name: String },

    #[error("value {value} of {type_name}::{name} does not fit in {repr}")]
    ValueOutOfRange {
        type_name: String,
        name: String,
        value: Value,
        repr: Repr,
    },

    #[error("types {first} and {second} would both define the static {name}")]
    StaticNameCollision {
        first: String,
        second: String,
        name: String,
    },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    /// Name of the type the error concerns, when there is one.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            GenerateError::NoValues { type_name }
            | GenerateError::UnknownType { type_name }
            | GenerateError::MixedSignedness { type_name }
            | GenerateError::ValueOutOfRange { type_name, .. } => Some(type_name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;
