//! Shared tsrow wire model types.
//!
//! This crate is dependency-light so both the encoding SDK and transport
//! implementations can depend on it: the error taxonomy, identifier
//! sanitizer, wire type catalog, wire values, column schema and null mask.

#![warn(clippy::pedantic)]

pub mod error;
pub mod identifier;
pub mod mask;
pub mod schema;
pub mod value;
pub mod wire;

pub use error::{IngestError, Result};
pub use identifier::sanitize_name;
pub use mask::NullMask;
pub use schema::{ColumnSchema, Row};
pub use value::Value;
pub use wire::{parse_type, parse_type_with, Precision, SemanticType, WireType};
