//! Records, values and field resolution.
//!
//! This module contains the pieces that know about record structure:
//! - The `Record` trait and its field visitor
//! - Dynamic values produced by decomposing a record
//! - Field paths and identity-based field resolution

mod path;
mod record;
mod resolve;
mod value;

pub use path::FieldPath;
pub use record::{decompose, FieldDecl, FieldVisitor, Record};
pub use resolve::{resolve, ResolvedField};
pub use value::{FieldMap, FieldValue, Number, Value, ValueKind};
