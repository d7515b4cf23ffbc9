//! Domain layer: the document tree, value objects, errors, and invariants

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;
