//! Schema validation toolkit.
//!
//! valkit validates dynamic values against structural schemas: strings,
//! numbers, objects, arrays, unions, tuples, records and self-referential
//! types. Schemas are assembled with the fluent [`schema::factory`] or
//! compiled from JSON/YAML documents by [`schema::SchemaFileProvider`].
//!
//! # Crate Structure
//!
//! - [`schema`] — Schema nodes, factory and declarative compiler

/// Re-export schema engine types.
pub mod schema {
    pub use valkit_schema::*;
}
