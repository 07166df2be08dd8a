//! Value inspection for the vdiff structural difference engine.
//!
//! Rust has no runtime reflection, so values to be compared are described by
//! an explicit tagged union, [`Value`], with one case per supported kind.
//! Values come from three places: the builder constructors on [`Value`],
//! any `Serialize` type through [`to_value`], or a `serde_json` document.
//!
//! # Key Types
//!
//! - [`Value`] -- An inspected value with kind-specific accessors
//! - [`Type`] / [`Kind`] -- Type descriptor and its coarse classification
//! - [`Ptr`] -- Shared write-once pointer cell, the building block for cyclic graphs
//! - [`Render`] -- Cycle-safe `Display` adapter used in diff output

pub mod error;
pub mod inspect;
pub mod json;
pub mod kind;
pub mod render;
pub mod value;

pub use error::InspectError;
pub use inspect::{to_value, ValueSerializer};
pub use kind::{ComplexType, FloatType, IntType, Kind, OpaqueKind, Type, UintType};
pub use render::Render;
pub use value::{Complex, Field, Opaque, Ptr, Struct, Value, Variant};
