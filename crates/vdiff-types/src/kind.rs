use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The coarse classification of a value, used to pick a comparison strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    Complex,
    String,
    /// Fixed-length array; the length is part of the type.
    Array,
    /// Growable sequence.
    Seq,
    Map,
    /// Nullable indirection: `Option` or a shared `Ptr`.
    Pointer,
    Struct,
    /// A tagged value whose concrete type is only known at run time.
    Variant,
    Func,
    Chan,
    Handle,
}

impl Kind {
    /// Whether values of this kind may be used to pair up map keys.
    pub fn is_valid_key(self) -> bool {
        !matches!(self, Kind::Seq | Kind::Map | Kind::Func)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Complex => "complex",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Seq => "seq",
            Kind::Map => "map",
            Kind::Pointer => "pointer",
            Kind::Struct => "struct",
            Kind::Variant => "variant",
            Kind::Func => "func",
            Kind::Chan => "chan",
            Kind::Handle => "handle",
        };
        f.write_str(name)
    }
}

/// Width of a signed integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntType {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
}

/// Width of an unsigned integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UintType {
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatType {
    F32,
    F64,
}

/// Complex numbers built from two `f32` (`C64`) or two `f64` (`C128`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexType {
    C64,
    C128,
}

/// Which kind of opaque handle an [`Opaque`](crate::Opaque) value stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpaqueKind {
    Func,
    Chan,
    Handle,
}

/// Type descriptor of a value.
///
/// Scalar descriptors are exact. Composite descriptors are shallow: two
/// sequences share the type `Vec` whatever they hold, and their elements are
/// compared one level down. Arrays carry their length, structs and variants
/// their name. Element types are not recorded, so an empty `Vec<i32>` and an
/// empty `Vec<String>` (likewise empty maps, or `None` of different inner
/// types) are not told apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Int(IntType),
    Uint(UintType),
    Float(FloatType),
    Complex(ComplexType),
    String,
    Array(usize),
    Seq,
    Map,
    Option,
    Ptr,
    Struct(Arc<str>),
    Variant(Arc<str>),
    Opaque(OpaqueKind, Arc<str>),
}

impl Type {
    /// The coarse kind this type belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            Type::Bool => Kind::Bool,
            Type::Int(_) => Kind::Int,
            Type::Uint(_) => Kind::Uint,
            Type::Float(_) => Kind::Float,
            Type::Complex(_) => Kind::Complex,
            Type::String => Kind::String,
            Type::Array(_) => Kind::Array,
            Type::Seq => Kind::Seq,
            Type::Map => Kind::Map,
            Type::Option | Type::Ptr => Kind::Pointer,
            Type::Struct(_) => Kind::Struct,
            Type::Variant(_) => Kind::Variant,
            Type::Opaque(OpaqueKind::Func, _) => Kind::Func,
            Type::Opaque(OpaqueKind::Chan, _) => Kind::Chan,
            Type::Opaque(OpaqueKind::Handle, _) => Kind::Handle,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("bool"),
            Type::Int(t) => f.write_str(match t {
                IntType::I8 => "i8",
                IntType::I16 => "i16",
                IntType::I32 => "i32",
                IntType::I64 => "i64",
                IntType::I128 => "i128",
                IntType::Isize => "isize",
            }),
            Type::Uint(t) => f.write_str(match t {
                UintType::U8 => "u8",
                UintType::U16 => "u16",
                UintType::U32 => "u32",
                UintType::U64 => "u64",
                UintType::U128 => "u128",
                UintType::Usize => "usize",
            }),
            Type::Float(FloatType::F32) => f.write_str("f32"),
            Type::Float(FloatType::F64) => f.write_str("f64"),
            Type::Complex(ComplexType::C64) => f.write_str("c64"),
            Type::Complex(ComplexType::C128) => f.write_str("c128"),
            Type::String => f.write_str("String"),
            Type::Array(len) => write!(f, "[_; {len}]"),
            Type::Seq => f.write_str("Vec"),
            Type::Map => f.write_str("Map"),
            Type::Option => f.write_str("Option"),
            Type::Ptr => f.write_str("Ptr"),
            Type::Struct(name) | Type::Variant(name) => f.write_str(name),
            Type::Opaque(OpaqueKind::Func, name) => write!(f, "fn {name}"),
            Type::Opaque(OpaqueKind::Chan, name) => write!(f, "chan {name}"),
            Type::Opaque(OpaqueKind::Handle, name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_kind_covers_option_and_ptr() {
        assert_eq!(Type::Option.kind(), Kind::Pointer);
        assert_eq!(Type::Ptr.kind(), Kind::Pointer);
        assert_ne!(Type::Option, Type::Ptr);
    }

    #[test]
    fn illegal_key_kinds() {
        assert!(!Kind::Seq.is_valid_key());
        assert!(!Kind::Map.is_valid_key());
        assert!(!Kind::Func.is_valid_key());
        assert!(Kind::Chan.is_valid_key());
        assert!(Kind::Struct.is_valid_key());
    }

    #[test]
    fn type_display_names() {
        assert_eq!(Type::Int(IntType::I32).to_string(), "i32");
        assert_eq!(Type::Uint(UintType::Usize).to_string(), "usize");
        assert_eq!(Type::Array(3).to_string(), "[_; 3]");
        assert_eq!(Type::Struct("Point".into()).to_string(), "Point");
        assert_eq!(
            Type::Opaque(OpaqueKind::Chan, "Event".into()).to_string(),
            "chan Event"
        );
    }

    #[test]
    fn struct_types_compare_by_name() {
        assert_eq!(Type::Struct("A".into()), Type::Struct("A".into()));
        assert_ne!(Type::Struct("A".into()), Type::Variant("A".into()));
    }
}
