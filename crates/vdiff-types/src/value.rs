use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::InspectError;
use crate::kind::{ComplexType, FloatType, IntType, Kind, OpaqueKind, Type, UintType};

/// An inspected runtime value.
///
/// Every case knows its own [`Type`], and composite cases expose their
/// sub-values directly. `Nil` stands for an absent value and is the only
/// case without a type.
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(IntType, i128),
    Uint(UintType, u128),
    Float(FloatType, f64),
    Complex(ComplexType, Complex),
    String(String),
    Array(Vec<Value>),
    Seq(Vec<Value>),
    /// Map entries in insertion order. Keys are not required to be unique.
    Map(Vec<(Value, Value)>),
    Option(Option<Box<Value>>),
    Ptr(Ptr),
    Struct(Struct),
    Variant(Variant),
    Opaque(Opaque),
}

impl Value {
    /// The type descriptor, or `None` for [`Value::Nil`].
    pub fn type_desc(&self) -> Option<Type> {
        let ty = match self {
            Value::Nil => return None,
            Value::Bool(_) => Type::Bool,
            Value::Int(t, _) => Type::Int(*t),
            Value::Uint(t, _) => Type::Uint(*t),
            Value::Float(t, _) => Type::Float(*t),
            Value::Complex(t, _) => Type::Complex(*t),
            Value::String(_) => Type::String,
            Value::Array(items) => Type::Array(items.len()),
            Value::Seq(_) => Type::Seq,
            Value::Map(_) => Type::Map,
            Value::Option(_) => Type::Option,
            Value::Ptr(_) => Type::Ptr,
            Value::Struct(s) => Type::Struct(s.name.clone()),
            Value::Variant(v) => Type::Variant(v.name.clone()),
            Value::Opaque(o) => Type::Opaque(o.kind, o.name.clone()),
        };
        Some(ty)
    }

    /// The coarse kind, or `None` for [`Value::Nil`].
    pub fn kind(&self) -> Option<Kind> {
        self.type_desc().map(|t| t.kind())
    }

    /// Whether this is the absent value.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Build a struct value from `(field name, value)` pairs in declaration order.
    pub fn record<'a>(
        name: impl Into<Arc<str>>,
        fields: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Self {
        Value::Struct(Struct {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(name, value)| Field {
                    name: name.into(),
                    value,
                })
                .collect(),
        })
    }

    /// Wrap `value` in a variant (interface) named `name`.
    pub fn variant(name: impl Into<Arc<str>>, value: Value) -> Self {
        Value::Variant(Variant {
            name: name.into(),
            value: Box::new(value),
        })
    }

    /// A growable sequence of `items`.
    pub fn seq(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Seq(items.into_iter().collect())
    }

    /// A fixed-length array; its length becomes part of the type.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// A map holding `entries` in the given order.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    /// A present optional value.
    pub fn some(value: Value) -> Self {
        Value::Option(Some(Box::new(value)))
    }

    /// An empty optional value.
    pub fn none() -> Self {
        Value::Option(None)
    }

    /// A complex number with `f64` components.
    pub fn complex128(re: f64, im: f64) -> Self {
        Value::Complex(ComplexType::C128, Complex { re, im })
    }

    /// A complex number with `f32` components.
    pub fn complex64(re: f32, im: f32) -> Self {
        Value::Complex(
            ComplexType::C64,
            Complex {
                re: re.into(),
                im: im.into(),
            },
        )
    }
}

/// A complex number; `C64` values hold `f32` components widened to `f64`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

/// A record with named fields in declaration order.
#[derive(Clone, Debug)]
pub struct Struct {
    pub name: Arc<str>,
    pub fields: Vec<Field>,
}

impl Struct {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| &*f.name == name)
            .map(|f| &f.value)
    }

    /// Tuple structs name their fields `0`, `1`, ...
    pub fn is_tuple(&self) -> bool {
        !self.fields.is_empty()
            && self
                .fields
                .iter()
                .all(|f| !f.name.is_empty() && f.name.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// A named struct field.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: Arc<str>,
    pub value: Value,
}

/// A value whose concrete type is decided at run time, such as an enum
/// variant or a trait object.
#[derive(Clone, Debug)]
pub struct Variant {
    /// Name of the enclosing enum or interface.
    pub name: Arc<str>,
    /// The concrete value held; [`Value::Nil`] when empty.
    pub value: Box<Value>,
}

/// A function, channel, or other handle that can only be compared by address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opaque {
    pub kind: OpaqueKind,
    pub name: Arc<str>,
    pub addr: usize,
}

impl Opaque {
    /// Create a handle of `kind` named `name` at `addr`.
    pub fn new(kind: OpaqueKind, name: impl Into<Arc<str>>, addr: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            addr,
        }
    }
}

/// A shared, nullable, write-once pointer cell.
///
/// `Ptr` is how cyclic graphs are built: allocate a cell with
/// [`Ptr::alloc`], build values that point at clones of it, then close the
/// loop with [`Ptr::set`]. An allocated cell that was never set reads as
/// null. Reference cycles built this way are never freed.
#[derive(Clone, Default)]
pub struct Ptr(Option<Rc<OnceCell<Value>>>);

impl Ptr {
    /// The null pointer.
    pub fn null() -> Self {
        Self(None)
    }

    /// A pointer to `value`.
    pub fn new(value: Value) -> Self {
        Self(Some(Rc::new(OnceCell::from(value))))
    }

    /// A pointer to a cell that will be filled in later.
    pub fn alloc() -> Self {
        Self(Some(Rc::new(OnceCell::new())))
    }

    /// Fill in the target of an allocated pointer.
    pub fn set(&self, value: Value) -> Result<(), InspectError> {
        match &self.0 {
            Some(cell) => cell.set(value).map_err(|_| InspectError::PtrAlreadySet),
            None => Err(InspectError::NullPtr),
        }
    }

    /// The pointee, if any.
    pub fn get(&self) -> Option<&Value> {
        self.0.as_ref()?.get()
    }

    /// Whether there is no pointee, including an allocated cell never set.
    pub fn is_null(&self) -> bool {
        self.get().is_none()
    }

    /// Address of the shared cell; zero for a null pointer.
    pub fn addr(&self) -> usize {
        self.0.as_ref().map_or(0, |cell| Rc::as_ptr(cell) as usize)
    }
}

impl fmt::Debug for Ptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ptr({:#x})", self.addr())
    }
}

impl From<Ptr> for Value {
    fn from(p: Ptr) -> Self {
        Value::Ptr(p)
    }
}

macro_rules! impl_from_int {
    ($($t:ty => $variant:ident($width:expr)),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant($width, v.into())
                }
            }
        )*
    };
}

impl_from_int! {
    i8 => Int(IntType::I8),
    i16 => Int(IntType::I16),
    i32 => Int(IntType::I32),
    i64 => Int(IntType::I64),
    i128 => Int(IntType::I128),
    u8 => Uint(UintType::U8),
    u16 => Uint(UintType::U16),
    u32 => Uint(UintType::U32),
    u64 => Uint(UintType::U64),
    u128 => Uint(UintType::U128),
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(IntType::Isize, v as i128)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Uint(UintType::Usize, v as u128)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(FloatType::F32, v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(FloatType::F64, v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Option(v.map(|inner| Box::new(inner.into())))
    }
}
