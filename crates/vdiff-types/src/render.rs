//! Human-readable rendering of inspected values.
//!
//! The output reads like a Rust literal: `Point { x: 1, y: 2 }`, `[1, 2]`,
//! `{"a": 1}`, `Some(3)`, `&Node { .. }`. Rendering follows `Ptr` targets and
//! prints `&<cycle>` for a pointer already open on the current path, so cyclic
//! graphs render in finite space.

use std::fmt::{self, Display};

use crate::kind::{ComplexType, FloatType, OpaqueKind};
use crate::value::{Complex, Value};

/// `Display` adapter returned by [`Value::render`].
#[derive(Clone, Copy)]
pub struct Render<'a> {
    value: &'a Value,
}

impl Value {
    /// Render this value for diff output.
    pub fn render(&self) -> Render<'_> {
        Render { value: self }
    }
}

impl Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Renderer::default().write(f, self.value)
    }
}

impl Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_complex(f, self.re, self.im, negative_imaginary(self))
    }
}

fn negative_imaginary(c: &Complex) -> bool {
    c.im.is_sign_negative() && !c.im.is_nan()
}

fn write_complex<T: Display>(
    f: &mut fmt::Formatter<'_>,
    re: T,
    im: T,
    negative: bool,
) -> fmt::Result {
    if negative {
        write!(f, "({re}{im}i)")
    } else {
        write!(f, "({re}+{im}i)")
    }
}

#[derive(Default)]
struct Renderer {
    /// Addresses of the `Ptr` cells currently being rendered.
    open: Vec<usize>,
}

impl Renderer {
    fn write(&mut self, f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        match value {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(_, n) => write!(f, "{n}"),
            Value::Uint(_, n) => write!(f, "{n}"),
            Value::Float(FloatType::F32, x) => write!(f, "{}", *x as f32),
            Value::Float(FloatType::F64, x) => write!(f, "{x}"),
            Value::Complex(ComplexType::C64, c) => {
                write_complex(f, c.re as f32, c.im as f32, negative_imaginary(c))
            }
            Value::Complex(ComplexType::C128, c) => write!(f, "{c}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) | Value::Seq(items) => {
                f.write_str("[")?;
                self.write_list(f, items.iter())?;
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.write(f, k)?;
                    f.write_str(": ")?;
                    self.write(f, v)?;
                }
                f.write_str("}")
            }
            Value::Option(None) => f.write_str("None"),
            Value::Option(Some(inner)) => {
                f.write_str("Some(")?;
                self.write(f, inner)?;
                f.write_str(")")
            }
            Value::Ptr(p) => match p.get() {
                None => f.write_str("null"),
                Some(_) if self.open.contains(&p.addr()) => f.write_str("&<cycle>"),
                Some(target) => {
                    self.open.push(p.addr());
                    f.write_str("&")?;
                    let res = self.write(f, target);
                    self.open.pop();
                    res
                }
            },
            Value::Struct(s) if s.fields.is_empty() => f.write_str(&s.name),
            Value::Struct(s) if s.is_tuple() => {
                write!(f, "{}(", s.name)?;
                self.write_list(f, s.fields.iter().map(|field| &field.value))?;
                f.write_str(")")
            }
            Value::Struct(s) => {
                write!(f, "{} {{ ", s.name)?;
                for (i, field) in s.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: ", field.name)?;
                    self.write(f, &field.value)?;
                }
                f.write_str(" }")
            }
            Value::Variant(v) => self.write(f, &v.value),
            Value::Opaque(o) => match o.kind {
                OpaqueKind::Func => write!(f, "fn {}@{:#x}", o.name, o.addr),
                OpaqueKind::Chan => write!(f, "chan {}@{:#x}", o.name, o.addr),
                OpaqueKind::Handle => write!(f, "{}@{:#x}", o.name, o.addr),
            },
        }
    }

    fn write_list<'v>(
        &mut self,
        f: &mut fmt::Formatter<'_>,
        items: impl Iterator<Item = &'v Value>,
    ) -> fmt::Result {
        for (i, item) in items.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.write(f, item)?;
        }
        Ok(())
    }
}
