//! The recursive structural walker and its entry points.
//!
//! Every entry point runs the same traversal and differs only in where the
//! lines go. Each call builds its own [`CycleGuard`]; nothing is shared
//! between calls.

use std::fmt;
use std::io;

use serde::Serialize;
use tracing::{debug, trace};
use vdiff_types::{to_value, Struct, Value};

use crate::error::DiffResult;
use crate::guard::{CycleGuard, Identity, Visit};
use crate::keys::match_keys;
use crate::label::PathLabel;
use crate::printer::{LogPrinter, Logf, Printer, WritePrinter};

/// Describe every difference between `a` and `b`, one line per difference.
pub fn diff(a: &Value, b: &Value) -> DiffResult<Vec<String>> {
    let mut lines: Vec<String> = Vec::new();
    print_diff(&mut lines, a, b)?;
    Ok(lines)
}

/// Write every difference between `a` and `b` to `writer`, each followed by
/// a newline.
pub fn write_diff<W: io::Write>(writer: W, a: &Value, b: &Value) -> DiffResult<()> {
    print_diff(&mut WritePrinter::new(writer), a, b)
}

/// Send every difference between `a` and `b` to a log sink.
pub fn log_diff<L: Logf>(sink: L, a: &Value, b: &Value) -> DiffResult<()> {
    print_diff(&mut LogPrinter::new(sink), a, b)
}

/// Inspect two `Serialize` values and [`diff`] them.
pub fn diff_serialize<A, B>(a: &A, b: &B) -> DiffResult<Vec<String>>
where
    A: Serialize + ?Sized,
    B: Serialize + ?Sized,
{
    diff(&to_value(a)?, &to_value(b)?)
}

/// Hand every difference between `a` and `b` to `printer`, one call per line.
pub fn print_diff(printer: &mut dyn Printer, a: &Value, b: &Value) -> DiffResult<()> {
    let mut differ = Differ {
        printer,
        guard: CycleGuard::new(),
        lines: 0,
    };
    differ.diff(&PathLabel::root(), Place::detached(a), Place::detached(b))?;
    debug!(
        lines = differ.lines,
        visited = differ.guard.len(),
        "structural diff complete"
    );
    Ok(())
}

/// A value together with whether it has a stable location for cycle
/// detection.
#[derive(Clone, Copy)]
struct Place<'v> {
    value: &'v Value,
    addressable: bool,
}

impl<'v> Place<'v> {
    fn detached(value: &'v Value) -> Self {
        Self {
            value,
            addressable: false,
        }
    }

    fn addressed(value: &'v Value) -> Self {
        Self {
            value,
            addressable: true,
        }
    }

    /// A component stored inside this value shares its addressability.
    fn part<'w>(&self, value: &'w Value) -> Place<'w> {
        Place {
            value,
            addressable: self.addressable,
        }
    }
}

struct Differ<'p> {
    printer: &'p mut dyn Printer,
    guard: CycleGuard,
    lines: usize,
}

impl Differ<'_> {
    fn emit(&mut self, label: &PathLabel, body: fmt::Arguments<'_>) -> DiffResult<()> {
        self.lines += 1;
        if label.is_root() {
            self.printer.print(body)
        } else {
            self.printer.print(format_args!("{label}: {body}"))
        }
    }

    fn diff(&mut self, label: &PathLabel, a: Place<'_>, b: Place<'_>) -> DiffResult<()> {
        let ty = match (a.value.type_desc(), b.value.type_desc()) {
            (None, None) => return Ok(()),
            (None, Some(_)) => {
                return self.emit(label, format_args!("nil != {}", b.value.render()));
            }
            (Some(_), None) => {
                return self.emit(label, format_args!("{} != nil", a.value.render()));
            }
            (Some(at), Some(bt)) if at != bt => {
                return self.emit(label, format_args!("{at} != {bt}"));
            }
            (Some(ty), Some(_)) => ty,
        };

        if a.addressable && b.addressable {
            let visit = self.guard.visit(
                Identity::of(a.value, ty.clone()),
                Identity::of(b.value, ty.clone()),
            );
            match visit {
                Visit::First => {}
                Visit::Repeat => {
                    trace!(%label, "pair already compared");
                    return Ok(());
                }
                Visit::LeftRevisited => {
                    return self.emit(
                        label,
                        format_args!(
                            "{} (previously visited) != {}",
                            a.value.render(),
                            b.value.render()
                        ),
                    );
                }
                Visit::RightRevisited => {
                    return self.emit(
                        label,
                        format_args!(
                            "{} != {} (previously visited)",
                            a.value.render(),
                            b.value.render()
                        ),
                    );
                }
            }
        }

        match (a.value, b.value) {
            (Value::Bool(x), Value::Bool(y)) => self.scalar(label, x == y, a, b),
            (Value::Int(_, x), Value::Int(_, y)) => self.scalar(label, x == y, a, b),
            (Value::Uint(_, x), Value::Uint(_, y)) => self.scalar(label, x == y, a, b),
            (Value::Float(_, x), Value::Float(_, y)) => self.scalar(label, x == y, a, b),
            (Value::Complex(_, x), Value::Complex(_, y)) => self.scalar(label, x == y, a, b),
            (Value::String(x), Value::String(y)) => self.scalar(label, x == y, a, b),
            (Value::Array(xs), Value::Array(ys)) => {
                for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                    self.diff(&label.index(i), a.part(x), b.part(y))?;
                }
                Ok(())
            }
            (Value::Seq(xs), Value::Seq(ys)) => {
                if xs.len() != ys.len() {
                    return self.emit(
                        label,
                        format_args!("{ty}[{}] != {ty}[{}]", xs.len(), ys.len()),
                    );
                }
                for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                    self.diff(&label.index(i), Place::addressed(x), Place::addressed(y))?;
                }
                Ok(())
            }
            (Value::Map(xs), Value::Map(ys)) => self.diff_map(label, xs, ys),
            (Value::Option(x), Value::Option(y)) => {
                self.diff_pointee(label, a, b, x.as_deref(), y.as_deref())
            }
            (Value::Ptr(x), Value::Ptr(y)) => self.diff_pointee(label, a, b, x.get(), y.get()),
            (Value::Struct(x), Value::Struct(y)) => self.diff_struct(label, a, b, x, y),
            (Value::Variant(x), Value::Variant(y)) => {
                self.diff(label, Place::detached(&x.value), Place::detached(&y.value))
            }
            (Value::Opaque(x), Value::Opaque(y)) => {
                if x.addr == y.addr {
                    Ok(())
                } else {
                    self.emit(label, format_args!("{:#x} != {:#x}", x.addr, y.addr))
                }
            }
            _ => unreachable!("values of type {ty} have different shapes"),
        }
    }

    fn scalar(
        &mut self,
        label: &PathLabel,
        equal: bool,
        a: Place<'_>,
        b: Place<'_>,
    ) -> DiffResult<()> {
        if equal {
            return Ok(());
        }
        self.emit(
            label,
            format_args!("{} != {}", a.value.render(), b.value.render()),
        )
    }

    fn diff_pointee(
        &mut self,
        label: &PathLabel,
        a: Place<'_>,
        b: Place<'_>,
        x: Option<&Value>,
        y: Option<&Value>,
    ) -> DiffResult<()> {
        match (x, y) {
            (None, None) => Ok(()),
            (None, Some(_)) => self.emit(label, format_args!("nil != {}", b.value.render())),
            (Some(_), None) => self.emit(label, format_args!("{} != nil", a.value.render())),
            (Some(x), Some(y)) => self.diff(label, Place::addressed(x), Place::addressed(y)),
        }
    }

    /// Fields are walked in the left struct's declaration order. Structs of
    /// the same name built with different field sets report the extra
    /// fields as missing.
    fn diff_struct(
        &mut self,
        label: &PathLabel,
        a: Place<'_>,
        b: Place<'_>,
        x: &Struct,
        y: &Struct,
    ) -> DiffResult<()> {
        for field in &x.fields {
            let child = label.field(&field.name);
            match y.field(&field.name) {
                Some(other) => self.diff(&child, a.part(&field.value), b.part(other))?,
                None => self.emit(
                    &child,
                    format_args!("{} != (missing)", field.value.render()),
                )?,
            }
        }
        for field in &y.fields {
            if x.field(&field.name).is_none() {
                self.emit(
                    &label.field(&field.name),
                    format_args!("(missing) != {}", field.value.render()),
                )?;
            }
        }
        Ok(())
    }

    /// Map values have no stable location, so they never take part in cycle
    /// detection.
    fn diff_map(
        &mut self,
        label: &PathLabel,
        xs: &[(Value, Value)],
        ys: &[(Value, Value)],
    ) -> DiffResult<()> {
        let keys = match_keys(xs, ys)?;
        for &i in &keys.only_left {
            let (k, v) = &xs[i];
            self.emit(&label.key(k), format_args!("{} != (missing)", v.render()))?;
        }
        for &(i, j) in &keys.both {
            self.diff(
                &label.key(&xs[i].0),
                Place::detached(&xs[i].1),
                Place::detached(&ys[j].1),
            )?;
        }
        for &j in &keys.only_right {
            let (k, v) = &ys[j];
            self.emit(&label.key(k), format_args!("(missing) != {}", v.render()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use serde::Serialize;
    use vdiff_types::{Opaque, OpaqueKind, Ptr};

    use super::*;
    use crate::DiffError;

    fn lines(a: Value, b: Value) -> Vec<String> {
        diff(&a, &b).unwrap()
    }

    /// A ring of `len` nodes, each pointing at the next.
    fn ring(len: usize) -> Value {
        let ptrs: Vec<Ptr> = (0..len).map(|_| Ptr::alloc()).collect();
        for (i, p) in ptrs.iter().enumerate() {
            let next = ptrs[(i + 1) % len].clone();
            p.set(Value::record("Node", [("next", next.into())])).unwrap();
        }
        Value::Ptr(ptrs[0].clone())
    }

    #[test]
    fn equal_primitives_produce_nothing() {
        assert!(lines(1i32.into(), 1i32.into()).is_empty());
        assert!(lines("x".into(), "x".into()).is_empty());
        assert!(lines(Value::Nil, Value::Nil).is_empty());
    }

    #[test]
    fn primitive_inequality() {
        assert_eq!(lines(1i64.into(), 2i64.into()), ["1 != 2"]);
        assert_eq!(lines(true.into(), false.into()), ["true != false"]);
        assert_eq!(lines(7u32.into(), 9u32.into()), ["7 != 9"]);
    }

    #[test]
    fn strings_are_quoted() {
        assert_eq!(lines("a".into(), "b".into()), [r#""a" != "b""#]);
    }

    #[test]
    fn floats_compare_exactly() {
        assert_eq!(
            lines((0.1f64 + 0.2).into(), 0.3f64.into()),
            ["0.30000000000000004 != 0.3"]
        );
        assert_eq!(lines(f64::NAN.into(), f64::NAN.into()), ["NaN != NaN"]);
    }

    #[test]
    fn complex_numbers() {
        assert_eq!(
            lines(Value::complex128(1.0, 2.0), Value::complex128(1.0, 3.0)),
            ["(1+2i) != (1+3i)"]
        );
        assert!(lines(Value::complex64(1.0, 2.0), Value::complex64(1.0, 2.0)).is_empty());
    }

    #[test]
    fn type_mismatch_stops_recursion() {
        assert_eq!(lines(1i64.into(), "x".into()), ["i64 != String"]);
        assert_eq!(lines(1u8.into(), 1u16.into()), ["u8 != u16"]);
        let a = Value::record("A", [("x", 1i32.into())]);
        let b = Value::record("B", [("x", 2i32.into())]);
        assert_eq!(lines(a, b), ["A != B"]);
    }

    #[test]
    fn absent_values() {
        assert_eq!(lines(Value::Nil, 1i32.into()), ["nil != 1"]);
        assert_eq!(lines("s".into(), Value::Nil), [r#""s" != nil"#]);
    }

    #[test]
    fn field_level_labels() {
        let a = Value::record("T", [("X", 1i32.into())]);
        let b = Value::record("T", [("X", 2i32.into())]);
        assert_eq!(lines(a, b), ["X: 1 != 2"]);
    }

    #[test]
    fn fields_reported_in_declaration_order() {
        let a = Value::record("T", [("b", 1i32.into()), ("a", 1i32.into())]);
        let b = Value::record("T", [("b", 2i32.into()), ("a", 2i32.into())]);
        assert_eq!(lines(a, b), ["b: 1 != 2", "a: 1 != 2"]);
    }

    #[test]
    fn mismatched_field_sets() {
        let a = Value::record("S", [("a", 1i32.into()), ("b", 2i32.into())]);
        let b = Value::record("S", [("a", 1i32.into()), ("c", 3i32.into())]);
        assert_eq!(lines(a, b), ["b: 2 != (missing)", "c: (missing) != 3"]);
    }

    #[test]
    fn sequence_length_mismatch_is_one_line() {
        let a = Value::seq([1i32.into(), 2i32.into()]);
        let b = Value::seq([1i32.into()]);
        assert_eq!(lines(a, b), ["Vec[2] != Vec[1]"]);
    }

    #[test]
    fn sequence_elements_are_labelled() {
        let a = Value::seq([1i32.into(), 2i32.into()]);
        let b = Value::seq([1i32.into(), 3i32.into()]);
        assert_eq!(lines(a, b), ["[1]: 2 != 3"]);
    }

    #[test]
    fn arrays_differ_per_index_or_by_length_type() {
        let a = Value::array([1i32.into(), 2i32.into()]);
        let b = Value::array([0i32.into(), 3i32.into()]);
        assert_eq!(lines(a.clone(), b), ["[0]: 1 != 0", "[1]: 2 != 3"]);
        assert_eq!(lines(a, Value::array([1i32.into()])), ["[_; 2] != [_; 1]"]);
    }

    #[test]
    fn map_missing_on_right() {
        let a = Value::map([("a".into(), 1i32.into())]);
        assert_eq!(lines(a, Value::map([])), [r#"["a"]: 1 != (missing)"#]);
    }

    #[test]
    fn map_missing_on_left() {
        let b = Value::map([("a".into(), 1i32.into())]);
        assert_eq!(lines(Value::map([]), b), [r#"["a"]: (missing) != 1"#]);
    }

    #[test]
    fn map_value_mismatch() {
        let a = Value::map([("a".into(), 1i32.into())]);
        let b = Value::map([("a".into(), 2i32.into())]);
        assert_eq!(lines(a, b), [r#"["a"]: 1 != 2"#]);
    }

    #[test]
    fn map_lines_are_grouped_left_both_right() {
        let a = Value::map([
            ("a".into(), 1i32.into()),
            ("b".into(), 2i32.into()),
            ("c".into(), 3i32.into()),
        ]);
        let b = Value::map([
            ("d".into(), 4i32.into()),
            ("c".into(), 3i32.into()),
            ("b".into(), 20i32.into()),
        ]);
        assert_eq!(
            lines(a, b),
            [
                r#"["a"]: 1 != (missing)"#,
                r#"["b"]: 2 != 20"#,
                r#"["d"]: (missing) != 4"#,
            ]
        );
    }

    #[test]
    fn map_with_duplicate_keys_equals_itself() {
        let m = Value::map([("a".into(), 1i32.into()), ("a".into(), 2i32.into())]);
        assert!(diff(&m, &m).unwrap().is_empty());

        let fewer = Value::map([("a".into(), 1i32.into())]);
        assert_eq!(lines(m, fewer), [r#"["a"]: 2 != (missing)"#]);
    }

    #[test]
    fn map_with_illegal_keys_is_fatal() {
        let m = || Value::map([(Value::seq([1i32.into()]), 1i32.into())]);
        let err = diff(&m(), &m()).unwrap_err();
        assert!(matches!(err, DiffError::InvalidMapKey { .. }));
        assert_eq!(err.to_string(), "invalid map key type Vec");
    }

    #[test]
    fn optionals() {
        assert!(lines(Value::none(), Value::none()).is_empty());
        assert_eq!(lines(Value::none(), Value::some(3i32.into())), ["nil != Some(3)"]);
        assert_eq!(lines(Value::some(3i32.into()), Value::none()), ["Some(3) != nil"]);
        assert_eq!(
            lines(Value::some(1i32.into()), Value::some(2i32.into())),
            ["1 != 2"]
        );
    }

    #[test]
    fn pointers() {
        assert!(lines(Ptr::null().into(), Ptr::null().into()).is_empty());
        assert_eq!(
            lines(Ptr::null().into(), Ptr::new(1i32.into()).into()),
            ["nil != &1"]
        );
        let a = Value::record("W", [("p", Ptr::new(1i32.into()).into())]);
        let b = Value::record("W", [("p", Ptr::new(2i32.into()).into())]);
        assert_eq!(lines(a, b), ["p: 1 != 2"]);
    }

    #[test]
    fn variants_unwrap_to_concrete_types() {
        let a = Value::variant("Any", 1i32.into());
        let b = Value::variant("Any", "one".into());
        assert_eq!(lines(a, b), ["i32 != String"]);

        let a = Value::variant("Any", Value::Nil);
        let b = Value::variant("Any", 1i32.into());
        assert_eq!(lines(a, b), ["nil != 1"]);
    }

    #[test]
    fn opaque_handles_compare_by_address() {
        let f = |addr| Value::Opaque(Opaque::new(OpaqueKind::Func, "handler", addr));
        assert!(lines(f(0x10), f(0x10)).is_empty());
        assert_eq!(lines(f(0x10), f(0x20)), ["0x10 != 0x20"]);
    }

    #[test]
    fn self_referential_record_against_itself() {
        let v = ring(1);
        assert!(diff(&v, &v).unwrap().is_empty());
    }

    #[test]
    fn isomorphic_cycles_are_equal() {
        assert!(lines(ring(1), ring(1)).is_empty());
        assert!(lines(ring(3), ring(3)).is_empty());
    }

    #[test]
    fn cycles_of_different_length() {
        let out = lines(ring(1), ring(2));
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("next: Node { next: "), "{out:?}");
        assert!(out[0].contains(" (previously visited) != Node"), "{out:?}");

        let out = lines(ring(2), ring(1));
        assert_eq!(out.len(), 1);
        assert!(out[0].ends_with(" (previously visited)"), "{out:?}");
    }

    #[test]
    fn aliasing_differences_are_reported() {
        let shared = Ptr::new(1i32.into());
        let a = Value::seq([shared.clone().into(), shared.into()]);
        let b = Value::seq([Ptr::new(1i32.into()).into(), Ptr::new(1i32.into()).into()]);
        assert_eq!(lines(a, b), ["[1]: 1 (previously visited) != 1"]);
    }

    #[derive(Serialize)]
    struct Server {
        host: String,
        ports: Vec<u16>,
        labels: BTreeMap<String, String>,
        backup: Option<Box<Server>>,
    }

    #[derive(Serialize)]
    enum Shape {
        Circle(f64),
        Rect { w: u32, h: u32 },
    }

    fn server(host: &str, ports: &[u16], backup: Option<Server>) -> Server {
        Server {
            host: host.into(),
            ports: ports.to_vec(),
            labels: BTreeMap::from([("env".to_string(), "prod".to_string())]),
            backup: backup.map(Box::new),
        }
    }

    #[test]
    fn serialize_values_get_nested_labels() {
        let a = server("a", &[80, 443], Some(server("b", &[80], None)));
        let b = server("a", &[80, 8443], Some(server("c", &[80], None)));
        assert_eq!(
            diff_serialize(&a, &b).unwrap(),
            ["ports[1]: 443 != 8443", r#"backup.host: "b" != "c""#]
        );
    }

    #[test]
    fn serialize_enum_variants() {
        assert_eq!(
            diff_serialize(&Shape::Circle(1.0), &Shape::Rect { w: 1, h: 2 }).unwrap(),
            ["Shape::Circle != Shape::Rect"]
        );
        assert_eq!(
            diff_serialize(&Shape::Circle(1.0), &Shape::Circle(2.5)).unwrap(),
            ["0: 1 != 2.5"]
        );
    }

    #[test]
    fn write_diff_terminates_lines() {
        let mut out: Vec<u8> = Vec::new();
        let a = Value::record("T", [("x", 1i32.into()), ("y", 1i32.into())]);
        let b = Value::record("T", [("x", 2i32.into()), ("y", 3i32.into())]);
        write_diff(&mut out, &a, &b).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x: 1 != 2\ny: 1 != 3\n");
    }

    #[test]
    fn log_diff_forwards_each_line() {
        #[derive(Default)]
        struct Recorder(Vec<String>);
        impl Logf for Recorder {
            fn logf(&mut self, message: fmt::Arguments<'_>) {
                self.0.push(message.to_string());
            }
        }

        let mut rec = Recorder::default();
        log_diff(&mut rec, &Value::from(1i32), &Value::from(2i32)).unwrap();
        assert_eq!(rec.0, ["1 != 2"]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let a = Value::from(serde_json::json!({"a": [1, 2], "b": {"c": null}}));
        let b = Value::from(serde_json::json!({"a": [1, 3], "b": {"c": 1}, "d": true}));
        let first = diff(&a, &b).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, diff(&a, &b).unwrap());
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Nil),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            any::<u8>().prop_map(Value::from),
            "[a-z]{0,4}".prop_map(Value::from),
        ];
        leaf.prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Seq),
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                prop::collection::btree_map("[a-c]", inner.clone(), 0..4).prop_map(|m| {
                    Value::map(m.into_iter().map(|(k, v)| (Value::from(k), v)))
                }),
                (inner.clone(), inner.clone())
                    .prop_map(|(x, y)| Value::record("Pair", [("x", x), ("y", y)])),
                inner.clone().prop_map(Value::some),
                inner.prop_map(|v| Value::Ptr(Ptr::new(v))),
            ]
        })
    }

    proptest! {
        #[test]
        fn diff_with_itself_is_empty(v in arb_value()) {
            prop_assert!(diff(&v, &v).unwrap().is_empty());
            prop_assert!(diff(&v, &v.clone()).unwrap().is_empty());
        }

        #[test]
        fn diff_is_deterministic(a in arb_value(), b in arb_value()) {
            prop_assert_eq!(diff(&a, &b).unwrap(), diff(&a, &b).unwrap());
        }

        #[test]
        fn unequal_roots_of_distinct_types_give_one_line(a in any::<i64>(), b in "[a-z]{0,4}") {
            let out = diff(&a.into(), &b.into()).unwrap();
            prop_assert_eq!(out, vec!["i64 != String".to_string()]);
        }
    }
}
