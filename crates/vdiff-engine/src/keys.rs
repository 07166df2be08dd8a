//! Map key matching.
//!
//! Keys are paired by structural equality with a pairwise scan, so any key
//! kind that is comparable works without hashing. Matching costs
//! O(|left| x |right|) key comparisons.

use vdiff_types::Value;

use crate::error::{DiffError, DiffResult};

/// Result of pairing up two maps' keys, as indices into their entry lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMatch {
    /// Left entries with no equal key on the right.
    pub only_left: Vec<usize>,
    /// `(left, right)` entries whose keys are equal.
    pub both: Vec<(usize, usize)>,
    /// Right entries with no equal key on the left.
    pub only_right: Vec<usize>,
}

/// Structural equality for map keys.
///
/// Keys of different types are unequal. Sequences, maps and functions are
/// never valid keys; matching two of them is an error. `Ptr` and handle keys
/// compare by address, `Option` keys by content. Floats compare exactly, so a
/// NaN key never matches anything.
pub fn key_equal(a: &Value, b: &Value) -> DiffResult<bool> {
    let ty = match (a.type_desc(), b.type_desc()) {
        (None, None) => return Ok(true),
        (Some(at), Some(bt)) if at == bt => at,
        _ => return Ok(false),
    };
    if !ty.kind().is_valid_key() {
        return Err(DiffError::InvalidMapKey { ty });
    }

    let equal = match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(_, x), Value::Int(_, y)) => x == y,
        (Value::Uint(_, x), Value::Uint(_, y)) => x == y,
        (Value::Float(_, x), Value::Float(_, y)) => x == y,
        (Value::Complex(_, x), Value::Complex(_, y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => all_equal(xs.iter().zip(ys))?,
        (Value::Struct(x), Value::Struct(y)) => {
            x.fields.len() == y.fields.len()
                && x.fields.iter().zip(&y.fields).all(|(fx, fy)| fx.name == fy.name)
                && all_equal(
                    x.fields
                        .iter()
                        .zip(&y.fields)
                        .map(|(fx, fy)| (&fx.value, &fy.value)),
                )?
        }
        (Value::Variant(x), Value::Variant(y)) => key_equal(&x.value, &y.value)?,
        (Value::Option(x), Value::Option(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => key_equal(x, y)?,
            _ => false,
        },
        (Value::Ptr(x), Value::Ptr(y)) => x.addr() == y.addr(),
        (Value::Opaque(x), Value::Opaque(y)) => x.addr == y.addr,
        _ => unreachable!("keys of type {ty} have different shapes"),
    };
    Ok(equal)
}

fn all_equal<'a>(pairs: impl Iterator<Item = (&'a Value, &'a Value)>) -> DiffResult<bool> {
    for (x, y) in pairs {
        if !key_equal(x, y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Pair up the keys of two maps.
///
/// Pairing is one-to-one: each left key takes the first equal right key not
/// already taken by an earlier left key, so duplicate keys pair up in order.
/// Order follows the entry lists.
pub fn match_keys(left: &[(Value, Value)], right: &[(Value, Value)]) -> DiffResult<KeyMatch> {
    let mut m = KeyMatch::default();
    let mut claimed = vec![false; right.len()];

    for (i, (ak, _)) in left.iter().enumerate() {
        match unclaimed_position(ak, right, &claimed)? {
            Some(j) => {
                claimed[j] = true;
                m.both.push((i, j));
            }
            None => m.only_left.push(i),
        }
    }
    m.only_right = claimed
        .iter()
        .enumerate()
        .filter(|(_, taken)| !**taken)
        .map(|(j, _)| j)
        .collect();

    Ok(m)
}

fn unclaimed_position(
    key: &Value,
    entries: &[(Value, Value)],
    claimed: &[bool],
) -> DiffResult<Option<usize>> {
    for (i, (k, _)) in entries.iter().enumerate() {
        if !claimed[i] && key_equal(key, k)? {
            return Ok(Some(i));
        }
    }
    Ok(None)
}
