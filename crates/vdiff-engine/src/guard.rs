//! Cycle detection for the structural walk.
//!
//! Only addressable values get an [`Identity`]: anything reached through a
//! `Ptr` or `Option`, fields of addressable structs, elements of addressable
//! arrays, and sequence elements. Roots, map keys and values, and the
//! contents of variants are not addressable, so a cycle that only passes
//! through those positions is not caught and will recurse until the stack
//! runs out.

use std::collections::HashMap;

use vdiff_types::{Type, Value};

/// Where a value lives, paired with its type.
///
/// The address is only meaningful while the values being compared are
/// borrowed, which holds for the whole of a single comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    addr: usize,
    ty: Type,
}

impl Identity {
    /// Identity of `value` as stored at its current location.
    pub fn of(value: &Value, ty: Type) -> Self {
        Self {
            addr: std::ptr::from_ref(value) as usize,
            ty,
        }
    }
}

/// Outcome of registering a pair of identities with the [`CycleGuard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    /// Neither side was seen before; compare the pair.
    First,
    /// The same pair was already compared; stop without output.
    Repeat,
    /// The left value was already compared against a different right value.
    LeftRevisited,
    /// The right value was already compared against a different left value.
    RightRevisited,
}

/// One visited map per side, each mapping an identity to the counterpart it
/// was last paired with.
#[derive(Debug, Default)]
pub struct CycleGuard {
    left: HashMap<Identity, Identity>,
    right: HashMap<Identity, Identity>,
}

impl CycleGuard {
    /// Create a guard with nothing visited.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `a` and `b` as counterparts and report whether either was seen.
    ///
    /// The pairing is recorded even when it contradicts an earlier one.
    pub fn visit(&mut self, a: Identity, b: Identity) -> Visit {
        let visit = match self.left.get(&a) {
            Some(seen) if *seen == b => Visit::Repeat,
            Some(_) => Visit::LeftRevisited,
            None if self.right.contains_key(&b) => Visit::RightRevisited,
            None => Visit::First,
        };
        self.left.insert(a.clone(), b.clone());
        self.right.insert(b, a);
        visit
    }

    /// Number of left-hand identities seen so far.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether nothing has been visited yet.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}
