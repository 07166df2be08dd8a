use std::fmt;

use vdiff_types::Value;

/// How a sub-value was reached from the comparison root, e.g.
/// `config.servers[2].ports["http"]`.
///
/// Deriving a child label never touches the parent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathLabel(String);

impl PathLabel {
    /// The empty label of the comparison root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this is the root label.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The label text, empty at the root.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label of a struct field.
    pub fn field(&self, name: &str) -> Self {
        self.child(name)
    }

    /// Label of an array or sequence element.
    pub fn index(&self, i: usize) -> Self {
        self.child(&format!("[{i}]"))
    }

    /// Label of a map entry, keyed by the rendered key.
    pub fn key(&self, key: &Value) -> Self {
        self.child(&format!("[{}]", key.render()))
    }

    fn child(&self, segment: &str) -> Self {
        let mut label = String::with_capacity(self.0.len() + segment.len() + 1);
        label.push_str(&self.0);
        if !label.is_empty() && !segment.starts_with('[') {
            label.push('.');
        }
        label.push_str(segment);
        Self(label)
    }
}

impl fmt::Display for PathLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
