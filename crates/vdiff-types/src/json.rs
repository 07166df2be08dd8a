//! Conversion from `serde_json` documents.

use serde_json::Value as Json;

use crate::value::Value;

/// JSON `null` becomes [`Value::Nil`]. Integers become `i64` when they fit and
/// `u64` otherwise, so `1` and `-1` share a type; other numbers become `f64`.
/// Object members keep the order `serde_json` yields them in.
impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => b.into(),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.into()
                } else if let Some(u) = n.as_u64() {
                    u.into()
                } else {
                    n.as_f64().map_or(Value::Nil, Value::from)
                }
            }
            Json::String(s) => s.into(),
            Json::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            Json::Object(members) => Value::Map(
                members
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
