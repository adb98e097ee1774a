//! Generic plan values: nested mappings, sequences and scalars.

use indexmap::IndexMap;

/// A parsed plan value.
///
/// Mappings preserve insertion order so a plan re-serializes
/// reproducibly; the order carries no semantic weight in comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Mapping(IndexMap<String, Value>),
    Sequence(Vec<Value>),
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Mapping view, if this value is a mapping.
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Sequence view, if this value is a sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// String view, if this value is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view: integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Look up `key` if this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variants() {
        let mut map = IndexMap::new();
        map.insert("count".to_string(), Value::Int(3));
        let value = Value::Mapping(map);

        assert!(value.as_mapping().is_some());
        assert_eq!(value.get("count").and_then(Value::as_f64), Some(3.0));
        assert_eq!(value.get("missing"), None);
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn int_widens_to_f64() {
        assert_eq!(Value::Int(-7).as_f64(), Some(-7.0));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Bool(true).as_f64(), None);
    }
}
