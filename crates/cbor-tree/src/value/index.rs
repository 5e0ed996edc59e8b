//! Indexes into the [Value] type.

use super::Value;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::string::{String, ToString};
#[cfg(feature = "std")]
use std::string::{String, ToString};

/// Indexes into the [Value] type.
pub trait Index {
    /// If possible, returns a reference to the value using `&self` as an index for the [Value] parameter.
    fn index<'a>(&self, v: &'a Value) -> Option<&'a Value>;

    /// If possible, returns a mutable reference to the value using `&self` as an index for the [Value] parameter.
    fn index_mut<'a>(&self, v: &'a mut Value) -> Option<&'a mut Value>;
}

impl Index for usize {
    fn index<'a>(&self, v: &'a Value) -> Option<&'a Value> {
        match v {
            Value::Array(a) => a.get(*self),
            _ => None,
        }
    }

    fn index_mut<'a>(&self, v: &'a mut Value) -> Option<&'a mut Value> {
        match v {
            Value::Array(a) => a.get_mut(*self),
            _ => None,
        }
    }
}

impl Index for Value {
    fn index<'a>(&self, v: &'a Value) -> Option<&'a Value> {
        match (v, self) {
            (Value::Map(m), _) => m.get(self),
            (Value::Object(o), Value::TextStr(key)) => o.get(key),
            _ => None,
        }
    }

    fn index_mut<'a>(&self, v: &'a mut Value) -> Option<&'a mut Value> {
        match (v, self) {
            (Value::Map(m), _) => m.get_mut(self),
            (Value::Object(o), Value::TextStr(key)) => o.get_mut(key),
            _ => None,
        }
    }
}

impl Index for str {
    fn index<'a>(&self, v: &'a Value) -> Option<&'a Value> {
        match v {
            Value::Object(o) => o.get(self),
            Value::Map(m) => m.get(&Value::TextStr(self.to_string())),
            _ => None,
        }
    }

    fn index_mut<'a>(&self, v: &'a mut Value) -> Option<&'a mut Value> {
        match v {
            Value::Object(o) => o.get_mut(self),
            Value::Map(m) => m.get_mut(&Value::TextStr(self.to_string())),
            _ => None,
        }
    }
}

impl Index for String {
    fn index<'a>(&self, v: &'a Value) -> Option<&'a Value> {
        self.as_str().index(v)
    }

    fn index_mut<'a>(&self, v: &'a mut Value) -> Option<&'a mut Value> {
        self.as_str().index_mut(v)
    }
}

impl<T> Index for &T
where
    T: ?Sized + Index,
{
    fn index<'a>(&self, v: &'a Value) -> Option<&'a Value> {
        (**self).index(v)
    }

    fn index_mut<'a>(&self, v: &'a mut Value) -> Option<&'a mut Value> {
        (**self).index_mut(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Int;

    #[cfg(all(feature = "alloc", not(feature = "std")))]
    use alloc::{collections::BTreeMap, vec};
    #[cfg(feature = "std")]
    use std::{collections::BTreeMap, vec};

    #[test]
    fn test_index_array() {
        let v = Value::Array(vec![Value::from(1u8), Value::from(2u8)]);
        assert_eq!(v.get(1usize), Some(&Value::from(2u8)));
        assert_eq!(v.get(2usize), None);
    }

    #[test]
    fn test_index_object_and_map_by_str() {
        let object = Value::Object(BTreeMap::from([("a".to_string(), Value::from(1u8))]));
        assert_eq!(object.get("a"), Some(&Value::Int(Int::Pos(1))));

        let map = Value::Map(BTreeMap::from([
            (Value::from("a"), Value::from(1u8)),
            (Value::from(2u8), Value::from(3u8)),
        ]));
        assert_eq!(map.get("a"), Some(&Value::Int(Int::Pos(1))));
        assert_eq!(map.get(Value::from(2u8)), Some(&Value::Int(Int::Pos(3))));
    }

    #[test]
    fn test_index_mut() {
        let mut v = Value::Array(vec![Value::Null]);
        if let Some(slot) = v.get_mut(0usize) {
            *slot = Value::Bool(true);
        }
        assert_eq!(v.get(0usize), Some(&Value::Bool(true)));
    }
}
