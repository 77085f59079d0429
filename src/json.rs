//! Safe navigation over untyped JSON trees.
//!
//! Every decoder in this crate goes through [`JsonAccess`] instead of
//! indexing `serde_json::Value` directly. A lookup on a missing key, a
//! wrongly-typed value, or through a non-object node returns `None` —
//! it never panics. This is the single mechanism that implements the
//! required-vs-optional field split without repetitive presence checks.

use serde_json::{Map, Value};

/// Typed, panic-free lookups on a JSON value.
pub trait JsonAccess {
    /// The string at `key`, if present and a string.
    fn get_str(&self, key: &str) -> Option<&str>;

    /// The integer at `key`, if present and a JSON number with an i64 value.
    fn get_i64(&self, key: &str) -> Option<i64>;

    /// The boolean at `key`, if present and a boolean.
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// The object at `key`, if present and an object.
    fn get_object(&self, key: &str) -> Option<&Map<String, Value>>;

    /// The array at `key`, if present and an array.
    fn get_array(&self, key: &str) -> Option<&[Value]>;

    /// Descend through a sequence of object keys, returning the value at
    /// the end of the path.
    fn lookup(&self, path: &[&str]) -> Option<&Value>;
}

impl JsonAccess for Value {
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    fn get_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key)?.as_object()
    }

    fn get_array(&self, key: &str) -> Option<&[Value]> {
        self.get(key)?.as_array().map(Vec::as_slice)
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |node, key| node.get(*key))
    }
}
