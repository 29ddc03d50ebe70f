use crate::error::{CanonicalError, CanonicalErrorExt};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A canonicalized parameter payload.
///
/// Holds the canonical string used for equality together with the JSON value it
/// was derived from. The key owns its data, so mutating the caller's original
/// payload after construction never changes what the key matches.
///
/// Equality, ordering and hashing consider the canonical string only.
#[derive(Clone)]
pub struct ParamsKey {
    canonical: Arc<str>,
    value: Arc<Value>,
}

impl ParamsKey {
    /// Canonicalizes any serializable payload.
    ///
    /// # Errors
    /// Returns [`CanonicalError::Serialize`] if the payload has no JSON
    /// representation, e.g. a map keyed by tuples.
    ///
    /// # Examples
    /// ```rust
    /// use pemit_canonical::ParamsKey;
    /// use std::collections::HashMap;
    ///
    /// # fn main() -> Result<(), pemit_canonical::CanonicalError> {
    /// let key = ParamsKey::new(&HashMap::from([("id", 1)]))?;
    /// assert_eq!(key.as_str(), r#"{"id":1}"#);
    ///
    /// let bad = HashMap::from([((1, 2), "tuple keys")]);
    /// assert!(ParamsKey::new(&bad).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<P: Serialize + ?Sized>(params: &P) -> Result<Self, CanonicalError> {
        let value = serde_json::to_value(params).context("Converting params to JSON")?;
        Ok(Self::from_value(value))
    }

    /// Builds a key from an already materialized JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let canonical = canonical_string(&value);
        Self { canonical: canonical.into(), value: Arc::new(value) }
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// The JSON value the key was built from, in its original member order.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl From<Value> for ParamsKey {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl PartialEq for ParamsKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ParamsKey {}

impl PartialOrd for ParamsKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamsKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl Hash for ParamsKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Debug for ParamsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParamsKey").field(&&*self.canonical).finish()
    }
}

impl fmt::Display for ParamsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Encodes `value` as compact JSON with object members sorted by key.
///
/// The result does not depend on the member order of the input, nor on
/// whether `serde_json` was built with `preserve_order`.
#[must_use]
pub fn canonical_string(value: &Value) -> String {
    sorted(value).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        Value::Object(map) => {
            let mut members: Vec<(&String, &Value)> = map.iter().collect();
            members.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(members.into_iter().map(|(k, v)| (k.clone(), sorted(v))).collect())
        },
        scalar => scalar.clone(),
    }
}
