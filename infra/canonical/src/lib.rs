//! # Canonical
//!
//! Canonical string keys for structured parameter payloads.
//!
//! ## Overview
//!
//! A [`ParamsKey`] is computed once from any `serde::Serialize` value and
//! compared by its canonical string. The encoding is compact JSON with object
//! members sorted by key at every nesting level, so two payloads that differ
//! only in map insertion order produce the same key. Array order is
//! significant, and so is the number representation (`1` and `1.0` differ).
//!
//! # Example
//!
//! ```rust
//! use pemit_canonical::{CanonicalError, ParamsKey};
//! use serde_json::json;
//!
//! fn main() -> Result<(), CanonicalError> {
//!     let a = ParamsKey::new(&json!({ "user": 7, "scope": "orders" }))?;
//!     let b = ParamsKey::new(&json!({ "scope": "orders", "user": 7 }))?;
//!
//!     assert_eq!(a, b);
//!     assert_eq!(a.as_str(), r#"{"scope":"orders","user":7}"#);
//!     Ok(())
//! }
//! ```

mod error;
mod key;

pub use error::{CanonicalError, CanonicalErrorExt};
pub use key::{ParamsKey, canonical_string};
pub use serde_json::Value;
