//! # Pemit
//!
//! Parametrized publish/subscribe: listeners subscribe to an event name,
//! optionally narrowed to one structured params payload, and emitters deliver
//! data to every matching listener in registration order.
//!
//! This crate re-exports the building blocks and adds the process-level
//! pieces: a layered [`config::load_config`] loader and a lazily created
//! [`global`] emitter.
//!
//! ```rust
//! use pemit::{Emitter, Listener, Scope};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), pemit::EmitterError> {
//! let emitter = Emitter::<u32>::new();
//! let subscription = emitter.on_params("job", &json!({ "queue": "mail" }), Listener::<u32>::new(|_, _, n| {
//!     assert_eq!(*n, 7);
//! }))?;
//!
//! assert_eq!(emitter.emit_params("job", &json!({ "queue": "mail" }), &7)?, 1);
//! assert_eq!(emitter.emit_params("job", &json!({ "queue": "sms" }), &7)?, 0);
//!
//! subscription.unsubscribe();
//! assert!(!emitter.has_listeners(&Scope::All));
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
mod global;

pub use error::{PemitError, PemitErrorExt};
pub use global::{global, init_global};
pub use pemit_canonical::{CanonicalError, CanonicalErrorExt, canonical_string};
pub use pemit_emitter::*;
