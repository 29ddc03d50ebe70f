//! # Emitter
//!
//! A synchronous, in-process event emitter whose subscriptions can be keyed
//! by a structured params payload.
//!
//! ## Overview
//!
//! An [`Emitter`] maps event names to ordered buckets of subscriptions. A
//! subscription either matches every emission of its event name (wildcard) or
//! only emissions whose params canonicalize to the same [`ParamsKey`].
//!
//! ## Features
//!
//! * **Params filters**: payloads are compared by canonical key, independent of map member order.
//! * **Ordered dispatch**: listeners run inline, in registration order.
//! * **Re-entrant**: listeners may register, remove or emit on the same emitter.
//! * **One-shot listeners**: `once` subscriptions fire at most once.
//! * **High Performance**: `FxHashMap` + `parking_lot::Mutex`, lock never held across listeners.
//!
//! # Example
//!
//! ```rust
//! use pemit_emitter::{Emitter, EmitterError, Listener, Scope};
//! use serde_json::json;
//!
//! fn main() -> Result<(), EmitterError> {
//!     let emitter = Emitter::<String>::new();
//!
//!     emitter.on_params("user", &json!({ "id": 42 }), Listener::<String>::new(|event, params, data| {
//!         assert_eq!(event.name(), "user");
//!         assert_eq!(params, Some(&json!({ "id": 42 })));
//!         assert_eq!(data, "renamed");
//!     }))?;
//!     emitter.on("user", Listener::<String>::new(|_, params, _| assert!(params.is_none())))?;
//!
//!     assert_eq!(emitter.emit_params("user", &json!({ "id": 42 }), &"renamed".to_owned())?, 2);
//!     assert_eq!(emitter.emit("user", &"renamed".to_owned()), 1);
//!     assert_eq!(emitter.listeners_count(&Scope::All), 2);
//!     Ok(())
//! }
//! ```

mod config;
mod emitter;
mod error;
mod listener;
mod scope;
mod subscription;

pub use config::{DEFAULT_MAX_LISTENERS, EmitterConfig};
pub use emitter::Emitter;
pub use error::{EmitterError, EmitterErrorExt};
pub use listener::{EventInfo, Listener, ListenerFn, ListenerId};
pub use pemit_canonical::{CanonicalError, ParamsKey, Value};
pub use scope::{Filter, Scope, Selector};
pub use subscription::Subscription;
