use crate::config::EmitterConfig;
use crate::error::EmitterError;
use crate::listener::{EventInfo, Listener, ListenerId};
use crate::scope::{Filter, Scope};
use crate::subscription::Subscription;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use pemit_canonical::ParamsKey;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, trace, warn};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// One registered subscription.
pub(crate) struct Entry<D> {
    pub(crate) id: ListenerId,
    pub(crate) listener: Listener<D>,
    pub(crate) params: Option<ParamsKey>,
    pub(crate) once: bool,
    fired: AtomicBool,
}

impl<D> Entry<D> {
    fn accepts(&self, key: Option<&ParamsKey>) -> bool {
        self.params.as_ref().is_none_or(|own| key == Some(own))
    }

    /// Claims the single invocation of a `once` entry. Always succeeds for persistent entries.
    fn claim(&self) -> bool {
        !self.once || !self.fired.swap(true, Ordering::AcqRel)
    }
}

type Bucket<D> = Vec<Arc<Entry<D>>>;

/// Shared registry state. Buckets are never left empty.
pub(crate) struct Registry<D> {
    config: EmitterConfig,
    buckets: Mutex<FxHashMap<Arc<str>, Bucket<D>>>,
}

impl<D> Registry<D> {
    pub(crate) fn remove(&self, event: &str, id: ListenerId) -> bool {
        // Entries are dropped outside the lock: a listener's captured state may
        // call back into the emitter from its destructor.
        let removed = {
            let mut buckets = self.buckets.lock();
            let Some(bucket) = buckets.get_mut(event) else {
                return false;
            };
            let Some(pos) = bucket.iter().position(|entry| entry.id == id) else {
                return false;
            };
            let entry = bucket.remove(pos);
            if bucket.is_empty() {
                buckets.remove(event);
            }
            entry
        };

        trace!(emitter = %self.config.name, event, id = removed.id, "Listener removed");
        true
    }

    pub(crate) fn contains(&self, event: &str, id: ListenerId) -> bool {
        self.buckets
            .lock()
            .get(event)
            .is_some_and(|bucket| bucket.iter().any(|entry| entry.id == id))
    }
}

/// A synchronous event emitter whose subscriptions may be keyed by params.
///
/// Listeners registered for an event name are invoked in registration order.
/// A subscription registered with a params filter only receives emissions
/// whose params canonicalize to the same [`ParamsKey`]; a wildcard subscription
/// receives every emission of its event name.
///
/// `D` is the type of the data value handed to listeners. Cloning an `Emitter`
/// is cheap and yields a handle to the same registry. The registry lock is
/// never held while a listener runs, so listeners may call [`Emitter::on`],
/// [`Emitter::off`] or [`Emitter::emit`] on the emitter that invoked them.
pub struct Emitter<D> {
    registry: Arc<Registry<D>>,
}

impl<D> Emitter<D> {
    /// Creates an empty emitter with the default [`EmitterConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an empty emitter with an explicit configuration.
    #[must_use]
    pub fn with_config(config: EmitterConfig) -> Self {
        Self { registry: Arc::new(Registry { config, buckets: Mutex::new(FxHashMap::default()) }) }
    }

    /// The configuration this emitter was built with.
    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        &self.registry.config
    }

    /// Registers a persistent wildcard subscription.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidEventName`] if `event` is empty.
    ///
    /// # Examples
    /// ```rust
    /// use pemit_emitter::{Emitter, Listener};
    ///
    /// # fn main() -> Result<(), pemit_emitter::EmitterError> {
    /// let emitter = Emitter::<u32>::new();
    /// let subscription = emitter.on("tick", Listener::<u32>::new(|_, params, n| {
    ///     assert!(params.is_none());
    ///     assert_eq!(*n, 1);
    /// }))?;
    ///
    /// assert_eq!(emitter.emit("tick", &1), 1);
    /// assert!(subscription.unsubscribe());
    /// assert_eq!(emitter.emit("tick", &1), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn on(&self, event: &str, listener: Listener<D>) -> Result<Subscription<D>, EmitterError> {
        self.subscribe(event, Filter::Any, listener, false)
    }

    /// Registers a persistent subscription that only matches emissions with equal params.
    ///
    /// The params are canonicalized now; later changes to the caller's value have no effect.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidEventName`] if `event` is empty, or
    /// [`EmitterError::Params`] if `params` cannot be canonicalized.
    ///
    /// # Examples
    /// ```rust
    /// use pemit_emitter::{Emitter, Listener};
    /// use serde_json::json;
    ///
    /// # fn main() -> Result<(), pemit_emitter::EmitterError> {
    /// let emitter = Emitter::<String>::new();
    /// emitter.on_params("order", &json!({ "id": 7 }), Listener::<String>::new(|_, params, data| {
    ///     assert_eq!(params, Some(&json!({ "id": 7 })));
    ///     assert_eq!(data, "shipped");
    /// }))?;
    ///
    /// assert_eq!(emitter.emit_params("order", &json!({ "id": 7 }), &"shipped".to_owned())?, 1);
    /// assert_eq!(emitter.emit_params("order", &json!({ "id": 8 }), &"shipped".to_owned())?, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn on_params<P: Serialize + ?Sized>(
        &self,
        event: &str,
        params: &P,
        listener: Listener<D>,
    ) -> Result<Subscription<D>, EmitterError> {
        self.subscribe(event, Filter::params(params)?, listener, false)
    }

    /// Registers a wildcard subscription that is removed after its first invocation.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidEventName`] if `event` is empty.
    pub fn once(
        &self,
        event: &str,
        listener: Listener<D>,
    ) -> Result<Subscription<D>, EmitterError> {
        self.subscribe(event, Filter::Any, listener, true)
    }

    /// Registers a params-filtered subscription that is removed after its first invocation.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidEventName`] if `event` is empty, or
    /// [`EmitterError::Params`] if `params` cannot be canonicalized.
    pub fn once_params<P: Serialize + ?Sized>(
        &self,
        event: &str,
        params: &P,
        listener: Listener<D>,
    ) -> Result<Subscription<D>, EmitterError> {
        self.subscribe(event, Filter::params(params)?, listener, true)
    }

    /// Registers a subscription with an explicit filter and lifetime.
    ///
    /// The other registration methods are shorthands for this one.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidEventName`] if `event` is empty.
    pub fn subscribe(
        &self,
        event: &str,
        filter: Filter,
        listener: Listener<D>,
        once: bool,
    ) -> Result<Subscription<D>, EmitterError> {
        validate_event_name(event)?;

        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let params = filter.into_key();
        let filtered = params.is_some();
        let entry = Arc::new(Entry { id, listener, params, once, fired: AtomicBool::new(false) });

        let (name, len) = {
            let mut buckets = self.registry.buckets.lock();
            let name = buckets
                .get_key_value(event)
                .map_or_else(|| Arc::from(event), |(name, _)| Arc::clone(name));
            let bucket = buckets.entry(Arc::clone(&name)).or_default();
            bucket.push(entry);
            (name, bucket.len())
        };

        trace!(emitter = %self.registry.config.name, event, id, once, filtered, "Listener registered");

        if let Some(max) = self.registry.config.max_listeners
            && len == max.saturating_add(1)
        {
            warn!(
                emitter = %self.registry.config.name,
                event,
                listeners = len,
                max_listeners = max,
                "Listener limit exceeded; possible listener leak"
            );
        }

        Ok(Subscription::new(Arc::downgrade(&self.registry), name, id))
    }

    /// Removes the subscriptions selected by `scope` and returns how many were removed.
    ///
    /// Unknown event names are ignored. Buckets emptied by the removal are
    /// dropped from the registry; the surviving subscriptions keep their order.
    ///
    /// # Examples
    /// ```rust
    /// use pemit_emitter::{Emitter, Listener, Scope, Selector};
    ///
    /// # fn main() -> Result<(), pemit_emitter::EmitterError> {
    /// let emitter = Emitter::<()>::new();
    /// let noisy = Listener::new(|_, _, _| {});
    /// emitter.on("a", noisy.clone())?;
    /// emitter.on("a", Listener::new(|_, _, _| {}))?;
    /// emitter.on("b", noisy.clone())?;
    ///
    /// assert_eq!(emitter.off(&Scope::Matching("a", Selector::new().listener(&noisy))), 1);
    /// assert_eq!(emitter.off(&Scope::Event("b")), 1);
    /// assert_eq!(emitter.off(&Scope::All), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn off(&self, scope: &Scope<'_, D>) -> usize {
        let removed: Bucket<D> = {
            let mut buckets = self.registry.buckets.lock();
            match scope {
                Scope::All => std::mem::take(&mut *buckets).into_values().flatten().collect(),
                Scope::Event(event) => buckets.remove(*event).unwrap_or_default(),
                Scope::Matching(event, selector) => {
                    let Some(bucket) = buckets.get_mut(*event) else {
                        return 0;
                    };
                    let (removed, kept): (Bucket<D>, Bucket<D>) =
                        std::mem::take(bucket).into_iter().partition(|entry| selector.matches(entry));
                    if kept.is_empty() {
                        buckets.remove(*event);
                    } else {
                        *bucket = kept;
                    }
                    removed
                },
            }
        };

        let count = removed.len();
        match scope {
            Scope::All => debug!(emitter = %self.registry.config.name, count, "Registry cleared"),
            Scope::Event(event) | Scope::Matching(event, _) => {
                trace!(emitter = %self.registry.config.name, event, count, "Listeners removed");
            },
        }
        count
    }

    /// Emits `data` without params and returns the number of invoked listeners.
    ///
    /// Only wildcard subscriptions match.
    pub fn emit(&self, event: &str, data: &D) -> usize {
        self.emit_keyed(event, None, data)
    }

    /// Emits `data` with params and returns the number of invoked listeners.
    ///
    /// Wildcard subscriptions and subscriptions whose params key equals the
    /// canonicalized `params` match.
    ///
    /// # Errors
    /// Returns [`EmitterError::Params`] if `params` cannot be canonicalized. No
    /// listener is invoked in that case.
    pub fn emit_params<P: Serialize + ?Sized>(
        &self,
        event: &str,
        params: &P,
        data: &D,
    ) -> Result<usize, EmitterError> {
        let key = ParamsKey::new(params)?;
        Ok(self.emit_keyed(event, Some(&key), data))
    }

    /// Emits `data` with an already canonicalized key.
    ///
    /// Listeners present when the call starts are each visited once, in
    /// registration order; listeners added while dispatching are not notified
    /// until the next emission. A `once` subscription is removed before its
    /// listener runs and is never invoked twice, even by a nested emission.
    pub fn emit_keyed(&self, event: &str, params: Option<&ParamsKey>, data: &D) -> usize {
        let snapshot: Bucket<D> = {
            let buckets = self.registry.buckets.lock();
            let Some(bucket) = buckets.get(event) else {
                trace!(emitter = %self.registry.config.name, event, "Event dropped: no listeners");
                return 0;
            };
            bucket.iter().filter(|entry| entry.accepts(params)).cloned().collect()
        };

        let mut invoked = 0;
        for entry in snapshot {
            if !entry.claim() {
                continue;
            }
            if entry.once {
                self.registry.remove(event, entry.id);
            }

            let info = EventInfo::new(event, entry.id, entry.once);
            let payload = entry.params.as_ref().and(params).map(ParamsKey::value);
            entry.listener.call(&info, payload, data);
            invoked += 1;
        }

        trace!(emitter = %self.registry.config.name, event, invoked, "Event dispatched");
        invoked
    }

    /// Counts the subscriptions selected by `scope`.
    ///
    /// [`Scope::Event`] counts the whole bucket without any filtering.
    #[must_use]
    pub fn listeners_count(&self, scope: &Scope<'_, D>) -> usize {
        let buckets = self.registry.buckets.lock();
        match scope {
            Scope::All => buckets.values().map(Vec::len).sum(),
            Scope::Event(event) => buckets.get(*event).map_or(0, Vec::len),
            Scope::Matching(event, selector) => buckets.get(*event).map_or(0, |bucket| {
                bucket.iter().filter(|entry| selector.matches(entry)).count()
            }),
        }
    }

    /// Returns `true` if `scope` selects at least one subscription.
    #[must_use]
    pub fn has_listeners(&self, scope: &Scope<'_, D>) -> bool {
        self.listeners_count(scope) > 0
    }

    /// The listeners an emission of `event` with `params` would invoke, in order.
    #[must_use]
    pub fn callbacks(&self, event: &str, params: Option<&ParamsKey>) -> Vec<Listener<D>> {
        self.registry.buckets.lock().get(event).map_or_else(Vec::new, |bucket| {
            bucket
                .iter()
                .filter(|entry| entry.accepts(params))
                .map(|entry| entry.listener.clone())
                .collect()
        })
    }

    /// Event names that currently have at least one subscription, in no particular order.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.registry.buckets.lock().keys().map(|name| name.to_string()).collect()
    }
}

impl<D> Clone for Emitter<D> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry) }
    }
}

impl<D> Default for Emitter<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for Emitter<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (events, listeners) = {
            let buckets = self.registry.buckets.lock();
            (buckets.len(), buckets.values().map(Vec::len).sum::<usize>())
        };
        f.debug_struct("Emitter")
            .field("name", &self.registry.config.name)
            .field("events", &events)
            .field("listeners", &listeners)
            .finish()
    }
}

fn validate_event_name(event: &str) -> Result<(), EmitterError> {
    if event.is_empty() {
        return Err(EmitterError::InvalidEventName {
            message: "event name cannot be empty".into(),
            context: None,
        });
    }
    Ok(())
}
