use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Process-unique identity of a single subscription.
pub type ListenerId = u64;

/// Closure type for event listeners.
///
/// Arguments are the event descriptor, the params payload (present only for
/// subscriptions registered with a params filter) and the emitted data.
pub type ListenerFn<D> = dyn Fn(&EventInfo<'_>, Option<&Value>, &D) + Send + Sync;

/// Descriptor passed to a listener on every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInfo<'a> {
    name: &'a str,
    id: ListenerId,
    once: bool,
}

impl<'a> EventInfo<'a> {
    pub(crate) const fn new(name: &'a str, id: ListenerId, once: bool) -> Self {
        Self { name, id, once }
    }

    /// The emitted event name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The subscription being invoked.
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether this is the single invocation of a `once` subscription.
    #[must_use]
    pub const fn is_once(&self) -> bool {
        self.once
    }
}

/// A shareable event handler.
///
/// Cloning is cheap and keeps identity: clones compare equal under
/// [`Listener::ptr_eq`], which is what `off` and listener selectors match on.
/// Registering the same listener twice creates two independent subscriptions.
pub struct Listener<D> {
    callback: Arc<ListenerFn<D>>,
}

impl<D> Listener<D> {
    /// Wraps a closure.
    ///
    /// # Examples
    /// ```rust
    /// use pemit_emitter::Listener;
    ///
    /// let listener = Listener::<String>::new(|event, _params, data| {
    ///     assert_eq!(event.name(), "saved");
    ///     assert!(!data.is_empty());
    /// });
    /// assert!(listener.ptr_eq(&listener.clone()));
    /// ```
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&EventInfo<'_>, Option<&Value>, &D) + Send + Sync + 'static,
    {
        Self { callback: Arc::new(callback) }
    }

    /// Returns `true` if both handles wrap the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }

    pub(crate) fn call(&self, info: &EventInfo<'_>, params: Option<&Value>, data: &D) {
        (self.callback)(info, params, data);
    }
}

impl<D> Clone for Listener<D> {
    fn clone(&self) -> Self {
        Self { callback: Arc::clone(&self.callback) }
    }
}

impl<D> fmt::Debug for Listener<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("callback", &Arc::as_ptr(&self.callback)).finish()
    }
}
