use crate::emitter::Registry;
use crate::listener::ListenerId;
use std::fmt;
use std::sync::{Arc, Weak};

/// Unsubscribe handle returned by every registration.
///
/// Revokes exactly the subscription it was created for. The handle holds a
/// weak reference to the registry: it never keeps an emitter alive, and
/// dropping it does not unsubscribe.
pub struct Subscription<D> {
    registry: Weak<Registry<D>>,
    event: Arc<str>,
    id: ListenerId,
}

impl<D> Subscription<D> {
    pub(crate) const fn new(registry: Weak<Registry<D>>, event: Arc<str>, id: ListenerId) -> Self {
        Self { registry, event, id }
    }

    /// Removes the subscription.
    ///
    /// Returns `true` only for the call that actually removed it. Later calls,
    /// calls after a `once` subscription fired, and calls after the emitter was
    /// dropped are no-ops returning `false`.
    pub fn unsubscribe(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| registry.remove(&self.event, self.id))
    }

    /// Whether the subscription is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| registry.contains(&self.event, self.id))
    }

    /// The subscription's identity, as reported by [`crate::EventInfo::id`].
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// The event name the subscription belongs to.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl<D> Clone for Subscription<D> {
    fn clone(&self) -> Self {
        Self { registry: Weak::clone(&self.registry), event: Arc::clone(&self.event), id: self.id }
    }
}

impl<D> fmt::Debug for Subscription<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
