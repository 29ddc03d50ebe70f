use crate::emitter::Entry;
use crate::error::EmitterError;
use crate::listener::Listener;
use pemit_canonical::ParamsKey;
use serde::Serialize;
use std::fmt;

/// Params filter attached to a subscription at registration time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    /// Wildcard: matches every emission of the event, with or without params.
    #[default]
    Any,
    /// Matches only emissions whose params canonicalize to the same key.
    Params(ParamsKey),
}

impl Filter {
    /// Canonicalizes `params` into a [`Filter::Params`].
    ///
    /// # Errors
    /// Returns [`EmitterError::Params`] if the payload cannot be canonicalized.
    pub fn params<P: Serialize + ?Sized>(params: &P) -> Result<Self, EmitterError> {
        Ok(Self::Params(ParamsKey::new(params)?))
    }

    /// The key of a params filter, `None` for the wildcard.
    #[must_use]
    pub const fn key(&self) -> Option<&ParamsKey> {
        match self {
            Self::Any => None,
            Self::Params(key) => Some(key),
        }
    }

    pub(crate) fn into_key(self) -> Option<ParamsKey> {
        match self {
            Self::Any => None,
            Self::Params(key) => Some(key),
        }
    }
}

impl From<ParamsKey> for Filter {
    fn from(key: ParamsKey) -> Self {
        Self::Params(key)
    }
}

impl From<Option<ParamsKey>> for Filter {
    fn from(key: Option<ParamsKey>) -> Self {
        key.map_or(Self::Any, Self::Params)
    }
}

/// Narrows a [`Scope::Matching`] lookup within one event name.
///
/// Each component that is left unset matches everything. With both unset the
/// selector matches the whole bucket.
pub struct Selector<D> {
    listener: Option<Listener<D>>,
    params: Option<ParamsKey>,
}

impl<D> Selector<D> {
    /// A selector with no constraints.
    #[must_use]
    pub const fn new() -> Self {
        Self { listener: None, params: None }
    }

    /// Only subscriptions registered with this exact listener.
    #[must_use]
    pub fn listener(mut self, listener: &Listener<D>) -> Self {
        self.listener = Some(listener.clone());
        self
    }

    /// Only subscriptions registered with a params filter equal to `key`.
    ///
    /// Wildcard subscriptions never satisfy this constraint.
    #[must_use]
    pub fn key(mut self, key: ParamsKey) -> Self {
        self.params = Some(key);
        self
    }

    /// Canonicalizes `params` and constrains on the resulting key.
    ///
    /// # Errors
    /// Returns [`EmitterError::Params`] if the payload cannot be canonicalized.
    pub fn params<P: Serialize + ?Sized>(self, params: &P) -> Result<Self, EmitterError> {
        Ok(self.key(ParamsKey::new(params)?))
    }

    pub(crate) fn matches(&self, entry: &Entry<D>) -> bool {
        self.listener.as_ref().is_none_or(|l| l.ptr_eq(&entry.listener))
            && self.params.as_ref().is_none_or(|k| entry.params.as_ref() == Some(k))
    }
}

impl<D> Default for Selector<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Selector<D> {
    fn clone(&self) -> Self {
        Self { listener: self.listener.clone(), params: self.params.clone() }
    }
}

impl<D> fmt::Debug for Selector<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("listener", &self.listener)
            .field("params", &self.params)
            .finish()
    }
}

/// Which subscriptions an `off` or count operation applies to.
pub enum Scope<'a, D> {
    /// Every subscription of every event name.
    All,
    /// Every subscription of one event name, regardless of params or listener.
    Event(&'a str),
    /// Subscriptions of one event name accepted by the selector.
    Matching(&'a str, Selector<D>),
}

impl<D> fmt::Debug for Scope<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Event(event) => f.debug_tuple("Event").field(event).finish(),
            Self::Matching(event, selector) => {
                f.debug_tuple("Matching").field(event).field(selector).finish()
            },
        }
    }
}
