use parking_lot::Mutex;
use pemit_emitter::{Listener, Value};
use std::sync::Arc;

/// One recorded listener invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub tag: &'static str,
    pub event: String,
    pub params: Option<Value>,
    pub data: String,
}

/// Shared, ordered log of listener invocations.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that records every invocation under `tag`.
    #[must_use]
    pub fn listener(&self, tag: &'static str) -> Listener<String> {
        let calls = Arc::clone(&self.calls);
        Listener::<String>::new(move |event, params, data| {
            calls.lock().push(Call {
                tag,
                event: event.name().to_owned(),
                params: params.cloned(),
                data: data.clone(),
            });
        })
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|call| call.tag).collect()
    }

    #[must_use]
    pub fn count(&self, tag: &str) -> usize {
        self.calls.lock().iter().filter(|call| call.tag == tag).count()
    }
}

#[must_use]
pub fn data(value: &str) -> String {
    value.to_owned()
}
