use serde::Deserialize;

/// Bucket size past which a possible listener leak is reported.
pub const DEFAULT_MAX_LISTENERS: usize = 10;
const DEFAULT_NAME: &str = "emitter";

/// Emitter settings.
///
/// Deserializable so it can be loaded alongside the rest of an application's
/// configuration; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Label attached to every log record produced by the emitter.
    pub name: String,
    /// Listeners per event name before a warning is logged. `None` disables the check.
    pub max_listeners: Option<usize>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self { name: DEFAULT_NAME.to_owned(), max_listeners: Some(DEFAULT_MAX_LISTENERS) }
    }
}

impl EmitterConfig {
    /// Sets the log label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the per-event listener limit. `None` disables the leak warning.
    #[must_use]
    pub const fn with_max_listeners(mut self, max: Option<usize>) -> Self {
        self.max_listeners = max;
        self
    }
}
