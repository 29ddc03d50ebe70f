use crate::error::PemitError;
use pemit_emitter::{Emitter, EmitterConfig, Value};
use std::sync::OnceLock;
use tracing::debug;

static GLOBAL: OnceLock<Emitter<Value>> = OnceLock::new();

/// The process-wide emitter, created with [`EmitterConfig::default`] on first use
/// unless [`init_global`] ran before.
pub fn global() -> &'static Emitter<Value> {
    GLOBAL.get_or_init(|| {
        debug!("Global emitter created with default config");
        Emitter::with_config(EmitterConfig::default())
    })
}

/// Creates the process-wide emitter with an explicit configuration.
///
/// # Errors
/// Returns [`PemitError::AlreadyInitialized`] if the global emitter already
/// exists, either from an earlier call or from [`global`].
pub fn init_global(config: EmitterConfig) -> Result<&'static Emitter<Value>, PemitError> {
    let mut created = false;
    let emitter = GLOBAL.get_or_init(|| {
        created = true;
        debug!(emitter = %config.name, max_listeners = ?config.max_listeners, "Global emitter created");
        Emitter::with_config(config)
    });

    if created {
        Ok(emitter)
    } else {
        Err(PemitError::AlreadyInitialized {
            message: format!("existing emitter '{}' is in use", emitter.config().name).into(),
            context: None,
        })
    }
}
