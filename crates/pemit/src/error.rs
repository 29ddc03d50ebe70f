use std::borrow::Cow;

/// Errors raised by the process-level helpers of this crate.
#[derive(Debug, thiserror::Error)]
pub enum PemitError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Global emitter already initialized{}: {message}", format_context(.context))]
    AlreadyInitialized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Adds `.context(..)` to results that can fail with a [`PemitError`].
pub trait PemitErrorExt<T> {
    /// Attaches a human-readable context to the error.
    ///
    /// # Errors
    /// Returns the original error, converted into [`PemitError`].
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, PemitError>;
}

impl<T> PemitErrorExt<T> for Result<T, PemitError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                PemitError::Config { context: c, .. }
                | PemitError::AlreadyInitialized { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> PemitErrorExt<T> for Result<T, config::ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, PemitError> {
        self.map_err(|source| PemitError::Config { source, context: Some(context.into()) })
    }
}

impl From<config::ConfigError> for PemitError {
    #[inline]
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
