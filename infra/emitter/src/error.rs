use pemit_canonical::CanonicalError;
use std::borrow::Cow;

/// Errors that can occur during emitter operations.
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    /// Event names must be non-empty.
    #[error("Invalid event name{}: {message}", format_context(.context))]
    InvalidEventName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The params payload could not be canonicalized.
    #[error("Invalid params{}: {source}", format_context(.context))]
    Params { source: CanonicalError, context: Option<Cow<'static, str>> },
}

/// Adds `.context(..)` to results that can fail with an [`EmitterError`].
pub trait EmitterErrorExt<T> {
    /// Attaches a human-readable context to the error.
    ///
    /// # Errors
    /// Returns the original error, converted into [`EmitterError`].
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EmitterError>;
}

impl<T> EmitterErrorExt<T> for Result<T, EmitterError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                EmitterError::InvalidEventName { context: c, .. }
                | EmitterError::Params { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> EmitterErrorExt<T> for Result<T, CanonicalError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EmitterError> {
        self.map_err(|source| EmitterError::Params { source, context: Some(context.into()) })
    }
}

impl From<CanonicalError> for EmitterError {
    #[inline]
    fn from(source: CanonicalError) -> Self {
        Self::Params { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
