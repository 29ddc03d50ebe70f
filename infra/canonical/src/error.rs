use std::borrow::Cow;

/// Errors that can occur while canonicalizing a parameter payload.
#[derive(Debug, thiserror::Error)]
pub enum CanonicalError {
    /// The payload has no JSON representation (e.g. a map with non-string keys,
    /// or a `Serialize` impl that reports an error).
    #[error("Params serialization failed{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

/// Adds `.context(..)` to results that can fail with a [`CanonicalError`].
pub trait CanonicalErrorExt<T> {
    /// Attaches a human-readable context to the error.
    ///
    /// # Errors
    /// Returns the original error, converted into [`CanonicalError`].
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, CanonicalError>;
}

impl<T> CanonicalErrorExt<T> for Result<T, CanonicalError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                CanonicalError::Serialize { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> CanonicalErrorExt<T> for Result<T, serde_json::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, CanonicalError> {
        self.map_err(|source| CanonicalError::Serialize { source, context: Some(context.into()) })
    }
}

impl From<serde_json::Error> for CanonicalError {
    #[inline]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
