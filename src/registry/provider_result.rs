use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum ProviderResult<T> {
    /// The operation succeeded and data was found.
    Found(T),

    /// The registry does not know the requested package.
    NotFound,

    /// An error occurred while fetching or decoding data for this package.
    Error(Arc<ohno::AppError>),
}

impl<T> ProviderResult<T> {
    /// Returns `true` if the result is `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns a reference to the contained data if `Found`, otherwise `None`.
    #[must_use]
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> From<crate::Result<Option<T>>> for ProviderResult<T> {
    fn from(result: crate::Result<Option<T>>) -> Self {
        match result {
            Ok(Some(data)) => Self::Found(data),
            Ok(None) => Self::NotFound,
            Err(e) => Self::Error(Arc::new(e)),
        }
    }
}
