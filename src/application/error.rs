use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Please provide todo")]
    EmptyBody,

    #[error("No valid fields to update")]
    NoValidFields,

    /// Only raised by the toggle path of an update.
    #[error("Todo not found")]
    NotFound,

    /// The row was gone when re-read after an update.
    #[error("Error fetching updated todo")]
    Refetch,

    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl TodoError {
    pub fn storage(context: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Storage { context, source }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyBody | Self::NoValidFields | Self::NotFound)
    }
}
