use thiserror::Error;

/// Error produced by [`errorf`](crate::errorf). Displays as the formatted text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormattedError {
    message: String,
}

impl FormattedError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn into_message(self) -> String {
        self.message
    }
}

impl From<FormattedError> for std::io::Error {
    fn from(err: FormattedError) -> Self {
        std::io::Error::other(err)
    }
}
