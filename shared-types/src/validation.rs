use thiserror::Error;

/// Client-side form validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid meeting date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid meeting time {0:?}, expected HH:mm")]
    InvalidTime(String),
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
