use std::fmt::{self, Display};

/// Reasons a user review is refused before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyText,
    RatingOutOfRange(u8),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyText => write!(f, "review text is empty"),
            ValidationError::RatingOutOfRange(rating) => {
                write!(f, "rating {rating} is outside 1..=10")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidId(String),
    Validation(ValidationError),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidId(msg) => write!(f, "invalid id: {msg}"),
            ModelError::Validation(err) => write!(f, "validation: {err}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::InvalidId(_) => None,
            ModelError::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ModelError {
    fn from(err: ValidationError) -> Self {
        ModelError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
