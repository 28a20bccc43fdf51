use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not authorized to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Input failed a domain constraint.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A submitted form could not be converted into a payload.
    #[error("invalid form data: {0}")]
    Form(String),
    /// An uploaded file was rejected before any storage write.
    #[error("invalid file: {0}")]
    InvalidFile(String),
    /// Object storage refused or failed the write.
    #[error("upload failed: {0}")]
    UploadFailed(String),
    /// The publishing pipeline could not complete.
    #[error("publish failed: {0}")]
    PublishFailed(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
