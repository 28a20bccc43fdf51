//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service or repository error types, so
//! the `From` impls wiring them together live here instead.

use crate::domain::types::TypeConstraintError;
use crate::forms::comments::AddCommentFormError;
use crate::forms::posts::{PublishPostFormError, UpdatePostFormError};
use crate::forms::profiles::UpdateProfileFormError;
use crate::repository::errors::RepositoryError;
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::Validation(val.to_string())
    }
}

impl From<PublishPostFormError> for ServiceError {
    fn from(val: PublishPostFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<UpdatePostFormError> for ServiceError {
    fn from(val: UpdatePostFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<AddCommentFormError> for ServiceError {
    fn from(val: AddCommentFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<UpdateProfileFormError> for ServiceError {
    fn from(val: UpdateProfileFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
