use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::profile::ProfileUpdate;
use crate::domain::types::{DisplayName, ImageUrl, ProfileBio, TypeConstraintError};

/// Raw profile edit. The same form creates the profile on first save.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileForm {
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Validated profile edit.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProfileFormPayload {
    pub display_name: DisplayName,
    pub bio: Option<ProfileBio>,
    pub avatar_url: Option<ImageUrl>,
}

impl UpdateProfileFormPayload {
    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            display_name: self.display_name,
            bio: self.bio,
            avatar_url: self.avatar_url,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateProfileFormError {
    #[error("Update profile form validation failed: {0}")]
    Validation(String),
    #[error("Update profile form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateProfileFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateProfileFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateProfileForm> for UpdateProfileFormPayload {
    type Error = UpdateProfileFormError;

    fn try_from(value: UpdateProfileForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            display_name: DisplayName::new(value.display_name)?,
            bio: value
                .bio
                .filter(|b| !b.trim().is_empty())
                .map(ProfileBio::new)
                .transpose()?,
            avatar_url: value.avatar_url.map(ImageUrl::new).transpose()?,
        })
    }
}
