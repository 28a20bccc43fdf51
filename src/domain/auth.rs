//! Caller identity forwarded by the host application.

use serde::{Deserialize, Serialize};

/// A verified user session.
///
/// Authentication happens outside this crate; services only use the embedded
/// identity for attribution and ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Opaque account id issued by the auth service.
    pub id: String,
    pub email: String,
    pub name: String,
}
