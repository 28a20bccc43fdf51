//! Deserialized request forms and their validated payload counterparts.

pub mod comments;
pub mod posts;
pub mod profiles;
