pub use self::errors::{ServiceError, ServiceResult};

pub mod categories;
pub mod comments;
pub mod engagement;
pub mod errors;
pub mod posts;
pub mod profiles;
pub mod uploads;
