pub mod category;
pub mod comment;
pub mod config;
pub mod engagement;
pub mod post;
pub mod profile;
