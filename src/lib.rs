//! Core library for the StudyPress blogging platform.
//!
//! This crate carries the publishing pipeline (slugs, excerpts, cover-image
//! uploads), the reader-facing queries behind a memoizing cache, and the
//! comment, like, reading-list and profile features around them. It is
//! called from the host application's request handlers and opens no sockets
//! of its own.

pub mod cache;
pub mod db;
pub mod domain;
pub mod error_conversions;
pub mod excerpt;
pub mod forms;
pub mod imaging;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;
pub mod services;
pub mod slug;
pub mod storage;
