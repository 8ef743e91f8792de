//! Request handlers, one module per resource.

pub mod auth;
pub mod categories;
pub mod comments;
pub mod genres;
pub mod reviews;
pub mod titles;
pub mod users;
