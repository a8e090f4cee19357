//! Request handlers, one module per resource.

pub mod assets;
pub mod projects;
pub mod users;
