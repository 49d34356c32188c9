pub mod auth;
pub mod core;
pub mod records;
