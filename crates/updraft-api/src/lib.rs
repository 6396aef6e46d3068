pub mod auth;
pub mod error;
pub mod middleware;
pub mod updates;
pub mod versions;
