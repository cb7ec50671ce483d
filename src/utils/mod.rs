//! Small helpers shared by the HTTP layer and the CLI.

pub mod jwt;
pub mod validate;
