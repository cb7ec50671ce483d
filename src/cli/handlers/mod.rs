//! Command handlers, one per subcommand.

pub mod migrate;
pub mod serve;
pub mod token;

pub use migrate::MigrateCommandHandler;
pub use serve::ServeCommandHandler;
pub use token::TokenCommandHandler;
