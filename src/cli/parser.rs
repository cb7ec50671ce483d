//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Caregiver profile and search service
#[derive(Parser, Debug)]
#[command(name = "caregiver-hub")]
#[command(about = "Caregiver profile, completeness and search service")]
#[command(long_about = "
caregiver-hub serves caregiver and client profiles over HTTP: registration,
field updates, completeness scoring and filtered caregiver search.

EXAMPLES:
    # Start the server with the layered configuration under ./config
    caregiver-hub serve

    # Bind to all interfaces on a custom port
    caregiver-hub serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    caregiver-hub --config /etc/caregiver-hub/production.toml serve

    # Check configuration without starting the server
    caregiver-hub serve --dry-run

    # Apply or preview database migrations
    caregiver-hub migrate
    caregiver-hub migrate --dry-run

    # Mint a development bearer token for the /api/me endpoints
    caregiver-hub token --subject dev|42 --email li.mei@example.com --name \"Li Mei\"
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Single configuration file, replacing the layered `config/` directory
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Environment whose `config/{env}.toml` is layered over the defaults
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    ///
    /// Examples:
    ///   caregiver-hub serve
    ///   caregiver-hub serve --host 0.0.0.0 --port 80
    ///   caregiver-hub serve --dry-run
    Serve {
        /// Address to bind, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// TCP port, 1-65535
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override; wins over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply the embedded database migrations
    ///
    /// Requires `database.url`; the storage backend setting is ignored.
    Migrate {
        /// List pending migrations without applying them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a bearer token signed with the configured `jwt.secret`
    Token {
        /// Subject id, used as the profile's external auth id
        #[arg(long, value_parser = super::validation::validate_non_empty)]
        subject: String,

        #[arg(long, value_parser = super::validation::validate_non_empty)]
        email: String,

        /// Display name claim
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["caregiver-hub", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["caregiver-hub"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "caregiver-hub",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--log-level",
            "warning",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                log_level,
                dry_run,
            }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert_eq!(log_level, Some(LogLevel::Warn));
                assert!(!dry_run);
            }
            other => panic!("Expected Serve command, got {other:?}"),
        }
    }

    #[test]
    fn test_serve_rejects_port_zero() {
        assert!(Cli::try_parse_from(["caregiver-hub", "serve", "--port", "0"]).is_err());
    }

    #[test]
    fn test_migrate_command() {
        let cli = Cli::try_parse_from(["caregiver-hub", "migrate", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Migrate { dry_run: true })));
    }

    #[test]
    fn test_token_command() {
        let cli = Cli::try_parse_from([
            "caregiver-hub",
            "token",
            "--subject",
            "dev|42",
            "--email",
            "li.mei@example.com",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Token {
                subject,
                email,
                name,
            }) => {
                assert_eq!(subject, "dev|42");
                assert_eq!(email, "li.mei@example.com");
                assert!(name.is_none());
            }
            other => panic!("Expected Token command, got {other:?}"),
        }
    }

    #[test]
    fn test_token_requires_subject() {
        let err = Cli::try_parse_from(["caregiver-hub", "token", "--email", "a@b.c"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_env_aliases() {
        let cli = Cli::try_parse_from(["caregiver-hub", "--env", "stage"]).unwrap();
        assert_eq!(cli.env, Some(Environment::Staging));
        assert_eq!(
            crate::config::Environment::from(Environment::Staging),
            crate::config::Environment::Staging
        );
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["caregiver-hub", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
