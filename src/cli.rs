//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// affilink - affiliate storefront backend
#[derive(Parser, Debug)]
#[command(name = "affilink")]
#[command(version)]
#[command(
    about = "Affiliate storefront backend with click attribution and conversion analytics",
    long_about = None
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Grant or revoke admin access on a profile
    Promote {
        /// Identity-provider user id
        user_id: String,

        /// Create the profile with this email if it does not exist yet
        #[arg(long)]
        email: Option<String>,

        /// Revoke admin instead of granting it
        #[arg(long)]
        revoke: bool,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Write a sample configuration file
    Generate {
        /// Output path (defaults to config.example.toml)
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["affilink"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_promote_args() {
        let cli = Cli::try_parse_from([
            "affilink",
            "-c",
            "/etc/affilink.toml",
            "promote",
            "user-1",
            "--email",
            "admin@example.com",
        ])
        .unwrap();
        assert_eq!(cli.config, "/etc/affilink.toml");
        assert_eq!(
            cli.command,
            Some(Commands::Promote {
                user_id: "user-1".to_string(),
                email: Some("admin@example.com".to_string()),
                revoke: false,
            })
        );
    }

    #[test]
    fn test_config_generate_force() {
        let cli = Cli::try_parse_from(["affilink", "config", "generate", "out.toml", "--force"])
            .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    path: Some("out.toml".to_string()),
                    force: true,
                }
            })
        );
    }

    #[test]
    fn test_promote_requires_user() {
        assert!(Cli::try_parse_from(["affilink", "promote"]).is_err());
    }
}
