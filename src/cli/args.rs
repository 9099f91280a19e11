use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ecosmart")]
#[command(version)]
#[command(about = "Terminal client for the EcoSmart agricultural assistant", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Cookie header for the authenticated session (overrides config)
    #[arg(long, env = "ECOSMART_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start a chat session (default)
    Chat,
    /// Print the conversation list, most recent first
    History,
    /// Write the default configuration file
    Init,
    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_chat() {
        let cli = Cli::try_parse_from(["ecosmart"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides_and_subcommand() {
        let cli = Cli::try_parse_from([
            "ecosmart",
            "--server",
            "http://agro.local:5000",
            "--cookie",
            "session=xyz",
            "history",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://agro.local:5000"));
        assert_eq!(cli.cookie.as_deref(), Some("session=xyz"));
        assert_eq!(cli.command, Some(Commands::History));
    }
}
