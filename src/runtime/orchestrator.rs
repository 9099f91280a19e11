use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::{
    app::{load_config, load_config_from, Config},
    cli::{handle_command, Cli, Commands},
    remote::HttpConversationApi,
    session::SessionController,
    tui::{run_ui, App},
    utils::init_logger,
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = if let Some(config_path) = &cli.config {
            load_config_from(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                    Config::default()
                }
            }
        };

        apply_overrides(&mut config, &cli);
        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        let command = self.cli.command.clone().unwrap_or(Commands::Chat);

        // Interactive sessions log to a file when configured so the UI stays clean
        let level = if self.cli.verbose {
            "debug"
        } else {
            self.config.logging.level.as_str()
        };
        let log_file = match command {
            Commands::Chat => self.config.logging.file.as_deref(),
            _ => None,
        };
        init_logger(level, log_file)?;

        if handle_command(&command, &self.config).await? {
            return Ok(()); // Command handled, exit
        }

        info!(server = %self.config.server.base_url, "Starting chat session");

        let api = HttpConversationApi::new(&self.config.server, &self.config.endpoints)
            .context("Failed to build HTTP client")?;
        let controller = SessionController::new(Arc::new(api));
        let app = App::new(controller, &self.config);

        run_ui(app).await
    }
}

/// Command-line flags win over every config source
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(cookie) = &cli.cookie {
        config.server.session_cookie = Some(cookie.clone());
    }
}
