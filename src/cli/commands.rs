use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};

use crate::{
    app::{init_config, Config},
    remote::{ConversationApi, HttpConversationApi},
    session::{last_activity, SessionState},
    view::sidebar_entries,
};

use super::Commands;

/// Handle CLI subcommands. Returns `true` when the command was fully handled
/// and the interactive session should not start.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            let path = init_config()?;
            println!("Configuration at: {}", path.display());
            Ok(true)
        }
        Commands::History => {
            let api = HttpConversationApi::new(&config.server, &config.endpoints)?;
            print_history(&api).await?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Fetch the history and print it the way the sidebar orders it
pub async fn print_history(api: &dyn ConversationApi) -> Result<()> {
    write_history(api, &mut io::stdout()).await
}

async fn write_history<W: Write>(api: &dyn ConversationApi, out: &mut W) -> Result<()> {
    let history = api
        .fetch_history()
        .await
        .context("Failed to fetch conversation history")?;

    let mut state = SessionState::new();
    if state.load_history(history).is_none() {
        writeln!(out, "No conversations yet.")?;
        return Ok(());
    }

    writeln!(out, "Conversations ({}):", state.len())?;
    for entry in sidebar_entries(&state) {
        let turns = state.turns(&entry.id).unwrap_or_default();
        let last = if turns.is_empty() {
            "-".to_string()
        } else {
            last_activity(turns).format("%Y-%m-%d %H:%M").to_string()
        };
        writeln!(
            out,
            "  {} {} {}",
            last.dimmed(),
            entry.label.green(),
            format!("({} turns, {})", turns.len(), entry.id).dimmed()
        )?;
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("EcoSmart chat v{}", env!("CARGO_PKG_VERSION"));
    println!("   Terminal client for the EcoSmart agricultural assistant");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockConversationApi;
    use crate::session::{ConversationId, Turn};
    use crate::utils::ChatError;
    use std::collections::HashMap;

    fn turn(q: &str, at: &str) -> Turn {
        Turn {
            question: Some(q.to_string()),
            answer: Some("ok".to_string()),
            timestamp: at.to_string(),
        }
    }

    async fn history_output(api: MockConversationApi) -> Result<String> {
        let mut out = Vec::new();
        write_history(&api, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_history_empty() {
        let mut api = MockConversationApi::new();
        api.expect_fetch_history()
            .times(1)
            .returning(|| Ok(HashMap::new()));

        let output = history_output(api).await.unwrap();
        assert_eq!(output, "No conversations yet.\n");
    }

    #[tokio::test]
    async fn test_history_lists_most_recent_first() {
        let mut api = MockConversationApi::new();
        api.expect_fetch_history().returning(|| {
            Ok(HashMap::from([
                (
                    ConversationId::new("conv-old1"),
                    vec![turn("¿Cómo controlo la roya?", "2024-04-01 08:00:00")],
                ),
                (
                    ConversationId::new("conv-new2"),
                    vec![
                        turn("Riego por goteo", "2024-05-01 09:00:00"),
                        turn("¿Y en verano?", "2024-05-02 18:30:00"),
                    ],
                ),
                (ConversationId::new("conv-empty"), Vec::new()),
            ]))
        });

        let output = history_output(api).await.unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Conversations (3):");
        assert!(lines[1].contains("Riego por goteo"));
        assert!(lines[1].contains("2024-05-02 18:30"));
        assert!(lines[1].contains("(2 turns, conv-new2)"));
        assert!(lines[2].contains("¿Cómo controlo la roya?"));
        assert!(lines[2].contains("(1 turns, conv-old1)"));
        assert!(lines[3].contains("Conversación mpty"));
        assert!(lines[3].contains("(0 turns, conv-empty)"));
    }

    #[tokio::test]
    async fn test_history_failure_is_reported() {
        let mut api = MockConversationApi::new();
        api.expect_fetch_history()
            .returning(|| Err(ChatError::Network("connection refused".into())));

        let err = history_output(api).await.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch conversation history"));
    }
}
