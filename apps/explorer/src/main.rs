use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use explorer_core::{load_settings, settings::DEFAULT_SETTINGS_FILE, ExplorerSession};
use shared::protocol::{Notification, SessionEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

mod script;

#[derive(Parser, Debug)]
struct Cli {
    /// TOML settings file; missing files fall back to defaults.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Replay JSON commands from a script file, or stdin when none is given.
    Run {
        #[arg(long)]
        script: Option<PathBuf>,
        /// Only print notifications and rejections.
        #[arg(long)]
        quiet: bool,
    },
    /// Print the effective settings.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;

    match cli.command {
        CliCommand::Config => {
            print!("{}", settings.to_toml().context("failed to render settings")?);
        }
        CliCommand::Run { script, quiet } => {
            let (mut session, notifications) =
                ExplorerSession::new(settings).context("failed to start session")?;
            match script {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("failed to open script {}", path.display()))?;
                    replay(&mut session, &notifications, BufReader::new(file), quiet).await?;
                }
                None => {
                    let stdin = BufReader::new(tokio::io::stdin());
                    replay(&mut session, &notifications, stdin, quiet).await?;
                }
            }
        }
    }

    Ok(())
}

async fn replay<R>(
    session: &mut ExplorerSession,
    notifications: &Receiver<Notification>,
    reader: R,
    quiet: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0;
    while let Some(line) = lines.next_line().await.context("failed to read script")? {
        line_no += 1;
        let Some(command) = script::parse_line(line_no, &line)? else {
            continue;
        };
        let name = command.name();
        if let Err(err) = session.execute(command) {
            emit(&SessionEvent::Rejected {
                command: name.to_string(),
                error: err.report(),
            })?;
        }

        // Let every pacing delay play out, including advances chained by the
        // previous one, so the next command sees a settled tutorial.
        while let Some(deadline) = session.pending_advance() {
            tokio::time::sleep_until(deadline.into()).await;
            session.tick(deadline);
        }

        for notification in notifications.try_iter() {
            emit(&SessionEvent::Notification(notification))?;
        }
        if !quiet {
            emit(&SessionEvent::Status(Box::new(session.status())))?;
        }
    }
    info!(lines = line_no, level = %session.level_state().current_level, "script finished");
    Ok(())
}

fn emit(event: &SessionEvent) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::Settings;
    use shared::domain::DESKTOP_ID;
    use shared::protocol::Command;

    #[tokio::test]
    async fn replay_applies_commands_and_waits_out_pacing() {
        let settings = Settings {
            step_advance_delay_ms: 10,
            ..Settings::default()
        };
        let (mut session, rx) = ExplorerSession::new(settings).expect("session");
        let input = b"# first lesson\n{\"type\":\"create_folder\"}\n\n";

        replay(&mut session, &rx, &input[..], true)
            .await
            .expect("replay");

        assert_eq!(session.children(DESKTOP_ID).len(), 1);
        assert_eq!(session.level_state().current_step, 1);
        assert!(session.pending_advance().is_none());
    }

    #[tokio::test]
    async fn replay_waits_out_chained_advances() {
        let settings = Settings {
            step_advance_delay_ms: 10,
            start_level: 2,
            ..Settings::default()
        };
        let (mut session, rx) = ExplorerSession::new(settings).expect("session");
        // Satisfy the second step before the first advance is applied.
        session.execute(Command::CreateFolder).expect("create");
        let id = session.renaming().expect("new folder");
        session
            .execute(Command::Rename {
                id,
                name: "Media".into(),
            })
            .expect("rename");
        assert_eq!(session.level_state().current_step, 0);
        let input = b"{\"type\":\"clear_selection\"}\n";

        replay(&mut session, &rx, &input[..], true)
            .await
            .expect("replay");

        assert_eq!(session.level_state().current_step, 2);
        assert!(session.pending_advance().is_none());
    }

    #[tokio::test]
    async fn replay_stops_on_malformed_line() {
        let (mut session, rx) = ExplorerSession::new(Settings::default()).expect("session");
        let input = b"{\"type\":\"create_folder\"}\nnot json\n{\"type\":\"create_file\"}\n";

        let err = replay(&mut session, &rx, &input[..], true)
            .await
            .expect_err("bad line");
        assert!(err.to_string().starts_with("line 2"));
        assert_eq!(session.children(DESKTOP_ID).len(), 1);
    }
}
