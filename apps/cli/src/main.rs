//! decksync command-line interface.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use decksync_catalog::{Catalog, RemoteCatalogSource};
use decksync_settings::SettingsStore;
use decksync_steam::SteamLibrary;
use decksync_workflow::{Orchestrator, Protontricks, SyncAllReport, WorkflowError, WorkflowReport};

#[derive(Parser)]
#[command(
    name = "decksync",
    version,
    about = "Manage remotely-catalogued game installs on a Proton machine"
)]
struct Cli {
    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show or update settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// List the catalog with install state.
    Games,
    /// Install a game from the remote catalog.
    Install { name: String },
    /// Remove an installed game.
    Remove { name: String },
    /// Sync one game's saves to the backup store and remote.
    SyncSaves { name: String },
    /// Sync saves for every installed game.
    SyncAll,
    /// Provision (or re-provision) the Proton prefix for an app id.
    Prefix { app_id: u32 },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings document.
    Show,
    /// Deep-merge a JSON document into the settings and persist.
    Set { document: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,decksync=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = SettingsStore::open_default().context("failed to open settings")?;
    let catalog = Catalog::new(Box::new(RemoteCatalogSource::new(
        decksync_settings::data_dir(),
    )));
    let mut orchestrator = Orchestrator::new(
        settings,
        catalog,
        Box::new(Protontricks),
        Box::new(SteamLibrary::new()),
    );

    match cli.command {
        Command::Settings(SettingsCommand::Show) => {
            let settings = orchestrator.settings();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::Settings(SettingsCommand::Set { document }) => {
            let partial: serde_json::Value =
                serde_json::from_str(&document).context("settings update is not valid JSON")?;
            let merged = orchestrator.update_settings(&partial)?;
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        Command::Games => {
            let snapshot = orchestrator.refresh_catalog().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snapshot.games)?);
            } else {
                println!(
                    "{} games ({}), refreshed {}",
                    snapshot.games.len(),
                    snapshot.source,
                    snapshot.refreshed_at
                );
                for game in &snapshot.games {
                    let state = match (game.installed, game.prefix_ready) {
                        (true, true) => "installed",
                        (true, false) => "installed, no prefix",
                        _ => "available",
                    };
                    println!(
                        "  {:30} {:>10}  {}  [{state}]",
                        game.name, game.steam_appid, game.proton_version
                    );
                }
            }
        }
        Command::Install { name } => {
            report(orchestrator.install(&name).await, cli.json)?;
        }
        Command::Remove { name } => {
            report(orchestrator.remove(&name).await, cli.json)?;
        }
        Command::SyncSaves { name } => {
            report(orchestrator.sync_saves(&name).await, cli.json)?;
        }
        Command::SyncAll => {
            let result = orchestrator.sync_all_saves().await?;
            report_sync_all(&result, cli.json)?;
            if !result.ok {
                anyhow::bail!("{} game(s) failed to sync", result.failures.len());
            }
        }
        Command::Prefix { app_id } => {
            report(orchestrator.provision_prefix(app_id).await, cli.json)?;
        }
    }

    Ok(())
}

/// Prints a workflow result, steps included, and converts failures into
/// a non-zero exit.
fn report(result: Result<WorkflowReport, WorkflowError>, json: bool) -> anyhow::Result<()> {
    match result {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.message);
                for step in &report.steps {
                    println!("  - {step}");
                }
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let doc = serde_json::json!({
                    "ok": false,
                    "error": err.to_string(),
                    "steps": err.steps,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                for step in &err.steps {
                    eprintln!("  - {step}");
                }
            }
            Err(anyhow::anyhow!("{err}"))
        }
    }
}

fn report_sync_all(result: &SyncAllReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("Synced {} game(s)", result.synced);
        for failure in &result.failures {
            eprintln!("  failed: {failure}");
        }
    }
    Ok(())
}
