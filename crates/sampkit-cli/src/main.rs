use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use sampkit::host::{SimulatedHost, SimulationOptions};
use sampkit::logging::init_logging;
use sampkit::{ConfigLoadError, KnownEvent, SampkitConfig};

mod gamemode;
mod scenario;

use scenario::{Replay, Scenario};

#[derive(Parser)]
#[command(name = "sampkit", version, about = "Tooling for sampkit gamemodes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a scenario file through the demo gamemode on a simulated host
    Replay {
        /// Scenario TOML file
        scenario: PathBuf,

        /// Config file to use instead of the platform default
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the callbacks the host fires
    Events,
    /// Show where the config lives and what it contains
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Load the config, falling back to defaults when there is no file.
///
/// Also returns the file the config came from, if any, so it can be reported
/// once logging is up.
fn load_config(path: Option<&Path>) -> Result<(SampkitConfig, Option<PathBuf>)> {
    let Some(path) = path.map(Path::to_path_buf).or_else(SampkitConfig::config_path) else {
        return Ok((SampkitConfig::default(), None));
    };

    match SampkitConfig::load_from(&path) {
        Ok(config) => Ok((config, Some(path))),
        Err(ConfigLoadError::NotFound) => Ok((SampkitConfig::default(), None)),
        Err(err) => Err(err).with_context(|| format!("Failed to load {}", path.display())),
    }
}

fn replay(scenario_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let (config, source) = load_config(config_path)?;
    let _guard = init_logging("replay", &config.logging).context("Failed to initialize logging")?;
    match &source {
        Some(path) => info!("Using config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let content = fs::read_to_string(scenario_path)
        .with_context(|| format!("Failed to read {}", scenario_path.display()))?;
    let scenario = Scenario::from_toml(&content)
        .with_context(|| format!("Failed to parse {}", scenario_path.display()))?;

    gamemode::register().context("Failed to register gamemode handlers")?;

    let sim = Rc::new(SimulatedHost::with_options(SimulationOptions::from(
        &config.simulation,
    )));
    info!(
        "Replaying {} ({} steps)",
        scenario.name.as_deref().unwrap_or("scenario"),
        scenario.steps.len()
    );
    let summary = Replay::new(sim).run(&scenario);

    for line in &summary.console {
        println!("[console] {}", line);
    }
    println!();
    println!("Steps:     {}", summary.steps);
    println!("Handled:   {} ({} declined)", summary.handled, summary.declined);
    println!("Unhandled: {}", summary.unhandled);
    println!("Players still connected: {:?}", summary.players);
    Ok(())
}

fn list_events() {
    for event in KnownEvent::ALL {
        let scope = if event.is_player_event() { "player" } else { "server" };
        println!("{:<32} {}", event.name(), scope);
    }
}

fn show_config(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .or_else(SampkitConfig::config_path);
    match &path {
        Some(path) => println!("# {}", path.display()),
        None => println!("# no config directory available"),
    }

    let (config, _) = load_config(path.as_deref())?;
    print!("{}", config.to_toml().context("Failed to render config")?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Replay { scenario, config } => replay(&scenario, config.as_deref()),
        Command::Events => {
            list_events();
            Ok(())
        }
        Command::Config { config } => show_config(config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_config_reports_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[simulation]\nmax_players = 8\n").unwrap();

        let (config, source) = load_config(Some(&path)).unwrap();
        assert_eq!(config.simulation.max_players, 8);
        assert_eq!(source, Some(path));
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, SampkitConfig::default());
        assert_eq!(source, None);
    }
}
