//! notify-relay CLI: host-side driver for the notification listener bridge.

mod replay;
mod script;

use std::fs::File;
use std::io::{self, BufReader};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use notify_relay_listener::setup::{load_config, resolve_config_path};
use notify_relay_listener::{build_bridge, Config};
use notify_relay_permissions::{
    CommandLauncher, ControlSurface, MethodCall, PermissionGateway, StaticSettings,
    ENABLED_NOTIFICATION_LISTENERS,
};
use tracing_subscriber::EnvFilter;

use crate::replay::Replay;

#[derive(Parser)]
#[command(
    name = "notify-relay",
    about = "Relay host notifications to a single in-process subscriber",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines script of host events and print delivered records.
    Replay {
        /// Script file; reads stdin when omitted.
        #[arg(short, long)]
        input: Option<String>,

        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Invoke a method on the control surface.
    Call {
        /// Method name, e.g. isNotificationServiceEnabled.
        method: String,

        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print the effective configuration.
    Config {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },
}

impl Commands {
    fn config_path(&self) -> Option<&str> {
        match self {
            Self::Replay { config, .. } | Self::Call { config, .. } | Self::Config { config } => {
                config.as_deref()
            }
        }
    }
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level)),
        )
        .init();
}

fn control_surface(config: &Config) -> anyhow::Result<ControlSurface> {
    let mut settings = StaticSettings::new();
    if let Some(list) = &config.settings.enabled_listeners {
        settings = settings.with(ENABLED_NOTIFICATION_LISTENERS, list.clone());
    }
    let launcher = CommandLauncher::new(config.settings.open_command.clone())?;
    let gateway = PermissionGateway::new(
        config.listener.component()?,
        Arc::new(settings),
        Arc::new(launcher),
    );
    Ok(ControlSurface::new(config.channels.method.clone(), gateway))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_arg = cli.command.config_path();
    let config = load_config(config_arg)?;
    init_tracing(&config);

    let config_path = resolve_config_path(config_arg);
    if config_path.exists() {
        tracing::info!(path = %config_path.display(), "using config file");
    } else {
        tracing::info!(path = %config_path.display(), "no config file found, using defaults");
    }

    match cli.command {
        Commands::Replay { input, .. } => {
            tracing::info!(
                channel = %config.channels.event,
                input = ?input,
                "replaying host events"
            );
            let bridge = build_bridge(&config);
            let mut replay = Replay::new(bridge, io::stdout().lock());
            match input {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("failed to open script {path}"))?;
                    replay.run(BufReader::new(file))?;
                }
                None => {
                    replay.run(io::stdin().lock())?;
                }
            }
        }
        Commands::Call { method, .. } => {
            let surface = control_surface(&config)?;
            tracing::info!(
                channel = %surface.name(),
                method = %method,
                "invoking control method"
            );
            let response = surface.handle(&MethodCall::new(method));
            println!("{}", serde_json::to_string(&response)?);
        }
        Commands::Config { .. } => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
