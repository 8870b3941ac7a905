mod cli;
mod terminal;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use folio_theme::env::{FileStorage, HtmlRoot, SystemScheme};
use folio_theme::{bootstrap, ThemeConfig, ThemeController, ThemeStore, THEME_COLOR_META};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::terminal::{format_options, format_snapshot, TerminalRoot};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ThemeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ThemeConfig::default(),
    };

    match &cli.command {
        Command::Get => {
            let controller = mounted(build_store(&cli, config), None);
            println!("{}", format_snapshot(&controller.snapshot()));
        }
        Command::Set { preference } => {
            let controller = mounted(build_store(&cli, config), None);
            controller.set_preference((*preference).into());
            println!("{}", format_snapshot(&controller.snapshot()));
        }
        Command::List => {
            let controller = mounted(build_store(&cli, config), None);
            println!("{}", format_options(controller.preference()));
        }
        Command::Watch { duration } => {
            let root = TerminalRoot::new(config.dark_class.clone());
            let controller = mounted(build_store(&cli, config), Some(root));
            tracing::info!(api = ?controller.subscription_api(), "watching color scheme");
            match *duration {
                Some(secs) => thread::sleep(Duration::from_secs(secs)),
                None => loop {
                    thread::park();
                },
            }
        }
        Command::Bootstrap { html } => {
            if *html {
                println!("{}", bootstrap::head_tags(&config));
                println!("{}", bootstrap::script_tag(&config));
            } else {
                println!("{}", bootstrap::inline_script(&config));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_store(cli: &Cli, config: ThemeConfig) -> ThemeStore {
    let signal = SystemScheme::new().with_poll_interval(config.poll_interval());
    let store = ThemeStore::new(config).with_signal(signal);
    match storage_path(cli) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using preference storage");
            store.with_storage(FileStorage::new(path))
        }
        None => {
            tracing::warn!("no config directory; preference will not be saved");
            store
        }
    }
}

fn storage_path(cli: &Cli) -> Option<PathBuf> {
    cli.storage.clone().or_else(|| {
        directories::ProjectDirs::from("dev", "folio", "folio")
            .map(|dirs| dirs.config_dir().join("storage.json"))
    })
}

fn mounted(store: ThemeStore, root: Option<TerminalRoot>) -> ThemeController {
    let mut controller = match root {
        Some(root) => ThemeController::new(store, root),
        None => {
            let color = store.config().chrome_colors.light.clone();
            ThemeController::new(store, HtmlRoot::new().with_meta(THEME_COLOR_META, color))
        }
    };
    controller.mount();
    controller
}
