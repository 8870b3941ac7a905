use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use folio_theme::Preference;

/// Inspect and change the portfolio theme preference.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
pub struct Cli {
    /// Theme config file (YAML).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Storage file holding the persisted preference.
    #[arg(long, global = true, value_name = "FILE", env = "FOLIO_STORAGE")]
    pub storage: Option<PathBuf>,

    /// Log theme transitions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the stored preference and the mode it resolves to.
    Get,
    /// Store a new preference.
    Set {
        #[arg(value_enum)]
        preference: PreferenceArg,
    },
    /// List the available preferences.
    List,
    /// Follow the resolved mode as the OS scheme changes.
    Watch {
        /// Stop after this many seconds.
        #[arg(long = "for", value_name = "SECS")]
        duration: Option<u64>,
    },
    /// Print the pre-paint bootstrap snippet.
    Bootstrap {
        /// Print head tags and a complete `<script>` element.
        #[arg(long)]
        html: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreferenceArg {
    Light,
    Dark,
    System,
}

impl From<PreferenceArg> for Preference {
    fn from(arg: PreferenceArg) -> Self {
        match arg {
            PreferenceArg::Light => Preference::Light,
            PreferenceArg::Dark => Preference::Dark,
            PreferenceArg::System => Preference::System,
        }
    }
}
