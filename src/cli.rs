use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "funnelwatch", version, about = "Headless funnel presentation player")]
pub struct Cli {
    /// Settings file (created by `config` when it does not exist yet).
    #[arg(long, global = true, env = "FUNNELWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the API base URL from the settings file.
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play a campaign presentation and print what the viewer sees.
    Watch {
        slug: String,
        /// Print slides as HTML fragments instead of plain text.
        #[arg(long)]
        html: bool,
        /// Click the call-to-action as soon as it shows.
        #[arg(long)]
        click_cta: bool,
        /// Do not post analytics events.
        #[arg(long)]
        no_analytics: bool,
    },
    /// Print a campaign's timeline and every rendered slide.
    Inspect {
        slug: String,
        #[arg(long)]
        html: bool,
    },
    /// Show the settings, or update and save them.
    Config {
        #[arg(long)]
        heartbeat_secs: Option<u64>,
        #[arg(long)]
        slide_poll_ms: Option<u64>,
        /// Persist `--api-base` too.
        #[arg(long)]
        save: bool,
    },
}
