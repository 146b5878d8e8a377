//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use intake_core::config::{AccountTab, Config};

mod commands;

#[derive(Parser)]
#[command(name = "intake")]
#[command(version)]
#[command(about = "Add accounts from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the add-account dialog (default)
    Add(AddArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Tab to open on (overrides `dialog.default_tab`)
    #[arg(long, value_enum)]
    pub tab: Option<TabArg>,

    /// Prefill the email field
    #[arg(long)]
    pub email: Option<String>,

    /// Authorization URL handed out by the OAuth login
    #[arg(long, env = "INTAKE_AUTH_URL", value_name = "URL")]
    pub auth_url: Option<String>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabArg {
    Web,
    Api,
}

impl From<TabArg> for AccountTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Web => AccountTab::Web,
            TabArg::Api => AccountTab::Api,
        }
    }
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Write a default config file
    Init,
    /// Print the effective configuration
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("load config")?;

    // default to the add dialog
    let Some(command) = cli.command else {
        return commands::add::run(&config, &AddArgs::default());
    };

    match command {
        Commands::Add(args) => commands::add::run(&config, &args),
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Show => commands::config::show(&config),
        },
    }
}
