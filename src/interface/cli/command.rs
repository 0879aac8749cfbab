//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cfgsync")]
#[command(about = "Keep the secret-backed user config in sync with the current schema")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile the stored config and print the resolved result (default)
    Get,
    /// Print the latest stored config blob without reconciling
    Show,
    /// Show effective merged settings and store token source
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliAction {
    GetConfig,
    ShowConfig,
    InspectSettings,
}

impl Cli {
    pub fn parse_action() -> CliAction {
        Cli::parse().action()
    }

    fn action(&self) -> CliAction {
        match self.command {
            None | Some(Commands::Get) => CliAction::GetConfig,
            Some(Commands::Show) => CliAction::ShowConfig,
            Some(Commands::Settings) => CliAction::InspectSettings,
        }
    }
}
