pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "ormc")]
#[command(about = "ORM Console - admin and client console for the reputation management API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Client account management")]
    Clients {
        #[command(subcommand)]
        cmd: commands::clients::ClientCommands,
    },

    #[command(about = "Keyword management")]
    Keywords {
        #[command(subcommand)]
        cmd: commands::keywords::KeywordCommands,
    },

    #[command(about = "Scan lifecycle: list, trigger, send, delete")]
    Scans {
        #[command(subcommand)]
        cmd: commands::scans::ScanCommands,
    },

    #[command(about = "Report access and downloads")]
    Reports {
        #[command(subcommand)]
        cmd: commands::reports::ReportCommands,
    },

    #[command(about = "Role-specific overview")]
    Dashboard {
        #[command(subcommand)]
        cmd: commands::dashboard::DashboardCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Clients { cmd } => commands::clients::handle(cmd, output_format).await,
        Commands::Keywords { cmd } => commands::keywords::handle(cmd, output_format).await,
        Commands::Scans { cmd } => commands::scans::handle(cmd, output_format).await,
        Commands::Reports { cmd } => commands::reports::handle(cmd, output_format).await,
        Commands::Dashboard { cmd } => commands::dashboard::handle(cmd, output_format).await,
    }
}
