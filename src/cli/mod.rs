use clap::Parser;
use foodie_error::{ext::ResultExt, Result};

mod maintenance;
mod server;

/// Command line options for AmaderFoodie.
#[derive(Debug, Parser)]
#[command(
    about = "Utility suite for AmaderFoodie backend",
    version,
    author,
    long_about
)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.subcommand {
            Subcommand::Server(args) => self::server::run(args).erase_context(),
            Subcommand::Maintenance(args) => self::maintenance::run(args).erase_context(),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Server(self::server::ServerCommand),
    #[clap(subcommand)]
    Maintenance(self::maintenance::MaintenanceCommand),
}

