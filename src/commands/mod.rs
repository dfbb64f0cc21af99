pub mod init;
pub mod migrate;

use crate::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: migrate::MigrateAction,
    },
    /// Run migrations and install the default categories
    Init {
        #[arg(long, help = "Skip seeding the default categories")]
        skip_seed: bool,
    },
}

pub async fn handle_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate { action } => migrate::handle_migrate_command(action, config).await,
        Commands::Init { skip_seed } => init::handle_init_command(skip_seed, config).await,
    }
}
