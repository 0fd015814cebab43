use clap::{Parser, Subcommand};
use foodie_config::Server as Config;
use foodie_error::{ext::ResultExt, Result};
use foodie_server::maintenance::{self, MaintenanceError};
use foodie_server::App;
use foodie_utils::env::load_dotenv;
use tracing::info;

/// Runs a housekeeping job once and exits
#[derive(Debug, Subcommand)]
pub enum MaintenanceCommand {
    /// Deletes user activities older than the retention period
    PurgeActivities(PurgeActivities),
    /// Recomputes every denormalized counter from the source rows
    Recount,
}

#[derive(Debug, Parser)]
pub struct PurgeActivities {
    /// Overrides `maintenance.activity_retention_days`
    #[clap(long)]
    pub days: Option<u32>,
}

pub fn run(command: MaintenanceCommand) -> Result<(), MaintenanceError> {
    load_dotenv().ok();

    let config = Config::load().change_context(MaintenanceError)?;
    foodie_tracing::init(&config.logging).change_context(MaintenanceError)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .change_context(MaintenanceError)
        .attach_printable("could not build tokio runtime")?
        .block_on(perform(command, config))
}

async fn perform(command: MaintenanceCommand, config: Config) -> Result<(), MaintenanceError> {
    let app = App::new(config).change_context(MaintenanceError)?;
    app.migrate().await.change_context(MaintenanceError)?;

    let result = match command {
        MaintenanceCommand::PurgeActivities(args) => {
            let days = args
                .days
                .unwrap_or(app.config.maintenance.activity_retention_days);

            maintenance::purge_activities(&app, days)
                .await
                .map(|purged| info!("Deleted {purged} activities older than {days} days"))
        }
        MaintenanceCommand::Recount => maintenance::recount(&app)
            .await
            .map(|corrected| info!("Corrected {corrected} counters")),
    };

    app.close().await;
    result
}
