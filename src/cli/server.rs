use clap::Parser;
use foodie_config::Server as Config;
use foodie_error::{ext::ResultExt, Result};
use foodie_server::StartServerError;
use foodie_utils::env::load_dotenv;
use std::net::IpAddr;
use std::num::NonZeroUsize;

/// Runs the AmaderFoodie API HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    load_dotenv().ok();

    let mut config = Config::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    foodie_tracing::init(&config.logging).change_context(StartServerError)?;
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.workers.get())
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(foodie_server::run(config))
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = workers;
        }
    }
}
