use foodie_error::ext::ResultExt;
use foodie_error::Result;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::App;

#[derive(Debug, Error)]
#[error("Could not start the AmaderFoodie server")]
pub struct StartServerError;

/// Runs the HTTP server until the process receives a shutdown signal.
///
/// Pending database migrations are applied before accepting requests.
#[tracing::instrument(skip_all, name = "server.run", fields(
    server.ip = %config.ip,
    server.port = %config.port,
    workers = %config.workers,
))]
pub async fn run(config: foodie_config::Server) -> Result<(), StartServerError> {
    if foodie_utils::RELEASE {
        debug!("Starting server...");
    } else {
        info!("Starting server with config: {config:#?}");
    }

    let app = App::new(config).change_context(StartServerError)?;
    app.wait_until_healthy()
        .await
        .change_context(StartServerError)
        .attach_printable("database is not reachable")?;

    app.migrate()
        .await
        .change_context(StartServerError)
        .attach_printable("could not apply database migrations")?;

    let listener = TcpListener::bind((app.config.ip, app.config.port))
        .await
        .change_context(StartServerError)
        .attach_printable("could not bind server with address and port")?;

    let addr = listener
        .local_addr()
        .change_context(StartServerError)
        .attach_printable("could not get socket address of the server")?;

    let maintenance = crate::maintenance::spawn(app.clone());
    let router = crate::build_axum_router(app.clone());

    info!("AmaderFoodie server is listening at http://{addr}");
    let result = axum::serve(listener, router)
        .with_graceful_shutdown(foodie_utils::shutdown_signal())
        .await;

    info!("Shutting down server...");
    if let Some(handle) = maintenance {
        handle.abort();
    }
    app.close().await;

    if let Err(error) = &result {
        warn!(%error, "server stopped with an error");
    }
    result
        .change_context(StartServerError)
        .attach_printable("server stopped unexpectedly")
}
