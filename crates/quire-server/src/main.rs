use quire_error::ext::ResultExt;
use quire_error::Result;
use quire_model::PgGateway;
use quire_server::App;
use quire_utils::env::load_dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, Instrument};

#[derive(Debug, Error)]
#[error("Could not start Quire HTTP server")]
struct StartError;

#[tracing::instrument(skip_all, name = "server.run")]
async fn start_quire_server(config: quire_config::Server) -> Result<(), StartError> {
    if !quire_utils::RELEASE {
        info!(?config, "Starting Quire HTTP server...");
    }

    debug!("connecting to the database");
    let gateway = PgGateway::connect(&config.database)
        .await
        .change_context(StartError)?;

    gateway.migrate().await.change_context(StartError)?;

    let app = App::new(config, Arc::new(gateway));

    debug!("binding server");
    let listener = TcpListener::bind((app.config.ip, app.config.port))
        .await
        .change_context(StartError)
        .attach_printable("could not bind server with address and port")?;

    let addr = listener
        .local_addr()
        .change_context(StartError)
        .attach_printable("could not get socket address of the server")?;

    let router = quire_server::build_axum_router(app.clone());
    let make_service = quire_server::middleware::apply(router)
        .into_make_service_with_connect_info::<SocketAddr>();

    info!(
        "Quire HTTP server is listening at http://{addr} with {} workers",
        app.config.workers
    );

    axum::serve(listener, make_service)
        .with_graceful_shutdown(
            async {
                quire_utils::shutdown_signal().await;
                info!("Received graceful shutdown signal. Shutting down server...");
            }
            .instrument(tracing::Span::current()),
        )
        .await
        .change_context(StartError)
        .attach_printable("could not serve Quire HTTP service")?;

    Ok(())
}

fn main() -> Result<(), StartError> {
    load_dotenv().ok();

    let config = quire_config::Server::from_maybe_file().change_context(StartError)?;
    let _guard = quire_tracing::init(&config.logging).change_context(StartError)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.workers)
        .build()
        .change_context(StartError)
        .attach_printable("could not build tokio runtime")?;

    rt.block_on(start_quire_server(config))
}
