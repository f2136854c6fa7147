use crate::api::routes;
use crate::config::SharedConfig;
use crate::error::Error;
use crate::solver::DynSolver;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

/// Time in-flight requests get to finish once shutdown is requested.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: SharedConfig,
    pub solver: DynSolver,
}

/// Build the webhook [`Router`] without binding it, e.g. to drive it in-process.
pub fn router(config: SharedConfig, solver: DynSolver) -> Router {
    routes::new(AppState { config, solver })
}

/// Serve the webhook API on [`Config::bind_addr`][crate::config::Config::bind_addr] until
/// `shutdown` resolves.
///
/// The API is served over HTTPS when a certificate and key are configured, as the Kubernetes
/// API aggregation layer requires, and over plain HTTP otherwise.
///
/// # Errors
///
/// Returns [`Error::IncompleteTlsConfig`] if only one of the TLS files is configured, and
/// [`Error::IO`] if they can't be loaded or the listener fails.
pub async fn new(
    config: SharedConfig,
    solver: DynSolver,
    shutdown: impl Future<Output = ()>,
) -> Result<(), Error> {
    let bind_addr = config.bind_addr;
    let tls = match config.tls_files()? {
        Some((cert, key)) => Some(RustlsConfig::from_pem_file(cert, key).await?),
        None => None,
    };

    let app = router(config, solver).into_make_service();
    let handle = Handle::new();
    let mut server: Pin<Box<dyn Future<Output = io::Result<()>>>> = match tls {
        Some(tls) => {
            tracing::info!("serving HTTPS on {bind_addr}");
            Box::pin(
                axum_server::bind_rustls(bind_addr, tls)
                    .handle(handle.clone())
                    .serve(app),
            )
        }
        None => {
            tracing::warn!("no serving certificate configured, serving plain HTTP on {bind_addr}");
            Box::pin(axum_server::bind(bind_addr).handle(handle.clone()).serve(app))
        }
    };

    tokio::select! {
        res = &mut server => return res.map_err(Error::from),
        () = shutdown => handle.graceful_shutdown(Some(SHUTDOWN_GRACE)),
    }
    server.await?;
    Ok(())
}
