use anyhow::{Context, Result};
use huawei_dns01_webhook::config::GROUP_NAME_ENV;
use huawei_dns01_webhook::{Config, HuaweiSolver, KubeConfig, SharedConfig, Solver};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let config = config_init(std::env::args().nth(1))?;

    let kube = KubeConfig::in_cluster().context("loading in-cluster kubernetes configuration")?;
    let mut solver = HuaweiSolver::new();
    solver.initialize(&kube).await?;
    tracing::info!("solver \"{}\" initialized", solver.name());

    tracing::info!(
        "API for group {} listening on {}",
        &config.group_name,
        &config.bind_addr
    );
    huawei_dns01_webhook::api::new(config, Arc::new(solver), shutdown_signal()).await?;

    tracing::info!("goodbye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        return;
    }
    tracing::info!("quitting from signal");
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huawei_dns01_webhook=info".into()),
        )
        .init();
}

fn config_init(config_file: Option<String>) -> Result<SharedConfig> {
    let config = match config_file {
        None => Config::default(),
        Some(config_file) => {
            tracing::debug!("loaded config from {config_file}");
            Config::try_from_file(&config_file)?
        }
    };
    // The group name must match the issuer's `groupName`; there is no sensible default.
    let config = config.with_group_name(std::env::var(GROUP_NAME_ENV).ok())?;
    Ok(Arc::new(config))
}
