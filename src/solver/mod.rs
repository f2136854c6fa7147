//! DNS-01 challenge solving.
//!
//! A [`Solver`] is what cert-manager's webhook contract calls into: `present` publishes the
//! challenge `TXT` record, `clean_up` removes it again. [`HuaweiSolver`] fulfils the contract with
//! Huawei Cloud DNS.
//!
//! For each call the solver decodes the issuer's [`SolverConfig`], resolves the referenced access
//! key pair from the [secret store][crate::secrets], and obtains a DNS client for the configured
//! zone. Clients are built once per zone and then reused for the life of the process.

mod cache;
mod config;

pub use cache::ClientCache;
pub use config::SolverConfig;

use crate::challenge::ChallengeRequest;
use crate::config::KubeConfig;
use crate::dns::{DynClientFactory, DynRecordClient, HuaweiClientFactory};
use crate::error::Error;
use crate::name::extract_record_name;
use crate::secrets::{resolve_credentials, DynSecretStore, KubeSecretStore};
use std::sync::Arc;
use tracing::{error, info};

/// `DynSolver` is a type alias for a [`Solver`] shared by the webhook request handlers.
pub type DynSolver = Arc<dyn Solver + Send + Sync>;

/// The cert-manager DNS-01 webhook solver contract.
#[async_trait::async_trait]
pub trait Solver {
    /// The solver name issuers refer to.
    fn name(&self) -> &str;

    /// Called once before any challenge is handled.
    async fn initialize(&mut self, kube: &KubeConfig) -> Result<(), Error>;

    /// Publish the challenge `TXT` record.
    async fn present(&self, ch: &ChallengeRequest) -> Result<(), Error>;

    /// Remove the challenge `TXT` record published by [`Solver::present`].
    async fn clean_up(&self, ch: &ChallengeRequest) -> Result<(), Error>;
}

/// Solves DNS-01 challenges with Huawei Cloud DNS.
pub struct HuaweiSolver {
    secrets: Option<DynSecretStore>,
    factory: DynClientFactory,
    clients: ClientCache,
}

impl Default for HuaweiSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HuaweiSolver {
    pub const NAME: &'static str = "huawei";

    /// A solver building regional Huawei Cloud DNS clients. It has no secret store until
    /// [`Solver::initialize`] is called.
    #[must_use]
    pub fn new() -> Self {
        Self {
            secrets: None,
            factory: Arc::new(HuaweiClientFactory::default()),
            clients: ClientCache::default(),
        }
    }

    /// Use `factory` to build DNS clients.
    #[must_use]
    pub fn with_client_factory(mut self, factory: DynClientFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Resolve credentials from `secrets` rather than the Kubernetes API.
    #[must_use]
    pub fn with_secret_store(mut self, secrets: DynSecretStore) -> Self {
        self.secrets = Some(secrets);
        self
    }

    async fn client(&self, cfg: &SolverConfig, namespace: &str) -> Result<DynRecordClient, Error> {
        let secrets = self.secrets.as_ref().ok_or(Error::NotInitialized)?;
        self.clients
            .get_or_try_insert(&cfg.zone_id, move || async move {
                let credentials = resolve_credentials(
                    secrets.as_ref(),
                    namespace,
                    &cfg.access_key_secret_ref,
                    &cfg.secret_key_secret_ref,
                )
                .await?;
                self.factory.build(credentials, &cfg.region)
            })
            .await
    }

    async fn load(&self, ch: &ChallengeRequest) -> Result<(SolverConfig, DynRecordClient), Error> {
        let cfg = SolverConfig::load(ch.config.as_ref())?;
        info!("decoded configuration {cfg:?}");

        let client = self
            .client(&cfg, &ch.resource_namespace)
            .await
            .map_err(|err| {
                error!("failed to get dns client: {err}");
                err
            })?;
        Ok((cfg, client))
    }
}

#[async_trait::async_trait]
impl Solver for HuaweiSolver {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn initialize(&mut self, kube: &KubeConfig) -> Result<(), Error> {
        self.secrets = Some(Arc::new(KubeSecretStore::new(kube)?));
        self.clients.clear().await;
        Ok(())
    }

    async fn present(&self, ch: &ChallengeRequest) -> Result<(), Error> {
        info!(
            "start to present TXT record {} {}",
            ch.resolved_fqdn, ch.resolved_zone
        );
        let (cfg, client) = self.load(ch).await?;

        let name = extract_record_name(&ch.resolved_fqdn, &ch.resolved_zone);
        client
            .create_txt(&name, &cfg.zone_id, &ch.key)
            .await
            .map_err(|err| {
                error!("failed to add TXT record: {err}");
                err
            })?;

        info!(
            "complete presenting TXT record {} {}",
            ch.resolved_fqdn, ch.resolved_zone
        );
        Ok(())
    }

    async fn clean_up(&self, ch: &ChallengeRequest) -> Result<(), Error> {
        info!(
            "start to clean TXT record {} {}",
            ch.resolved_fqdn, ch.resolved_zone
        );
        let (_, client) = self.load(ch).await?;

        let record = client
            .find_txt(&ch.resolved_fqdn, &ch.resolved_zone, &ch.key)
            .await
            .map_err(|err| {
                error!("failed to get TXT record: {err}");
                err
            })?;
        client
            .delete_txt(&record.id, &record.zone_id)
            .await
            .map_err(|err| {
                error!("failed to delete TXT record: {err}");
                err
            })?;

        info!(
            "complete cleaning relevant TXT record {} {}",
            ch.resolved_fqdn, ch.resolved_zone
        );
        Ok(())
    }
}
