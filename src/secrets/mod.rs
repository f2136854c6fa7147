//! Credential lookup.
//!
//! Solver configurations never carry credentials inline. They reference keys of Kubernetes
//! `Secret`s in the challenge's namespace through [`SecretKeySelector`]s, and a [`SecretStore`]
//! resolves those references.
//!
//! Two implementations are provided, [`kube::KubeSecretStore`] reading from the Kubernetes API of
//! the cluster the webhook runs in, and [`memory::InMemorySecretStore`] which is handy for local
//! runs and tests.

use crate::dns::Credentials;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod kube;
pub mod memory;

pub use kube::KubeSecretStore;
pub use memory::InMemorySecretStore;

/// `DynSecretStore` is a type alias for a [`SecretStore`] shared between concurrent challenges.
#[allow(clippy::module_name_repetitions)]
pub type DynSecretStore = Arc<dyn SecretStore + Send + Sync>;

/// Selects one key of a `Secret`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretKeySelector {
    /// Name of the `Secret` in the challenge's namespace.
    #[serde(default)]
    pub name: String,
    /// Key within the `Secret`'s data.
    #[serde(default)]
    pub key: String,
}

/// An async trait describing a namespaced secret store.
#[async_trait::async_trait]
#[allow(clippy::module_name_repetitions)]
pub trait SecretStore {
    /// Get the raw value stored under `selector.key` in secret `selector.name` of `namespace`.
    ///
    /// Returns [`Error::SecretNotFound`] when the secret doesn't exist and
    /// [`Error::SecretKeyNotFound`] when it exists without the key.
    async fn get(&self, namespace: &str, selector: &SecretKeySelector) -> Result<Vec<u8>, Error>;
}

/// Resolves the access key pair referenced by `access_key` and `secret_key`.
///
/// # Errors
///
/// Propagates the first lookup error of `store`.
pub async fn resolve_credentials(
    store: &(dyn SecretStore + Send + Sync),
    namespace: &str,
    access_key: &SecretKeySelector,
    secret_key: &SecretKeySelector,
) -> Result<Credentials, Error> {
    let access_key = store.get(namespace, access_key).await?;
    let secret_key = store.get(namespace, secret_key).await?;
    Ok(Credentials {
        access_key: String::from_utf8_lossy(&access_key).into_owned(),
        secret_key: String::from_utf8_lossy(&secret_key).into_owned(),
    })
}

/// Formats a `namespace/name` secret reference for messages.
pub(crate) fn secret_ref(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(name: &str, key: &str) -> SecretKeySelector {
        SecretKeySelector {
            name: name.to_string(),
            key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn resolves_both_keys() {
        let store = InMemorySecretStore::default()
            .with_secret("certs", "huawei", "ak", "AKID")
            .with_secret("certs", "huawei", "sk", "SECRET");

        let creds = resolve_credentials(
            &store,
            "certs",
            &selector("huawei", "ak"),
            &selector("huawei", "sk"),
        )
        .await
        .unwrap();
        assert_eq!(creds.access_key, "AKID");
        assert_eq!(creds.secret_key, "SECRET");
    }

    #[tokio::test]
    async fn missing_secret_key_fails() {
        let store = InMemorySecretStore::default().with_secret("certs", "huawei", "ak", "AKID");

        let err = resolve_credentials(
            &store,
            "certs",
            &selector("huawei", "ak"),
            &selector("huawei", "sk"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "no key \"sk\" in secret \"certs/huawei\"");
    }
}
