use crate::error::Error;
use crate::secrets::{secret_ref, SecretKeySelector, SecretStore};
use std::collections::HashMap;

/// Secrets held in memory, keyed by `(namespace, name)`.
#[derive(Default, Debug, Clone)]
pub struct InMemorySecretStore {
    secrets: HashMap<(String, String), HashMap<String, Vec<u8>>>,
}

impl InMemorySecretStore {
    /// Store `value` under `key` of secret `name` in `namespace`.
    pub fn insert(&mut self, namespace: &str, name: &str, key: &str, value: impl Into<Vec<u8>>) {
        self.secrets
            .entry((namespace.to_string(), name.to_string()))
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Builder-style [`InMemorySecretStore::insert`].
    #[must_use]
    pub fn with_secret(
        mut self,
        namespace: &str,
        name: &str,
        key: &str,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(namespace, name, key, value);
        self
    }
}

#[async_trait::async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get(&self, namespace: &str, selector: &SecretKeySelector) -> Result<Vec<u8>, Error> {
        let secret = self
            .secrets
            .get(&(namespace.to_string(), selector.name.clone()))
            .ok_or_else(|| Error::SecretNotFound {
                secret: secret_ref(namespace, &selector.name),
            })?;
        secret
            .get(&selector.key)
            .cloned()
            .ok_or_else(|| Error::SecretKeyNotFound {
                key: selector.key.clone(),
                secret: secret_ref(namespace, &selector.name),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn secrets_are_namespaced() {
        let store = InMemorySecretStore::default().with_secret("a", "creds", "ak", "value");
        let selector = SecretKeySelector {
            name: "creds".to_string(),
            key: "ak".to_string(),
        };

        assert_eq!(store.get("a", &selector).await.unwrap(), b"value");
        let err = store.get("b", &selector).await.unwrap_err();
        assert!(matches!(err, Error::SecretNotFound { secret } if secret == "b/creds"));
    }
}
