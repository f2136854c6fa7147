//! A [`SecretStore`][super::SecretStore] reading `Secret`s from the Kubernetes API.

use crate::config::KubeConfig;
use crate::error::Error;
use crate::secrets::{secret_ref, SecretKeySelector, SecretStore};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Certificate, Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;

/// The subset of a core/v1 `Secret` we read.
#[derive(Deserialize, Debug, Default)]
struct Secret {
    #[serde(default)]
    data: HashMap<String, String>,
}

/// Reads secrets with the webhook's own service account.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct KubeSecretStore {
    http: Client,
    config: KubeConfig,
}

impl KubeSecretStore {
    /// Create a store talking to the API server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKubeConfig`] if the CA bundle isn't valid PEM, and
    /// [`Error::Http`] if the HTTP client can't be constructed.
    pub fn new(config: &KubeConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(pem) = &config.ca_cert_pem {
            let cert = Certificate::from_pem(pem)
                .map_err(|err| Error::InvalidKubeConfig(format!("invalid CA bundle: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }
        Ok(Self {
            http: builder.build()?,
            config: config.clone(),
        })
    }

    async fn bearer_token(&self) -> Result<Option<String>, Error> {
        match &self.config.token_file {
            // Service account tokens are rotated on disk, so read the file for every request.
            Some(path) => Ok(Some(
                tokio::fs::read_to_string(path).await?.trim().to_string(),
            )),
            None => Ok(self.config.token.clone()),
        }
    }
}

#[async_trait::async_trait]
impl SecretStore for KubeSecretStore {
    async fn get(&self, namespace: &str, selector: &SecretKeySelector) -> Result<Vec<u8>, Error> {
        let secret_name = secret_ref(namespace, &selector.name);
        let url = format!(
            "{}/api/v1/namespaces/{}/secrets/{}",
            self.config.api_server.trim_end_matches('/'),
            urlencoding::encode(namespace),
            urlencoding::encode(&selector.name),
        );

        let mut request = self.http.get(&url);
        if let Some(token) = self.bearer_token().await? {
            request = request.bearer_auth(token);
        }

        let load_err = |source| Error::SecretLoad {
            secret: secret_name.clone(),
            source,
        };
        let response = request.send().await.map_err(load_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::SecretNotFound {
                secret: secret_name.clone(),
            });
        }
        let secret: Secret = response
            .error_for_status()
            .map_err(load_err)?
            .json()
            .await
            .map_err(load_err)?;

        let encoded = secret
            .data
            .get(&selector.key)
            .ok_or_else(|| Error::SecretKeyNotFound {
                key: selector.key.clone(),
                secret: secret_name.clone(),
            })?;
        STANDARD
            .decode(encoded)
            .map_err(|source| Error::SecretDecode {
                secret: secret_name.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn selector(key: &str) -> SecretKeySelector {
        SecretKeySelector {
            name: "huawei-credentials".to_string(),
            key: key.to_string(),
        }
    }

    fn store(server: &MockServer, token: Option<&str>) -> KubeSecretStore {
        KubeSecretStore::new(&KubeConfig {
            api_server: server.uri(),
            token: token.map(ToString::to_string),
            token_file: None,
            ca_cert_pem: None,
        })
        .unwrap()
    }

    async fn mount_secret(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v1/namespaces/certs/secrets/huawei-credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "apiVersion": "v1",
                "kind": "Secret",
                "metadata": {"name": "huawei-credentials", "namespace": "certs"},
                "data": {"accessKey": "QUtJRA==", "broken": "%%%"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn decodes_secret_data() {
        let server = MockServer::start().await;
        mount_secret(&server).await;

        let value = store(&server, None)
            .get("certs", &selector("accessKey"))
            .await
            .unwrap();
        assert_eq!(value, b"AKID");
    }

    #[tokio::test]
    async fn sends_bearer_token_from_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer file-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"accessKey": "QUtJRA=="}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut token_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(token_file, "file-token").unwrap();
        let store = KubeSecretStore::new(&KubeConfig {
            api_server: server.uri(),
            token: Some("ignored".to_string()),
            token_file: Some(token_file.path().to_path_buf()),
            ca_cert_pem: None,
        })
        .unwrap();

        store.get("certs", &selector("accessKey")).await.unwrap();
    }

    #[tokio::test]
    async fn missing_key_and_bad_data() {
        let server = MockServer::start().await;
        mount_secret(&server).await;
        let store = store(&server, Some("token"));

        let err = store.get("certs", &selector("secretKey")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "no key \"secretKey\" in secret \"certs/huawei-credentials\""
        );

        let err = store.get("certs", &selector("broken")).await.unwrap_err();
        assert!(matches!(err, Error::SecretDecode { .. }));
    }

    #[tokio::test]
    async fn missing_secret() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "kind": "Status", "status": "Failure", "reason": "NotFound", "code": 404
            })))
            .mount(&server)
            .await;

        let err = store(&server, None)
            .get("certs", &selector("accessKey"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SecretNotFound { secret } if secret == "certs/huawei-credentials"));
    }

    #[tokio::test]
    async fn forbidden_is_a_load_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = store(&server, None)
            .get("certs", &selector("accessKey"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SecretLoad { .. }));
        let message = err.to_string();
        assert!(
            message.starts_with(
                "failed to load secret \"certs/huawei-credentials\": HTTP status client error (403 Forbidden)"
            ),
            "{message}"
        );
    }
}
