use crate::error::Error;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub type SharedConfig = Arc<Config>;

/// Environment variable naming the webhook's API group.
pub const GROUP_NAME_ENV: &str = "GROUP_NAME";

const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// API group the webhook serves. Always taken from [`GROUP_NAME_ENV`].
    #[serde(skip)]
    pub group_name: String,
    pub bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub api_timeout: Duration,
    /// PEM serving certificate chain. Together with [`Config::tls_key_file`] switches the API to
    /// HTTPS.
    pub tls_cert_file: Option<PathBuf>,
    /// PEM private key for [`Config::tls_cert_file`].
    pub tls_key_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            group_name: String::new(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8443)),
            api_timeout: Duration::from_secs(30),
            tls_cert_file: None,
            tls_key_file: None,
        }
    }
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        Ok(conf)
    }

    /// Returns the serving certificate and key files, or `None` to serve plain HTTP.
    pub fn tls_files(&self) -> Result<Option<(&Path, &Path)>, Error> {
        match (&self.tls_cert_file, &self.tls_key_file) {
            (Some(cert), Some(key)) => Ok(Some((cert.as_path(), key.as_path()))),
            (None, None) => Ok(None),
            _ => Err(Error::IncompleteTlsConfig),
        }
    }

    /// Sets [`Config::group_name`] from `group_name`, which must be present and non-empty.
    pub fn with_group_name(mut self, group_name: Option<String>) -> Result<Self, Error> {
        match group_name {
            Some(group_name) if !group_name.is_empty() => {
                self.group_name = group_name;
                Ok(self)
            }
            _ => Err(Error::MissingGroupName),
        }
    }
}

/// How to reach the Kubernetes API server holding challenge credentials.
#[derive(Debug, Clone, Default)]
pub struct KubeConfig {
    /// Base URL, e.g. `https://10.96.0.1:443`.
    pub api_server: String,
    pub token: Option<String>,
    /// When set, the bearer token is read from this file on every request. Takes precedence
    /// over [`KubeConfig::token`].
    pub token_file: Option<PathBuf>,
    /// PEM bundle trusted for the API server certificate.
    pub ca_cert_pem: Option<Vec<u8>>,
}

impl KubeConfig {
    /// The configuration of a pod's own service account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKubeConfig`] outside of a cluster, and [`Error::IO`] if the
    /// service account CA bundle can't be read.
    pub fn in_cluster() -> Result<Self, Error> {
        let host = std::env::var("KUBERNETES_SERVICE_HOST")
            .map_err(|_| Error::InvalidKubeConfig("KUBERNETES_SERVICE_HOST is not set".into()))?;
        let port = std::env::var("KUBERNETES_SERVICE_PORT")
            .map_err(|_| Error::InvalidKubeConfig("KUBERNETES_SERVICE_PORT is not set".into()))?;
        let sa_dir = Path::new(SERVICE_ACCOUNT_DIR);
        Ok(Self {
            api_server: api_server_url(&host, &port),
            token: None,
            token_file: Some(sa_dir.join("token")),
            ca_cert_pem: Some(std::fs::read(sa_dir.join("ca.crt"))?),
        })
    }
}

fn api_server_url(host: &str, port: &str) -> String {
    if host.contains(':') {
        format!("https://[{host}]:{port}")
    } else {
        format!("https://{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"bind_addr": "127.0.0.1:9443", "api_timeout": 5}}"#).unwrap();

        let config = Config::try_from_file(f.path()).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9443".parse::<SocketAddr>().unwrap());
        assert_eq!(config.api_timeout, Duration::from_secs(5));
        assert!(config.group_name.is_empty());
    }

    #[test]
    fn tls_files_come_in_pairs() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"tls_cert_file": "/tls/tls.crt", "tls_key_file": "/tls/tls.key"}}"#
        )
        .unwrap();
        let config = Config::try_from_file(f.path()).unwrap();
        assert_eq!(
            config.tls_files().unwrap(),
            Some((Path::new("/tls/tls.crt"), Path::new("/tls/tls.key")))
        );

        assert_eq!(Config::default().tls_files().unwrap(), None);

        let config = Config {
            tls_cert_file: Some(PathBuf::from("/tls/tls.crt")),
            ..Config::default()
        };
        assert!(matches!(config.tls_files(), Err(Error::IncompleteTlsConfig)));
    }

    #[test]
    fn group_name_is_required() {
        assert!(matches!(
            Config::default().with_group_name(None),
            Err(Error::MissingGroupName)
        ));
        assert!(matches!(
            Config::default().with_group_name(Some(String::new())),
            Err(Error::MissingGroupName)
        ));
        let config = Config::default()
            .with_group_name(Some("acme.example.com".to_string()))
            .unwrap();
        assert_eq!(config.group_name, "acme.example.com");
    }

    #[test]
    fn api_server_urls() {
        assert_eq!(api_server_url("10.96.0.1", "443"), "https://10.96.0.1:443");
        assert_eq!(api_server_url("fd00::1", "443"), "https://[fd00::1]:443");
    }
}
