//! DNS provider record management.
//!
//! A [`RecordClient`] creates, finds and deletes the `TXT` record sets that answer
//! [RFC-8555][RFC-8555] [DNS-01] challenges. [`huawei::HuaweiClient`] implements it against the
//! Huawei Cloud DNS API.
//!
//! [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
//! [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4

use crate::error::Error;
use std::fmt;
use std::sync::Arc;

pub mod huawei;

pub use huawei::{HuaweiClient, HuaweiClientFactory};

/// `DynRecordClient` is a type alias for a [`RecordClient`] shared between concurrent
/// challenges through an [`Arc`].
pub type DynRecordClient = Arc<dyn RecordClient + Send + Sync>;

/// `DynClientFactory` is a type alias for a shared [`ClientFactory`].
pub type DynClientFactory = Arc<dyn ClientFactory + Send + Sync>;

/// A provider-side `TXT` record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxtRecord {
    /// The record set identifier.
    pub id: String,
    /// The identifier of the zone holding the record set.
    pub zone_id: String,
    pub name: String,
    /// The record set values, as plain (unquoted) strings.
    pub records: Vec<String>,
}

impl TxtRecord {
    /// Returns true if one of the record set's values is exactly `value`.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.records.iter().any(|v| v == value)
    }
}

/// An access key pair used to authenticate with the DNS provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// An async trait describing the `TXT` record operations needed to present and clean up a
/// [DNS-01] challenge.
///
/// [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4
#[async_trait::async_trait]
pub trait RecordClient {
    /// Create a `TXT` record set named `name` in zone `zone_id` holding the single `value`.
    ///
    /// No de-duplication is done here, the provider decides what a second identical create does.
    async fn create_txt(&self, name: &str, zone_id: &str, value: &str) -> Result<(), Error>;

    /// Find the `TXT` record set for `fqdn` in `zone` that holds exactly `value`.
    ///
    /// Returns [`Error::RecordNotFound`] when no record set carries the value, even if record
    /// sets with the right name exist.
    async fn find_txt(&self, fqdn: &str, zone: &str, value: &str) -> Result<TxtRecord, Error>;

    /// Delete the record set `record_set_id` from zone `zone_id`.
    async fn delete_txt(&self, record_set_id: &str, zone_id: &str) -> Result<(), Error>;
}

/// Builds authenticated [`RecordClient`]s.
pub trait ClientFactory {
    /// Build a client for `region` authenticated with `credentials`.
    fn build(&self, credentials: Credentials, region: &str) -> Result<DynRecordClient, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_exact() {
        let record = TxtRecord {
            records: vec!["abc123".to_string(), "other".to_string()],
            ..TxtRecord::default()
        };
        assert!(record.contains("abc123"));
        assert!(!record.contains("abc"));
        assert!(!record.contains("\"abc123\""));
    }

    #[test]
    fn credentials_debug_redacts_secret() {
        let creds = Credentials {
            access_key: "AK".to_string(),
            secret_key: "very-secret".to_string(),
        };
        let out = format!("{creds:?}");
        assert!(out.contains("AK"));
        assert!(!out.contains("very-secret"));
    }
}
