use crate::error::Error;
use crate::secrets::SecretKeySelector;
use serde::Deserialize;
use serde_json::Value;

/// Per-issuer solver configuration, embedded in each challenge request.
///
/// ```json
/// {
///   "region": "cn-north-4",
///   "zoneID": "ff8080825b8fb8f1015b8e8a1e6e0065",
///   "accessKeySecretRef": { "name": "huawei-credentials", "key": "accessKey" },
///   "secretKeySecretRef": { "name": "huawei-credentials", "key": "secretKey" }
/// }
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    pub region: String,
    #[serde(rename = "zoneID")]
    pub zone_id: String,
    pub access_key_secret_ref: SecretKeySelector,
    pub secret_key_secret_ref: SecretKeySelector,
}

impl SolverConfig {
    /// Decode the configuration blob of a challenge. A missing blob yields the default
    /// configuration.
    pub fn load(raw: Option<&Value>) -> Result<Self, Error> {
        match raw {
            None => Ok(Self::default()),
            Some(raw) => Self::deserialize(raw).map_err(Error::InvalidSolverConfig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_all_fields_and_ignores_unknown() {
        let config = SolverConfig::load(Some(&raw(
            r#"{
                "region": "cn-north-4",
                "zoneID": "zone-1",
                "accessKeySecretRef": {"name": "huawei", "key": "ak"},
                "secretKeySecretRef": {"name": "huawei", "key": "sk"},
                "ttl": 300
            }"#,
        )))
        .unwrap();

        assert_eq!(config.region, "cn-north-4");
        assert_eq!(config.zone_id, "zone-1");
        assert_eq!(config.access_key_secret_ref.key, "ak");
        assert_eq!(config.secret_key_secret_ref.name, "huawei");
    }

    #[test]
    fn missing_fields_default() {
        let config = SolverConfig::load(Some(&raw(r#"{"region": "cn-north-4"}"#))).unwrap();
        assert!(config.zone_id.is_empty());
        assert_eq!(SolverConfig::load(None).unwrap(), SolverConfig::default());
    }

    #[test]
    fn malformed_config() {
        let err = SolverConfig::load(Some(&raw(r#"{"zoneID": 42}"#))).unwrap_err();
        assert!(matches!(err, Error::InvalidSolverConfig(_)));
        assert!(err.to_string().starts_with("error decoding solver config: "));
    }
}
