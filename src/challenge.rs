//! The challenge request cert-manager hands to a DNS-01 solver.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the solver is asked to do with the challenge record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChallengeAction {
    #[default]
    Present,
    CleanUp,
}

/// A single DNS-01 challenge, as issued by cert-manager.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeRequest {
    pub uid: String,
    pub action: ChallengeAction,
    #[serde(rename = "type")]
    pub challenge_type: String,
    /// The name being validated, e.g. `example.com`.
    pub dns_name: String,
    /// The value to publish in the TXT record.
    pub key: String,
    /// Namespace secret references in [`ChallengeRequest::config`] resolve in.
    pub resource_namespace: String,
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    pub resolved_zone: String,
    pub allow_ambient_credentials: bool,
    /// Solver-specific configuration from the issuer, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}
