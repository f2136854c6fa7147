use crate::challenge::ChallengeRequest;
use crate::error::Error;
use serde::{Deserialize, Serialize};

pub(super) const CHALLENGE_API_VERSION: &str = "acme.cert-manager.io/v1alpha1";
pub(super) const CHALLENGE_KIND: &str = "ChallengePayload";

/// The envelope cert-manager `POST`s to a webhook solver, and receives back with `response` set.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

impl ChallengePayload {
    pub(super) fn answer(response: ChallengeResponse) -> Self {
        Self {
            api_version: CHALLENGE_API_VERSION.to_string(),
            kind: CHALLENGE_KIND.to_string(),
            request: None,
            response: Some(response),
        }
    }
}

/// The outcome of one challenge request.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeResponse {
    pub uid: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl ChallengeResponse {
    pub(super) fn success(uid: String) -> Self {
        Self {
            uid,
            success: true,
            status: None,
        }
    }

    pub(super) fn failure(uid: String, err: &Error) -> Self {
        Self {
            uid,
            success: false,
            status: Some(Status {
                status: "Failure".to_string(),
                message: err.to_string(),
                reason: "InternalError".to_string(),
                code: 500,
            }),
        }
    }
}

/// A Kubernetes `metav1.Status` describing a failed challenge.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub status: String,
    pub message: String,
    pub reason: String,
    pub code: u16,
}

/// Discovery document for the webhook's API group version.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(super) struct APIResourceList {
    pub kind: &'static str,
    pub api_version: &'static str,
    pub group_version: String,
    pub resources: Vec<APIResource>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(super) struct APIResource {
    pub name: String,
    pub singular_name: String,
    pub namespaced: bool,
    pub kind: &'static str,
    pub verbs: Vec<&'static str>,
}

impl APIResourceList {
    pub fn for_solver(group: &str, solver: &str) -> Self {
        Self {
            kind: "APIResourceList",
            api_version: "v1",
            group_version: format!("{group}/v1alpha1"),
            resources: vec![APIResource {
                name: solver.to_string(),
                singular_name: solver.to_string(),
                namespaced: false,
                kind: CHALLENGE_KIND,
                verbs: vec!["create"],
            }],
        }
    }
}
