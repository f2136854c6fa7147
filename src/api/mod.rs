//! HTTP API cert-manager calls to solve DNS-01 challenges.
//!
//! cert-manager reaches webhook solvers through the Kubernetes API aggregation layer, as the
//! `ChallengePayload` resource of the API group named by `GROUP_NAME`.
//!
//! # API Endpoints
//!
//! ## `/healthz` (GET)
//!
//!   Returns HTTP 200 (OK) and the JSON body `{"ok":"healthy"}` when the service is operational.
//!
//! ## `/apis/{group}/v1alpha1` (GET)
//!
//!   Returns the `APIResourceList` discovery document, naming the solver as the single
//!   resource of the group version.
//!
//! ## `/apis/{group}/v1alpha1/{solver}` (POST)
//!
//!   Expects a JSON request body of the form:
//!
//!   ```json
//!   {
//!     "apiVersion": "acme.cert-manager.io/v1alpha1",
//!     "kind": "ChallengePayload",
//!     "request": {
//!       "uid": "2b1c6d0e-...",
//!       "action": "Present",
//!       "type": "dns-01",
//!       "dnsName": "example.com",
//!       "key": "LPsIwTo7o8BoG0-vjCyGQGBWSVIPxI-i_X336eUOQZo",
//!       "resourceNamespace": "cert-manager",
//!       "resolvedFQDN": "_acme-challenge.example.com.",
//!       "resolvedZone": "example.com.",
//!       "allowAmbientCredentials": false,
//!       "config": { "region": "cn-north-4", "zoneID": "...", ... }
//!     }
//!   }
//!   ```
//!
//!  `action` is either `Present` or `CleanUp`. The solver's outcome is returned in-band with
//!  HTTP 200 (OK):
//!
//!  ```json
//!  {
//!    "apiVersion": "acme.cert-manager.io/v1alpha1",
//!    "kind": "ChallengePayload",
//!    "response": { "uid": "2b1c6d0e-...", "success": true }
//!  }
//!  ```
//!
//!  On failure `success` is `false` and `status` carries a Kubernetes `Status` whose `message`
//!  is the solver error. cert-manager retries failed challenges itself.
//!
//!  Requests for another group or solver name return HTTP 404, payloads without a `request`
//!  HTTP 400.

mod api_error;
pub mod model;
mod routes;
pub mod server;

pub use server::{new, router};
