//! Huawei Cloud DNS-01 webhook
//!
//! A [cert-manager] webhook solver for [RFC-8555][RFC-8555] [DNS-01] challenges, publishing the
//! challenge `TXT` records in [Huawei Cloud DNS].
//!
//! cert-manager drives the ACME protocol, schedules challenges and checks propagation. This
//! webhook only turns its present/clean-up requests into record set calls, authenticated with
//! an access key pair read from Kubernetes `Secret`s.
//!
//! [cert-manager]: https://cert-manager.io/docs/configuration/acme/dns01/webhook/
//! [Huawei Cloud DNS]: https://support.huaweicloud.com/intl/en-us/api-dns/dns_api_64001.html
//! [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
//! [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod challenge;
pub mod config;
pub mod dns;
pub mod error;
pub mod name;
pub mod secrets;
pub mod solver;

pub use api::new as new_http;
pub use challenge::{ChallengeAction, ChallengeRequest};
pub use config::{Config, KubeConfig, SharedConfig};
pub use solver::{DynSolver, HuaweiSolver, Solver};
