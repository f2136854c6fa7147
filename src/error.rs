//! Error types.

/// Error enumerates the possible webhook error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned at startup when the `GROUP_NAME` environment variable is unset or empty. The
    /// webhook API group must match the `groupName` configured on the cert-manager issuer, so
    /// the process refuses to start without it.
    #[error("GROUP_NAME must be specified")]
    MissingGroupName,

    /// Returned when the per-challenge solver configuration blob isn't a valid
    /// [`SolverConfig`][`crate::solver::SolverConfig`].
    #[error("error decoding solver config: {0}")]
    InvalidSolverConfig(#[source] serde_json::Error),

    /// Returned when the secret store has no secret with the requested name in the challenge
    /// namespace.
    #[error("failed to load secret \"{secret}\": not found")]
    SecretNotFound { secret: String },

    /// Returned when the secret store couldn't be queried for a secret.
    #[error("failed to load secret \"{secret}\": {source}")]
    SecretLoad {
        secret: String,
        #[source]
        source: reqwest::Error,
    },

    /// Returned when a secret exists but doesn't contain the selected key.
    #[error("no key \"{key}\" in secret \"{secret}\"")]
    SecretKeyNotFound { key: String, secret: String },

    /// Returned when a secret value isn't valid base64.
    #[error("invalid data in secret \"{secret}\": {source}")]
    SecretDecode {
        secret: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Returned when the in-cluster Kubernetes API configuration can't be assembled, e.g. the
    /// service host environment is missing or the service account CA bundle is unreadable.
    #[error("invalid kubernetes client configuration: {0}")]
    InvalidKubeConfig(String),

    /// Returned when only one of the serving certificate and private key files is configured.
    #[error("tls_cert_file and tls_key_file must be set together")]
    IncompleteTlsConfig,

    /// Returned when a Huawei Cloud DNS endpoint URL can't be parsed.
    #[error("invalid DNS API endpoint \"{0}\"")]
    InvalidEndpoint(String),

    /// Returned when Huawei Cloud DNS answers with a non-success status.
    #[error("huawei cloud DNS error (HTTP {status}) {code}: {message}")]
    Provider {
        status: u16,
        code: String,
        message: String,
    },

    /// Returned when a request to a remote API fails at the transport level, or its response
    /// body can't be decoded.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Returned when a request signature can't be computed.
    #[error("failed to sign request")]
    Signing,

    /// Returned by clean-up when no TXT record set carries the challenge key.
    #[error("cannot find TXT record for {0}")]
    RecordNotFound(String),

    /// Wraps a provider error raised while deleting a TXT record set.
    #[error("failed to delete TXT record: {0}")]
    DeleteRecord(#[source] Box<Error>),

    /// Returned when the solver is asked to present or clean up before
    /// [`Solver::initialize`][`crate::solver::Solver::initialize`] has configured a secret store.
    #[error("solver has not been initialized")]
    NotInitialized,

    /// Returned when a webhook request addresses an API group this process doesn't serve.
    #[error("API group \"{0}\" is not served")]
    UnknownGroup(String),

    /// Returned when a webhook request addresses a solver this process doesn't serve.
    #[error("no solver \"{solver}\" in API group \"{group}\"")]
    UnknownSolver { group: String, solver: String },

    /// Returned when a `ChallengePayload` arrives without a `request`.
    #[error("challenge payload has no request")]
    MissingChallengeRequest,

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred: {0}")]
    IO(#[from] std::io::Error),

    /// Returned when processing JSON from disk (e.g. when
    /// [trying to load a `Config`][crate::config::Config::try_from_file]) fails due to invalid
    /// JSON content.
    #[error("invalid JSON: {0}")]
    InvalidJSON(#[from] serde_json::Error),
}
