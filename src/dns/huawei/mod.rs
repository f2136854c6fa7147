//! Huawei Cloud DNS implementation of the [`RecordClient`][super::RecordClient] trait.
//!
//! Talks to the DNS v2 REST API, authenticating every call with an access key pair through
//! `SDK-HMAC-SHA256` request signing.
//!
//! `TXT` values are stored quoted on the provider side (`abc` becomes `"abc"`). The client quotes
//! values on the way out and unquotes them in returned [`TxtRecord`]s, so callers only deal in
//! plain values.

mod model;
mod sign;

use crate::dns::{ClientFactory, Credentials, DynRecordClient, RecordClient, TxtRecord};
use crate::error::Error;
use crate::name::extract_record_name;
use model::{
    quote_txt, CreateRecordSetRequest, ErrorResponse, ListRecordSetsResponse, RECORD_TYPE_TXT,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use std::sync::Arc;
use std::time::Duration;

/// Global Huawei Cloud DNS endpoint, used when no region is configured.
pub const GLOBAL_ENDPOINT: &str = "https://dns.myhuaweicloud.com";

/// Maximum page size accepted by the record set list API.
pub(crate) const MAX_PAGE_SIZE: usize = 500;

/// Upper bound on the pages a single lookup walks through.
pub(crate) const MAX_PAGES: usize = 20;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the DNS endpoint for a Huawei Cloud region, e.g. `cn-north-4`.
#[must_use]
pub fn regional_endpoint(region: &str) -> String {
    if region.is_empty() {
        GLOBAL_ENDPOINT.to_string()
    } else {
        format!("https://dns.{region}.myhuaweicloud.com")
    }
}

/// A Huawei Cloud DNS client authenticated with one access key pair.
///
/// ```rust,no_run
/// use huawei_dns01_webhook::dns::{Credentials, HuaweiClient};
///
/// let client = HuaweiClient::builder(Credentials {
///     access_key: "your-access-key".to_string(),
///     secret_key: "your-secret-key".to_string(),
/// })
/// .region("cn-north-4")
/// .build()?;
/// # Ok::<(), huawei_dns01_webhook::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct HuaweiClient {
    http: Client,
    credentials: Credentials,
    endpoint: Url,
    host: String,
}

/// Builder for [`HuaweiClient`].
#[derive(Debug)]
pub struct HuaweiClientBuilder {
    credentials: Credentials,
    endpoint: String,
}

impl HuaweiClientBuilder {
    /// Use the DNS endpoint of `region`.
    #[must_use]
    pub fn region(mut self, region: &str) -> Self {
        self.endpoint = regional_endpoint(region);
        self
    }

    /// Use an explicit endpoint base URL instead of a regional one.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the [`HuaweiClient`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the endpoint isn't an absolute URL with a host, and
    /// [`Error::Http`] if the HTTP client can't be constructed.
    pub fn build(self) -> Result<HuaweiClient, Error> {
        let endpoint = Url::parse(self.endpoint.trim_end_matches('/'))
            .map_err(|_| Error::InvalidEndpoint(self.endpoint.clone()))?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(Error::InvalidEndpoint(self.endpoint)),
        };
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(HuaweiClient {
            http,
            credentials: self.credentials,
            endpoint,
            host,
        })
    }
}

impl HuaweiClient {
    /// Returns a builder targeting the global endpoint.
    #[must_use]
    pub fn builder(credentials: Credentials) -> HuaweiClientBuilder {
        HuaweiClientBuilder {
            credentials,
            endpoint: GLOBAL_ENDPOINT.to_string(),
        }
    }

    /// The endpoint base URL this client sends requests to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, path: &str, query: &str) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        if query.is_empty() {
            format!("{base}{path}")
        } else {
            format!("{base}{path}?{query}")
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &str,
        body: Option<String>,
    ) -> Result<String, Error> {
        let timestamp = sign::sdk_date()?;
        let mut headers = vec![
            ("Host".to_string(), self.host.clone()),
            ("X-Sdk-Date".to_string(), timestamp.clone()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        let payload = body.as_deref().unwrap_or_default();

        let (canonical, signed_headers) =
            sign::canonical_request(method.as_str(), path, query, &headers, payload);
        tracing::trace!("canonical request:\n{canonical}");
        let authorization = sign::authorization(
            &self.credentials.access_key,
            &self.credentials.secret_key,
            &canonical,
            &signed_headers,
            &timestamp,
        )?;

        let url = self.url(path, query);
        tracing::debug!("{method} {url}");
        let mut request = self
            .http
            .request(method, &url)
            .header("X-Sdk-Date", &timestamp)
            .header(AUTHORIZATION, authorization);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(text);
        }
        Err(provider_error(status.as_u16(), &text))
    }

    async fn list_txt_page(
        &self,
        name: &str,
        wire_value: &str,
        offset: usize,
    ) -> Result<ListRecordSetsResponse, Error> {
        let query = format!(
            "limit={MAX_PAGE_SIZE}&name={}&offset={offset}&records={}&type={RECORD_TYPE_TXT}",
            urlencoding::encode(name),
            urlencoding::encode(wire_value),
        );
        let text = self.send(Method::GET, "/v2/recordsets", &query, None).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn provider_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(ErrorResponse::into_parts)
    {
        Some((code, message)) => Error::Provider {
            status,
            code,
            message,
        },
        None => Error::Provider {
            status,
            code: String::new(),
            message: body.to_string(),
        },
    }
}

#[async_trait::async_trait]
impl RecordClient for HuaweiClient {
    async fn create_txt(&self, name: &str, zone_id: &str, value: &str) -> Result<(), Error> {
        let body = serde_json::to_string(&CreateRecordSetRequest {
            name,
            record_type: RECORD_TYPE_TXT,
            records: vec![quote_txt(value)],
        })?;
        let path = format!("/v2/zones/{}/recordsets", urlencoding::encode(zone_id));
        self.send(Method::POST, &path, "", Some(body)).await?;
        Ok(())
    }

    async fn find_txt(&self, fqdn: &str, zone: &str, value: &str) -> Result<TxtRecord, Error> {
        let name = extract_record_name(fqdn, zone);
        let wire_value = quote_txt(value);

        let mut offset = 0;
        for _ in 0..MAX_PAGES {
            let page = self.list_txt_page(&name, &wire_value, offset).await?;
            let total = page.metadata.and_then(|m| m.total_count);
            let recordsets = page.recordsets.unwrap_or_default();
            if recordsets.is_empty() {
                return Err(Error::RecordNotFound(name));
            }
            let page_len = recordsets.len();
            if let Some(found) = recordsets.into_iter().find(|rs| rs.has_value(&wire_value)) {
                return Ok(found.into());
            }
            offset += page_len;
            let more = match total {
                Some(total) => offset < total,
                None => page_len >= MAX_PAGE_SIZE,
            };
            if !more {
                return Err(Error::RecordNotFound(name));
            }
        }

        tracing::warn!("gave up looking for TXT record {name} after {MAX_PAGES} pages");
        Err(Error::RecordNotFound(name))
    }

    async fn delete_txt(&self, record_set_id: &str, zone_id: &str) -> Result<(), Error> {
        let path = format!(
            "/v2/zones/{}/recordsets/{}",
            urlencoding::encode(zone_id),
            urlencoding::encode(record_set_id)
        );
        self.send(Method::DELETE, &path, "", None)
            .await
            .map_err(|err| Error::DeleteRecord(Box::new(err)))?;
        Ok(())
    }
}

/// Builds [`HuaweiClient`]s for the regional endpoint of each configured region.
#[derive(Debug, Default, Clone)]
pub struct HuaweiClientFactory {
    endpoint: Option<String>,
}

impl HuaweiClientFactory {
    /// A factory whose clients all use `endpoint`, regardless of region.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
        }
    }
}

impl ClientFactory for HuaweiClientFactory {
    fn build(&self, credentials: Credentials, region: &str) -> Result<DynRecordClient, Error> {
        let builder = HuaweiClient::builder(credentials);
        let builder = match &self.endpoint {
            Some(endpoint) => builder.endpoint(endpoint.clone()),
            None => builder.region(region),
        };
        let client = builder.build()?;
        tracing::debug!("built DNS client for {}", client.endpoint());
        Ok(Arc::new(client))
    }
}
