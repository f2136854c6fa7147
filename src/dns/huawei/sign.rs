//! Huawei Cloud `SDK-HMAC-SHA256` request signing.
//!
//! See <https://support.huaweicloud.com/devg-apisign/api-sign-algorithm-005.html>.

use crate::error::Error;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

type HmacSha256 = Hmac<Sha256>;

pub(super) const ALGORITHM: &str = "SDK-HMAC-SHA256";

const SDK_DATE_FORMAT: &[FormatItem<'_>] =
    format_description!("[year][month][day]T[hour][minute][second]Z");

/// Returns the current UTC time formatted for the `X-Sdk-Date` header.
pub(super) fn sdk_date() -> Result<String, Error> {
    OffsetDateTime::now_utc()
        .format(SDK_DATE_FORMAT)
        .map_err(|_| Error::Signing)
}

/// Builds the canonical request and the `;`-joined list of signed header names.
pub(super) fn canonical_request(
    method: &str,
    path: &str,
    query: &str,
    headers: &[(String, String)],
    payload: &str,
) -> (String, String) {
    let canonical_uri = if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    };

    let canonical_query = if query.is_empty() {
        String::new()
    } else {
        let mut params: Vec<&str> = query.split('&').collect();
        params.sort_unstable();
        params.join("&")
    };

    let mut sorted: Vec<(String, &str)> = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.trim()))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical_headers: String = sorted.iter().map(|(k, v)| format!("{k}:{v}\n")).collect();
    let signed_headers = sorted
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let hashed_payload = hex::encode(Sha256::digest(payload.as_bytes()));
    (
        format!(
            "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}"
        ),
        signed_headers,
    )
}

/// Computes the `Authorization` header value for a request.
pub(super) fn authorization(
    access_key: &str,
    secret_key: &str,
    canonical_request: &str,
    signed_headers: &str,
    timestamp: &str,
) -> Result<String, Error> {
    let hashed_canonical = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    let string_to_sign = format!("{ALGORITHM}\n{timestamp}\n{hashed_canonical}");

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes()).map_err(|_| Error::Signing)?;
    mac.update(string_to_sign.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!(
        "{ALGORITHM} Access={access_key}, SignedHeaders={signed_headers}, Signature={signature}"
    ))
}
