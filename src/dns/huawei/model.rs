//! Huawei Cloud DNS v2 request and response bodies.

use crate::dns::TxtRecord;
use serde::{Deserialize, Serialize};

pub(super) const RECORD_TYPE_TXT: &str = "TXT";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub(super) struct CreateRecordSetRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub records: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
pub(super) struct ListRecordSetsResponse {
    pub recordsets: Option<Vec<RecordSet>>,
    pub metadata: Option<ListMetadata>,
}

#[derive(Deserialize, Debug, Default)]
pub(super) struct ListMetadata {
    pub total_count: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub(super) struct RecordSet {
    pub id: String,
    #[serde(default)]
    pub zone_id: String,
    #[serde(default)]
    pub name: String,
    pub records: Option<Vec<String>>,
}

impl RecordSet {
    pub fn has_value(&self, wire_value: &str) -> bool {
        self.records
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|v| v == wire_value)
    }
}

impl From<RecordSet> for TxtRecord {
    fn from(rs: RecordSet) -> Self {
        TxtRecord {
            id: rs.id,
            zone_id: rs.zone_id,
            name: rs.name,
            records: rs
                .records
                .unwrap_or_default()
                .iter()
                .map(|v| unquote_txt(v))
                .collect(),
        }
    }
}

/// Error body of a failed call. The DNS service answers with `code`/`message`, the API gateway
/// with `error_code`/`error_msg`.
#[derive(Deserialize, Debug, Default)]
pub(super) struct ErrorResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    pub error_code: Option<String>,
    pub error_msg: Option<String>,
}

impl ErrorResponse {
    pub fn into_parts(self) -> Option<(String, String)> {
        let code = self.code.or(self.error_code)?;
        Some((code, self.message.or(self.error_msg).unwrap_or_default()))
    }
}

/// Quotes a TXT value the way Huawei Cloud stores it.
pub(super) fn quote_txt(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Reverses [`quote_txt`]. Unquoted values are returned unchanged.
pub(super) fn unquote_txt(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => out.extend(chars.next()),
                    _ => out.push(c),
                }
            }
            out
        }
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting() {
        assert_eq!(quote_txt("abc123"), "\"abc123\"");
        assert_eq!(quote_txt(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(unquote_txt(r#""a\"b\\c""#), r#"a"b\c"#);
        assert_eq!(unquote_txt("bare"), "bare");
    }

    #[test]
    fn record_set_into_txt_record() {
        let rs: RecordSet = serde_json::from_value(serde_json::json!({
            "id": "rs-1",
            "zone_id": "zone-1",
            "name": "_acme-challenge.example.com.",
            "type": "TXT",
            "records": ["\"abc123\""],
            "ttl": 300
        }))
        .unwrap();
        assert!(rs.has_value("\"abc123\""));
        assert!(!rs.has_value("abc123"));

        let record = TxtRecord::from(rs);
        assert_eq!(record.id, "rs-1");
        assert_eq!(record.zone_id, "zone-1");
        assert_eq!(record.records, vec!["abc123".to_string()]);
    }

    #[test]
    fn error_response_variants() {
        let dns: ErrorResponse =
            serde_json::from_str(r#"{"code":"DNS.0302","message":"zone not found"}"#).unwrap();
        assert_eq!(
            dns.into_parts(),
            Some(("DNS.0302".to_string(), "zone not found".to_string()))
        );

        let gateway: ErrorResponse =
            serde_json::from_str(r#"{"error_code":"APIGW.0301","error_msg":"bad auth"}"#).unwrap();
        assert_eq!(
            gateway.into_parts(),
            Some(("APIGW.0301".to_string(), "bad auth".to_string()))
        );

        assert_eq!(ErrorResponse::default().into_parts(), None);
    }
}
