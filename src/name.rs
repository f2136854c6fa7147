//! Record name handling.

/// Returns the zone-relative record set name for `fqdn` within `zone`.
///
/// One trailing dot is stripped from `fqdn` first. The name is cut at the first occurrence of
/// `"." + zone`; when the zone doesn't occur the whole de-dotted name is returned.
///
/// The zone is matched verbatim, so a zone carrying a trailing dot never matches a de-dotted
/// FQDN.
///
/// ```
/// use huawei_dns01_webhook::name::extract_record_name;
///
/// assert_eq!(
///     extract_record_name("_acme-challenge.example.com.", "example.com"),
///     "_acme-challenge"
/// );
/// ```
#[must_use]
pub fn extract_record_name(fqdn: &str, zone: &str) -> String {
    let name = fqdn.strip_suffix('.').unwrap_or(fqdn);
    match name.find(&format!(".{zone}")) {
        Some(idx) => name[..idx].to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::extract_record_name;

    #[test]
    fn strips_zone_and_trailing_dot() {
        assert_eq!(
            extract_record_name("_acme-challenge.example.com.", "example.com"),
            "_acme-challenge"
        );
        assert_eq!(
            extract_record_name("_acme-challenge.www.example.com.", "example.com"),
            "_acme-challenge.www"
        );
    }

    #[test]
    fn undotted_fqdn_behaves_the_same() {
        assert_eq!(
            extract_record_name("_acme-challenge.example.com", "example.com"),
            extract_record_name("_acme-challenge.example.com.", "example.com"),
        );
    }

    #[test]
    fn only_one_trailing_dot_is_stripped() {
        assert_eq!(extract_record_name("foo.bar..", "baz"), "foo.bar.");
    }

    #[test]
    fn unrelated_zone_returns_whole_name() {
        assert_eq!(
            extract_record_name("_acme-challenge.example.org.", "example.com"),
            "_acme-challenge.example.org"
        );
    }

    #[test]
    fn dotted_zone_does_not_match() {
        assert_eq!(
            extract_record_name("_acme-challenge.example.com.", "example.com."),
            "_acme-challenge.example.com"
        );
    }

    #[test]
    fn cuts_at_first_occurrence() {
        assert_eq!(
            extract_record_name("a.example.com.example.com.", "example.com"),
            "a"
        );
    }
}
