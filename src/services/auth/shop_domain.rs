//! Shop host normalization for the `iss` / `dest` binding check.
//!
//! Both helpers do plain string surgery (no URL parsing) so that the comparison stays
//! exactly as strict as the platform's own tooling:
//! - lower-case, then strip one leading `https://` and one leading `http://`
//! - `dest`: drop a single trailing `/`
//! - `iss`: keep only what precedes the first `/` (e.g. the `/admin` suffix goes away)

/// Normalize the `dest` claim into a bare shop host.
///
/// Returns `None` when nothing is left after normalization.
pub fn destination_host(dest: &str) -> Option<String> {
    let lowered = dest.trim().to_lowercase();
    let host = strip_scheme(&lowered);
    let host = host.strip_suffix('/').unwrap_or(host);

    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

/// Normalize the `iss` claim into a bare shop host.
///
/// Returns `None` when nothing is left after normalization.
pub fn issuer_host(iss: &str) -> Option<String> {
    let lowered = iss.trim().to_lowercase();
    let host = strip_scheme(&lowered)
        .split('/')
        .next()
        .unwrap_or_default();

    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

fn strip_scheme(s: &str) -> &str {
    let s = s.strip_prefix("https://").unwrap_or(s);
    s.strip_prefix("http://").unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_strips_scheme_and_one_trailing_slash() {
        assert_eq!(
            destination_host("https://test-shop.myshopify.com/").as_deref(),
            Some("test-shop.myshopify.com")
        );
        assert_eq!(
            destination_host("http://test-shop.myshopify.com").as_deref(),
            Some("test-shop.myshopify.com")
        );
        // only one slash is removed
        assert_eq!(
            destination_host("https://shop.example//").as_deref(),
            Some("shop.example/")
        );
    }

    #[test]
    fn destination_is_case_insensitive_and_trimmed() {
        assert_eq!(
            destination_host("  HTTPS://Shop.Example  ").as_deref(),
            Some("shop.example")
        );
    }

    #[test]
    fn destination_empty_after_normalization() {
        assert_eq!(destination_host(""), None);
        assert_eq!(destination_host("https://"), None);
        assert_eq!(destination_host("https:///"), None);
    }

    #[test]
    fn issuer_keeps_first_path_segment_only() {
        assert_eq!(
            issuer_host("https://test-shop.myshopify.com/admin").as_deref(),
            Some("test-shop.myshopify.com")
        );
        assert_eq!(
            issuer_host("https://shop.example/admin/extra?x=1").as_deref(),
            Some("shop.example")
        );
        assert_eq!(issuer_host("shop.example").as_deref(), Some("shop.example"));
    }

    #[test]
    fn issuer_empty_after_normalization() {
        assert_eq!(issuer_host("https:///admin"), None);
        assert_eq!(issuer_host("   "), None);
    }
}
