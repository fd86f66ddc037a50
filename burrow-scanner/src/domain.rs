use tracing::debug;
use url::Url;

/// Coarse "same site" check used to keep a crawl on one domain.
///
/// Both hosts are reduced to their [`domain_key`] and compared. A URL without
/// a host has the empty key, like a single-label host. Unparseable URLs never
/// match.
pub fn same_site(a: &str, b: &str) -> bool {
    match (host_key(a), host_key(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Last two labels of `host` after stripping a leading `www.`.
///
/// This does not know about multi-label public suffixes, so
/// `blog.example.co.uk` reduces to `co.uk`. Hosts with fewer than two labels
/// (e.g. `localhost`) reduce to the empty string.
pub fn domain_key(host: &str) -> String {
    let host = host.strip_prefix("www.").unwrap_or(host);
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return String::new();
    }
    labels[labels.len() - 2..].join(".")
}

fn host_key(url: &str) -> Option<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Cannot compare domain of {}: {}", url, e);
            return None;
        }
    };

    let host = parsed.host_str().unwrap_or_default();
    if host.is_empty() {
        debug!("URL has no host: {}", url);
    }
    Some(domain_key(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_www_prefix_is_ignored() {
        assert!(same_site("http://www.example.com/a", "http://example.com/b"));
    }

    #[test]
    fn test_sibling_subdomains_match() {
        assert!(same_site("http://blog.example.com", "http://shop.example.com"));
    }

    #[test]
    fn test_different_tld_does_not_match() {
        assert!(!same_site("http://example.com", "http://example.org"));
    }

    #[test]
    fn test_scheme_and_port_are_ignored() {
        assert!(same_site("https://example.com:8443/x", "http://example.com/"));
    }

    #[test]
    fn test_multi_label_suffix_is_collapsed() {
        assert_eq!(domain_key("blog.example.co.uk"), "co.uk");
        assert!(same_site("http://a.co.uk", "http://b.co.uk"));
    }

    #[test]
    fn test_single_label_hosts_have_empty_key() {
        assert_eq!(domain_key("localhost"), "");
        assert_eq!(domain_key("www.localhost"), "");
        // Two degenerate keys are equal to each other
        assert!(same_site("http://localhost/", "http://intranet:8080/"));
        assert!(!same_site("http://localhost/", "http://example.com/"));
    }

    #[test]
    fn test_ip_hosts_use_last_two_octets() {
        assert_eq!(domain_key("127.0.0.1"), "0.1");
        assert!(same_site("http://127.0.0.1:3000/", "http://127.0.0.1:4000/a"));
    }

    #[test]
    fn test_unparseable_urls_never_match() {
        assert!(!same_site("not a url", "http://example.com"));
        assert!(!same_site("http://example.com", "::"));
        assert!(!same_site("", ""));
    }

    #[test]
    fn test_hostless_urls_share_the_empty_key() {
        assert!(same_site("mailto:a@example.com", "mailto:b@example.com"));
        assert!(same_site("file:///etc/hosts", "http://localhost/"));
        assert!(!same_site("mailto:a@example.com", "http://example.com/"));
    }

    #[test]
    fn test_only_leading_www_is_stripped() {
        assert_eq!(domain_key("www.example.com"), "example.com");
        assert_eq!(domain_key("wwwexample.com"), "wwwexample.com");
        assert_eq!(domain_key("a.www.example.com"), "example.com");
    }
}
