use crate::error::{Result, ScanError};
use url::Url;

/// Turns an href found on `base` into an absolute URL.
///
/// Hrefs that already carry an `http://` or `https://` prefix are returned
/// untouched. Everything else is resolved against the scheme and host of
/// `base`, with `.`/`..` segments and repeated separators collapsed and the
/// fragment dropped.
///
/// Returns `Ok(None)` for hrefs that do not name another page: empty values,
/// fragment-only anchors and non-HTTP schemes such as `mailto:` or
/// `javascript:`.
pub fn resolve(href: &str, base: &str) -> Result<Option<String>> {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return Ok(Some(href.to_string()));
    }

    let base_url =
        Url::parse(base).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base, e)))?;

    if href.is_empty() || href.starts_with('#') || has_foreign_scheme(href) {
        return Ok(None);
    }

    let mut resolved = base_url
        .join(href)
        .map_err(|e| ScanError::InvalidUrl(format!("{} (base {}): {}", href, base, e)))?;
    resolved.set_fragment(None);

    let cleaned = clean_path(resolved.path());
    resolved.set_path(&cleaned);

    Ok(Some(resolved.to_string()))
}

fn has_foreign_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let is_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    is_scheme && !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https")
}

// Keeps a trailing slash, since "/docs/" and "/docs" are different resources.
fn clean_path(path: &str) -> String {
    let trailing_slash = path.len() > 1 && path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = format!("/{}", segments.join("/"));
    if trailing_slash && cleaned.len() > 1 {
        cleaned.push('/');
    }
    cleaned
}
