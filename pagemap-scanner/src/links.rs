//! Link handling for the crawler: pulling `href` values out of markup, deciding
//! whether a value is absolute, and turning it into a candidate page URL.

use crate::error::{Result, ScanError};
use scraper::{Html, Selector};
use url::Url;

/// Prefixes of `href` values that never lead to another page.
const NON_NAVIGABLE_PREFIXES: [&str; 3] = ["#", "mailto:", "javascript:"];

/// Returns the `href` of every `<a>` element in document order.
///
/// Anchors without an `href` attribute yield an empty string so callers see
/// every anchor on the page.
pub fn extract_hrefs(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a").map_err(|e| ScanError::Parse(e.to_string()))?;

    Ok(document
        .select(&selector)
        .map(|element| element.value().attr("href").unwrap_or_default().to_string())
        .collect())
}

/// Parses `link` as a URL that carries both a scheme and a host.
pub fn parse_absolute(link: &str) -> Result<Url> {
    let url = Url::parse(link)?;
    if url.host().is_none() {
        return Err(ScanError::MalformedUrl(url::ParseError::EmptyHost));
    }
    Ok(url)
}

/// True if `link` parses as a URL with a scheme and a host.
///
/// Malformed input is reported as relative, never as an error.
pub fn is_absolute(link: &str) -> bool {
    parse_absolute(link).is_ok()
}

/// Strips every trailing `/` from `url`.
pub fn trim_trailing_slashes(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// False for blank values, in-page fragments and `mailto:`/`javascript:` links.
pub fn is_navigable(href: &str) -> bool {
    !href.trim().is_empty()
        && !NON_NAVIGABLE_PREFIXES
            .iter()
            .any(|prefix| href.starts_with(prefix))
}

/// Turns an `href` found on the page at `base_url` into a candidate page URL.
///
/// Absolute values are kept as they are. Relative values lose one leading `/`
/// and are appended to `base_url`, which must already have its trailing
/// slashes trimmed.
pub fn resolve_candidate(base_url: &str, href: &str) -> String {
    if is_absolute(href) {
        return href.to_string();
    }
    let relative = href.strip_prefix('/').unwrap_or(href);
    format!("{}/{}", base_url, relative)
}

/// Textual prefix test against the trimmed URL of the page being expanded.
pub fn is_in_scope(candidate: &str, base_url: &str) -> bool {
    candidate.starts_with(base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute_with_absolute_url() {
        assert!(is_absolute("https://example.com"));
        assert!(is_absolute("http://example.com:8080/a/b?c=d"));
    }

    #[test]
    fn test_is_absolute_with_relative_url() {
        assert!(!is_absolute("/relative/path"));
        assert!(!is_absolute("about.html"));
        assert!(!is_absolute("//example.com/protocol-relative"));
    }

    #[test]
    fn test_is_absolute_requires_host() {
        assert!(!is_absolute("mailto:test@example.com"));
        assert!(!is_absolute("urn:isbn:0451450523"));
    }

    #[test]
    fn test_is_absolute_malformed_is_false() {
        assert!(!is_absolute("http://exa mple.com"));
        assert!(!is_absolute("https://"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn test_parse_absolute_reports_malformed_url() {
        assert!(matches!(
            parse_absolute("not a url"),
            Err(ScanError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_trim_trailing_slashes() {
        assert_eq!(trim_trailing_slashes("https://example.com/"), "https://example.com");
        assert_eq!(trim_trailing_slashes("https://example.com///"), "https://example.com");
        assert_eq!(trim_trailing_slashes("https://example.com/a"), "https://example.com/a");
    }

    #[test]
    fn test_skip_non_navigable() {
        assert!(!is_navigable(""));
        assert!(!is_navigable("   "));
        assert!(!is_navigable("#section1"));
        assert!(!is_navigable("mailto:test@example.com"));
        assert!(!is_navigable("javascript:void(0)"));
        assert!(is_navigable("/valid.html"));
        assert!(is_navigable("https://example.com/page"));
    }

    #[test]
    fn test_resolve_relative_link() {
        assert_eq!(
            resolve_candidate("https://example.com", "/about.html"),
            "https://example.com/about.html"
        );
        assert_eq!(
            resolve_candidate("https://example.com", "about.html"),
            "https://example.com/about.html"
        );
    }

    #[test]
    fn test_resolve_strips_only_one_leading_slash() {
        assert_eq!(
            resolve_candidate("https://example.com", "//cdn/x"),
            "https://example.com//cdn/x"
        );
    }

    #[test]
    fn test_resolve_absolute_link_unchanged() {
        assert_eq!(
            resolve_candidate("https://example.com", "https://other.com/page.html"),
            "https://other.com/page.html"
        );
    }

    #[test]
    fn test_relative_links_resolve_against_current_page() {
        assert_eq!(
            resolve_candidate("https://example.com/docs", "intro.html"),
            "https://example.com/docs/intro.html"
        );
    }

    #[test]
    fn test_scope_is_a_prefix_match() {
        assert!(is_in_scope("https://example.com/about.html", "https://example.com"));
        assert!(!is_in_scope("https://other.com/page.html", "https://example.com"));
        assert!(!is_in_scope("http://example.com/a", "https://example.com"));
        assert!(is_in_scope("https://example.com.evil.test/", "https://example.com"));
    }

    #[test]
    fn test_extract_hrefs_in_document_order() {
        let html = r##"<html><body>
            <a href="/about.html">About</a>
            <a name="anchor-only">No href</a>
            <a href="#top">Top</a>
            <p><a href="https://example.com/contact.html">Contact</a></p>
        </body></html>"##;

        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(
            hrefs,
            vec![
                "/about.html".to_string(),
                String::new(),
                "#top".to_string(),
                "https://example.com/contact.html".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_hrefs_from_empty_markup() {
        assert!(extract_hrefs("").unwrap().is_empty());
    }
}
