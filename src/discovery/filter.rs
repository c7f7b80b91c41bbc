use regex::Regex;

use crate::core::constants::http::DEFAULT_SCHEME;

/// Remove static assets from a raw archive listing.
///
/// A URL is dropped when its lowercased form ends with any suffix in
/// `excluded_extensions` (which must already be lowercase). Relative order of
/// the remaining URLs is preserved.
pub fn filter_urls<S: AsRef<str>>(urls: Vec<String>, excluded_extensions: &[S]) -> Vec<String> {
    urls.into_iter()
        .filter(|url| !has_excluded_extension(url, excluded_extensions))
        .collect()
}

/// Drop URLs matching any user supplied exclude pattern.
pub fn apply_exclude_patterns(urls: Vec<String>, patterns: &[Regex]) -> Vec<String> {
    if patterns.is_empty() {
        return urls;
    }

    urls.into_iter()
        .filter(|url| !patterns.iter().any(|pattern| pattern.is_match(url)))
        .collect()
}

pub fn has_excluded_extension<S: AsRef<str>>(url: &str, excluded_extensions: &[S]) -> bool {
    let lowered = url.to_lowercase();
    excluded_extensions
        .iter()
        .any(|ext| lowered.ends_with(ext.as_ref()))
}

/// Prefix `http://` when the URL carries no http(s) scheme.
///
/// Scheme-relative URLs (`//host/path`) get the scheme without a second `//`.
///
/// # Examples
/// ```
/// use wayprobe::discovery::normalize_target;
///
/// assert_eq!(normalize_target("example.com/c"), "http://example.com/c");
/// assert_eq!(normalize_target("https://example.com"), "https://example.com");
/// ```
pub fn normalize_target(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("{DEFAULT_SCHEME}{rest}")
    } else {
        format!("{DEFAULT_SCHEME}{url}")
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::core::constants::filters::EXCLUDED_EXTENSIONS;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_urls__removes_static_assets() {
        let input = urls(&[
            "http://example.com/a.png",
            "http://example.com/b",
            "example.com/c.css",
        ]);

        let actual = filter_urls(input, &EXCLUDED_EXTENSIONS);

        assert_eq!(actual, urls(&["http://example.com/b"]));
    }

    #[test]
    fn test_filter_urls__case_insensitive() {
        let input = urls(&[
            "http://example.com/LOGO.PNG",
            "http://example.com/font.WoFf2",
            "http://example.com/login.php",
        ]);

        let actual = filter_urls(input, &EXCLUDED_EXTENSIONS);

        assert_eq!(actual, urls(&["http://example.com/login.php"]));
    }

    #[test]
    fn test_filter_urls__only_suffix_matches() {
        // ".css" inside the path or followed by a query string is kept
        let input = urls(&[
            "http://example.com/css/site",
            "http://example.com/style.css?v=1",
            "http://example.com/image.jpg.bak",
        ]);

        let actual = filter_urls(input.clone(), &EXCLUDED_EXTENSIONS);

        assert_eq!(actual, input);
    }

    #[test]
    fn test_filter_urls__preserves_order() {
        let input = urls(&[
            "http://example.com/3",
            "http://example.com/x.gif",
            "http://example.com/1",
            "http://example.com/2",
        ]);

        let actual = filter_urls(input, &EXCLUDED_EXTENSIONS);

        assert_eq!(
            actual,
            urls(&[
                "http://example.com/3",
                "http://example.com/1",
                "http://example.com/2"
            ])
        );
    }

    #[test]
    fn test_filter_urls__empty_input() {
        let actual = filter_urls(Vec::new(), &EXCLUDED_EXTENSIONS);
        assert!(actual.is_empty());
    }

    #[test]
    fn test_filter_urls__keeps_duplicates() {
        let input = urls(&["http://example.com/a", "http://example.com/a"]);
        assert_eq!(filter_urls(input, &EXCLUDED_EXTENSIONS).len(), 2);
    }

    #[test]
    fn test_apply_exclude_patterns() {
        let patterns = vec![Regex::new(r"\.js$").unwrap()];
        let input = urls(&["http://example.com/app.js", "http://example.com/admin"]);

        let actual = apply_exclude_patterns(input, &patterns);

        assert_eq!(actual, urls(&["http://example.com/admin"]));
    }

    #[test]
    fn test_apply_exclude_patterns__no_patterns() {
        let input = urls(&["http://example.com/app.js"]);
        assert_eq!(apply_exclude_patterns(input.clone(), &[]), input);
    }

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("example.com/c"), "http://example.com/c");
        assert_eq!(
            normalize_target("http://example.com/a"),
            "http://example.com/a"
        );
        assert_eq!(
            normalize_target("https://example.com/a"),
            "https://example.com/a"
        );
        assert_eq!(normalize_target("//example.com/x"), "http://example.com/x");
    }
}
