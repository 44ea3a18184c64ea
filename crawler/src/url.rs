//! URL resolution for crawling (spec §4.12). A deliberately small subset of RFC 3986: schema
//! references are either absolute HTTP(S) URLs, absolute local paths, or relative paths to be
//! merged against the directory of the referencing document.

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/')
}

/// Splits a URL into its `scheme://authority` prefix and path. Local paths (no recognized
/// scheme) have an empty authority and the whole string as path.
fn split_authority(url: &str) -> (&str, &str) {
    for scheme in ["https://", "http://"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            return match rest.find('/') {
                Some(pos) => (&url[..scheme.len() + pos], &url[scheme.len() + pos..]),
                None => (url, "/"),
            };
        }
    }
    ("", url)
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos + 1],
        None => "",
    }
}

/// Collapses `.` and `..` path components at `/` boundaries. Leading `..` beyond the root is
/// simply dropped, matching the original's stack-pop-on-empty behavior.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            ".." => {
                parts.pop();
            }
            "." | "" => {}
            other => parts.push(other),
        }
    }
    let mut result = String::new();
    if path.starts_with('/') {
        result.push('/');
    }
    result.push_str(&parts.join("/"));
    result
}

/// Resolves `relative` against `base_url` (spec §4.12). Absolute URLs and absolute local paths
/// (`/...`) are returned unchanged.
pub fn resolve_url(base_url: &str, relative: &str) -> String {
    if is_absolute(relative) {
        return relative.to_string();
    }
    let (authority, base_path) = split_authority(base_url);
    let combined = format!("{}{}", parent(base_path), relative);
    format!("{authority}{}", normalize(&combined))
}

/// The path portion of a URL, after its `scheme://authority` prefix if any.
pub fn path_of(url: &str) -> &str {
    split_authority(url).1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_resolves_against_the_base_directory() {
        let resolved = resolve_url("http://example.com/schemas/root.xsd", "common/types.xsd");
        assert_eq!(resolved, "http://example.com/schemas/common/types.xsd");
    }

    #[test]
    fn dot_dot_walks_up_a_directory() {
        let resolved = resolve_url("http://example.com/schemas/v2/root.xsd", "../v1/types.xsd");
        assert_eq!(resolved, "http://example.com/schemas/v1/types.xsd");
    }

    #[test]
    fn absolute_url_bypasses_the_base_entirely() {
        let resolved = resolve_url("http://example.com/a.xsd", "https://other.org/b.xsd");
        assert_eq!(resolved, "https://other.org/b.xsd");
    }

    #[test]
    fn root_relative_path_is_returned_as_is() {
        // A leading `/` is treated as already-absolute, same as a full URL: the transport
        // decides what it means, this module doesn't graft an authority onto it.
        let resolved = resolve_url("http://example.com/a/b/root.xsd", "/shared/types.xsd");
        assert_eq!(resolved, "/shared/types.xsd");
    }

    #[test]
    fn local_path_base_merges_without_an_authority() {
        let resolved = resolve_url("schemas/root.xsd", "types.xsd");
        assert_eq!(resolved, "schemas/types.xsd");
    }
}
