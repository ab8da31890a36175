//! Request URL composition.

/// Joins endpoint, path prefix and call path with exactly one `/` between each.
///
/// Leading and trailing slashes on any part do not change the result, and an
/// empty prefix is skipped.
///
/// ```
/// use sessionclient_core::join_url;
///
/// assert_eq!(join_url("http://h/", "/rest/", "/foo"), "http://h/rest/foo");
/// assert_eq!(join_url("http://h", "", "foo"), "http://h/foo");
/// ```
#[must_use]
pub fn join_url(endpoint: &str, prefix: &str, path: &str) -> String {
    let mut url = endpoint.trim_end_matches('/').to_string();
    let prefix = prefix.trim_matches('/');
    if !prefix.is_empty() {
        url.push('/');
        url.push_str(prefix);
    }
    url.push('/');
    url.push_str(path.trim_start_matches('/'));
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_is_idempotent_under_slash_variation() {
        for endpoint in ["http://h", "http://h/"] {
            for prefix in ["rest", "/rest/", "rest/"] {
                for path in ["foo", "/foo"] {
                    assert_eq!(
                        join_url(endpoint, prefix, path),
                        "http://h/rest/foo",
                        "endpoint={endpoint:?} prefix={prefix:?} path={path:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_join_url_collapses_repeated_slashes_at_boundaries() {
        assert_eq!(join_url("http://h//", "//rest//", "//foo"), "http://h/rest/foo");
    }

    #[test]
    fn test_join_url_empty_prefix() {
        assert_eq!(join_url("http://h/", "/", "/foo"), "http://h/foo");
    }

    #[test]
    fn test_join_url_keeps_nested_path_and_query() {
        assert_eq!(
            join_url("http://h:8384", "rest", "db/status?folder=a"),
            "http://h:8384/rest/db/status?folder=a"
        );
    }
}
