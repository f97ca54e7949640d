//! URL decomposition into a host and positional path segments.
//!
//! URLs are treated as opaque strings, not parsed: the scheme separator is
//! the first `//`, the host runs to the next `/`, and everything after the
//! host is split on `/`. Query strings and fragments stay attached to
//! whichever segment they trail. A string without `//` is decomposed the
//! same way from its first character, so `a.com/x` has host `a.com`.

use crate::config::MAX_DEPTH;

/// Separator between scheme and authority.
const SCHEME_SEPARATOR: &str = "//";

/// Split `url` into (host, remainder). The remainder is empty or starts
/// with `/`.
pub fn split_host(url: &str) -> (&str, &str) {
    let after_scheme = match url.find(SCHEME_SEPARATOR) {
        Some(pos) => &url[pos + SCHEME_SEPARATOR.len()..],
        None => url,
    };
    match after_scheme.find('/') {
        Some(pos) => after_scheme.split_at(pos),
        None => (after_scheme, ""),
    }
}

/// The host component of `url`.
pub fn host(url: &str) -> &str {
    split_host(url).0
}

/// Build the `depth + 1` tuple `(host, seg_1, .., seg_depth)` for `url`.
///
/// Positions past the end of the URL's path are filled with `""`, so every
/// tuple has the same arity regardless of how shallow the URL is. `depth`
/// is clamped to [`MAX_DEPTH`].
pub fn segment_tuple(url: &str, depth: usize) -> Vec<String> {
    let depth = depth.min(MAX_DEPTH);
    let (host, rest) = split_host(url);
    let mut tuple = Vec::with_capacity(depth + 1);
    tuple.push(host.to_string());

    // `rest` is "" or "/a/b..", so position 0 of the split is always empty.
    let mut segments = rest.split('/').skip(1);
    for _ in 0..depth {
        tuple.push(segments.next().unwrap_or("").to_string());
    }
    tuple
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_tuple_caps_depth() {
        let tuple = segment_tuple("https://a.com/x", usize::MAX);
        assert_eq!(tuple.len(), MAX_DEPTH + 1);
        assert_eq!(tuple[1], "x");
        assert!(tuple[2..].iter().all(String::is_empty));
    }

    #[test]
    fn test_split_host() {
        assert_eq!(split_host("https://a.com/x/y"), ("a.com", "/x/y"));
        assert_eq!(split_host("https://a.com"), ("a.com", ""));
        assert_eq!(split_host("http://a.com:8080/"), ("a.com:8080", "/"));
    }

    #[test]
    fn test_malformed_urls_never_fail() {
        assert_eq!(host("a.com/x"), "a.com");
        assert_eq!(host("just-a-word"), "just-a-word");
        assert_eq!(host(""), "");
        assert_eq!(host("/relative/path"), "");
        assert_eq!(segment_tuple("a.com/x", 2), vec!["a.com", "x", ""]);
    }

    #[test]
    fn test_segment_tuple_pads_shallow_urls() {
        assert_eq!(segment_tuple("http://a.com", 2), vec!["a.com", "", ""]);
        assert_eq!(
            segment_tuple("http://a.com/x/y/z", 2),
            vec!["a.com", "x", "y"]
        );
        assert_eq!(segment_tuple("http://a.com/x/", 3), vec!["a.com", "x", "", ""]);
    }

    #[test]
    fn test_depth_zero_is_host_only() {
        assert_eq!(segment_tuple("https://a.com/x/y", 0), vec!["a.com"]);
    }

    #[test]
    fn test_only_first_scheme_separator_counts() {
        assert_eq!(
            segment_tuple("https://a.com/x//y", 3),
            vec!["a.com", "x", "", "y"]
        );
        assert_eq!(
            segment_tuple("https://a.com/redirect?to=https://b.com/q", 1),
            vec!["a.com", "redirect?to=https:"]
        );
    }

    #[test]
    fn test_query_and_fragment_kept_verbatim() {
        assert_eq!(
            segment_tuple("https://a.com/p?id=1#top", 2),
            vec!["a.com", "p?id=1#top", ""]
        );
    }
}
