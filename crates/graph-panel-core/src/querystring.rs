//! Query-string surgery on graph image URLs.
//!
//! Everything here works on the raw string. There is no URI parsing and no
//! percent-encoding: keys and values are expected to be plain tokens
//! (digits, `0`/`1`, enumerated option values). A value containing `&` or
//! `=` produces an ambiguous query and is not supported.

/// Splits a URL into `(base, query, fragment)`.
///
/// `query` excludes the leading `?`; `fragment` keeps its leading `#` so it
/// can be reattached verbatim.
fn split(url: &str) -> (&str, &str, &str) {
    let (head, fragment) = match url.find('#') {
        Some(index) => url.split_at(index),
        None => (url, ""),
    };
    match head.split_once('?') {
        Some((base, query)) => (base, query, fragment),
        None => (head, "", fragment),
    }
}

/// Key part of a `key=value` segment (the whole segment when there is no `=`).
fn segment_key(segment: &str) -> &str {
    segment.split_once('=').map_or(segment, |(key, _)| key)
}

/// Non-empty segments of `query` whose key is not `key`, in original order.
fn retained<'a>(query: &'a str, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    query
        .split('&')
        .filter(move |segment| !segment.is_empty() && segment_key(segment) != key)
}

fn rebuild<'a>(base: &str, segments: impl Iterator<Item = &'a str>, fragment: &str) -> String {
    let query = segments.collect::<Vec<_>>().join("&");

    let mut url = String::with_capacity(base.len() + query.len() + fragment.len() + 1);
    url.push_str(base);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url.push_str(fragment);
    url
}

/// Sets `key` to `value` in the query string of `url`.
///
/// Every existing segment for `key` is dropped and a single `key=value`
/// segment is appended; all other segments keep their relative order. A
/// query component is created when `url` has none.
pub fn merge(url: &str, key: &str, value: &str) -> String {
    let (base, query, fragment) = split(url);
    let pair = format!("{key}={value}");
    rebuild(
        base,
        retained(query, key).chain(std::iter::once(pair.as_str())),
        fragment,
    )
}

/// Removes every segment for `key`. An emptied query leaves no trailing `?`.
pub fn remove(url: &str, key: &str) -> String {
    let (base, query, fragment) = split(url);
    rebuild(base, retained(query, key), fragment)
}

/// Returns the value of the first segment for `key`.
///
/// A bare `key` segment without `=` yields `Some("")`.
pub fn get<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let (_, query, _) = split(url);
    query.split('&').find_map(|segment| match segment.split_once('=') {
        Some((k, v)) if k == key => Some(v),
        None if segment == key && !segment.is_empty() => Some(""),
        _ => None,
    })
}

/// Iterates the `key=value` pairs of an `&`-joined parameter string.
///
/// A leading `#` or `?` is ignored, empty segments and empty keys are
/// skipped, and a bare `key` yields an empty value.
pub fn pairs(params: &str) -> impl Iterator<Item = (&str, &str)> {
    params
        .trim_start_matches(['#', '?'])
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
        .filter(|(key, _)| !key.is_empty())
}

/// Merges every pair of `params` into `url`, left to right.
pub fn merge_all(url: &str, params: &str) -> String {
    pairs(params).fold(url.to_string(), |url, (key, value)| merge(&url, key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_replaces_present_key() {
        assert_eq!(
            merge("graph.png?Gstart=0&Gend=22", "Gstart", "5"),
            "graph.png?Gend=22&Gstart=5"
        );
    }

    #[test]
    fn test_merge_preserves_other_keys_in_order() {
        let url = merge("graph.png?a=1&Gend=22&b=2&c=3", "Gend", "10");
        assert_eq!(url, "graph.png?a=1&b=2&c=3&Gend=10");
    }

    #[test]
    fn test_merge_key_is_only_parameter() {
        assert_eq!(
            merge("graph.png?Gmaxlinestep=3600", "Gmaxlinestep", "86400"),
            "graph.png?Gmaxlinestep=86400"
        );
    }

    #[test]
    fn test_merge_appends_absent_key() {
        assert_eq!(
            merge("graph.png?Gstart=0&Gend=22", "Gmaxline", "1"),
            "graph.png?Gstart=0&Gend=22&Gmaxline=1"
        );
    }

    #[test]
    fn test_merge_creates_query_component() {
        for url in ["graph.png", "/cgi/render", "http://host/graph.png", ""] {
            assert_eq!(merge(url, "Gend", "24"), format!("{url}?Gend=24"));
        }
    }

    #[test]
    fn test_merge_on_trailing_question_mark() {
        assert_eq!(merge("graph.png?", "Gend", "24"), "graph.png?Gend=24");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let urls = [
            "graph.png",
            "graph.png?Gstart=3",
            "graph.png?x=1&Gstart=3&y=2",
            "graph.png?Gstart=3&Gstart=4",
        ];
        for url in urls {
            let once = merge(url, "Gstart", "7");
            assert_eq!(merge(&once, "Gstart", "7"), once, "not idempotent for {url}");
        }
    }

    #[test]
    fn test_merge_collapses_duplicate_keys() {
        let url = merge("graph.png?Gstart=1&x=y&Gstart=2", "Gstart", "9");
        assert_eq!(url, "graph.png?x=y&Gstart=9");
        assert_eq!(url.matches("Gstart").count(), 1);
    }

    #[test]
    fn test_merge_does_not_match_key_prefix() {
        assert_eq!(
            merge("graph.png?Gmaxlinestep=3600", "Gmaxline", "1"),
            "graph.png?Gmaxlinestep=3600&Gmaxline=1"
        );
    }

    #[test]
    fn test_merge_passes_values_through_unencoded() {
        assert_eq!(merge("graph.png", "path", "a/b%20c"), "graph.png?path=a/b%20c");
    }

    #[test]
    fn test_merge_keeps_fragment() {
        assert_eq!(
            merge("graph.png?a=1#top", "Gend", "24"),
            "graph.png?a=1&Gend=24#top"
        );
    }

    #[test]
    fn test_merge_drops_empty_segments() {
        assert_eq!(merge("graph.png?a=1&&b=2&", "c", "3"), "graph.png?a=1&b=2&c=3");
    }

    #[test]
    fn test_remove_only_parameter_leaves_bare_path() {
        assert_eq!(remove("graph.png?NOW=12", "NOW"), "graph.png");
    }

    #[test]
    fn test_remove_keeps_others() {
        assert_eq!(remove("graph.png?a=1&NOW=12&b=2", "NOW"), "graph.png?a=1&b=2");
        assert_eq!(remove("graph.png?a=1", "NOW"), "graph.png?a=1");
        assert_eq!(remove("graph.png", "NOW"), "graph.png");
    }

    #[test]
    fn test_get() {
        let url = "graph.png?Gstart=3&flag&Gend=&Gstart=9";
        assert_eq!(get(url, "Gstart"), Some("3"));
        assert_eq!(get(url, "flag"), Some(""));
        assert_eq!(get(url, "Gend"), Some(""));
        assert_eq!(get(url, "missing"), None);
        assert_eq!(get("graph.png", "Gstart"), None);
        assert_eq!(get("graph.png?", ""), None);
    }

    #[test]
    fn test_merge_all_from_hash() {
        assert_eq!(
            merge_all("graph.png?Gstart=0&Gend=22", "#Gend=12&Gmaxline=1"),
            "graph.png?Gstart=0&Gend=12&Gmaxline=1"
        );
    }

    #[test]
    fn test_merge_all_ignores_empty_input() {
        assert_eq!(merge_all("graph.png?a=1", ""), "graph.png?a=1");
        assert_eq!(merge_all("graph.png?a=1", "#"), "graph.png?a=1");
        assert_eq!(merge_all("graph.png?a=1", "&&=5"), "graph.png?a=1");
    }

    #[test]
    fn test_pairs() {
        let collected: Vec<_> = pairs("#Gend=12&&flag&=3&Gstart=").collect();
        assert_eq!(collected, [("Gend", "12"), ("flag", ""), ("Gstart", "")]);
    }

    #[test]
    fn test_merge_all_bare_key() {
        assert_eq!(merge_all("graph.png", "?WINDOW"), "graph.png?WINDOW=");
    }
}
