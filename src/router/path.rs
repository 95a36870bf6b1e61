//! Pure string helpers used around the tree: method validation, path
//! cleaning, group path joining and redirect target construction.
//!
//! The regular expressions are compiled once on first use and only ever read
//! afterwards.

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static METHOD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+$").expect("method name regex is valid"));

/// Characters stripped from an `X-Forwarded-Prefix` value before it is echoed
/// back in a `Location` header.
#[allow(clippy::expect_used)]
static UNSAFE_PREFIX_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9/-]+").expect("prefix filter regex is valid"));

#[allow(clippy::expect_used)]
static REPEATED_SLASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/{2,}").expect("slash collapse regex is valid"));

/// Whether `method` is a non-empty upper-case ASCII token such as `GET`.
#[must_use]
pub fn is_valid_method(method: &str) -> bool {
    METHOD_NAME.is_match(method)
}

/// Lexically clean a slash-separated path.
///
/// Repeated slashes collapse, `.` elements are dropped and `..` removes the
/// preceding element (or is dropped at the root). An empty input yields `"."`.
///
/// ```
/// use rough_router::router::clean_path;
///
/// assert_eq!(clean_path("/a//b/./c/.."), "/a/b");
/// assert_eq!(clean_path("/../x/"), "/x");
/// assert_eq!(clean_path(""), ".");
/// ```
#[must_use]
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for element in path.split('/') {
        match element {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if !rooted => parts.push(".."),
                _ => {}
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_owned(),
        (false, false) => joined,
    }
}

/// Join a group's base path with a relative route path.
///
/// The result is cleaned, but a trailing slash on `relative` is kept so that
/// `/api` + `users/` registers `/api/users/`.
#[must_use]
pub fn join_paths(absolute: &str, relative: &str) -> String {
    if relative.is_empty() {
        return absolute.to_owned();
    }

    let joined = if absolute.is_empty() {
        clean_path(relative)
    } else {
        clean_path(&format!("{absolute}/{relative}"))
    };

    if relative.ends_with('/') && !joined.ends_with('/') {
        joined + "/"
    } else {
        joined
    }
}

/// Reduce an `X-Forwarded-Prefix` header to characters that are safe to
/// place in a redirect. Returns `None` when nothing usable remains.
#[must_use]
pub fn sanitize_prefix(prefix: &str) -> Option<String> {
    let cleaned = clean_path(prefix);
    if cleaned == "." {
        return None;
    }
    let stripped = UNSAFE_PREFIX_CHARS.replace_all(&cleaned, "");
    let collapsed = REPEATED_SLASHES.replace_all(&stripped, "/");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.into_owned())
}

/// Build the `Location` for a trailing-slash redirect: the slash is removed
/// if present, added otherwise.
#[must_use]
pub fn trailing_slash_target(path: &str, prefix: Option<&str>) -> String {
    let mut target = match prefix {
        Some(prefix) => format!("{}{}", prefix.trim_end_matches('/'), path),
        None => path.to_owned(),
    };

    if target.len() > 1 && target.ends_with('/') {
        target.pop();
    } else {
        target.push('/');
    }
    target
}

/// Number of wildcard markers in a route pattern.
#[must_use]
pub fn count_params(path: &str) -> usize {
    path.bytes().filter(|&b| b == b':' || b == b'*').count()
}

/// Number of `/`-separated sections in a route pattern.
#[must_use]
pub fn count_sections(path: &str) -> usize {
    path.bytes().filter(|&b| b == b'/').count()
}
