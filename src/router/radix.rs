//! Radix tree implementation for HTTP route matching
//!
//! This module provides a compressed prefix tree (radix tree) for O(k) route
//! matching where k is the path length, independent of how many routes are
//! registered.
//!
//! ## Key Properties
//!
//! - **Path compression**: shared prefixes (e.g. `/api/v1/`) are stored once and
//!   nodes are split lazily when a new route diverges inside a stored segment
//! - **Priority ordering**: static children are kept sorted by the number of
//!   routes passing through them, so hot branches are probed first
//! - **Explicit matches**: at most one wildcard child per node, always stored
//!   last; conflicting wildcards are rejected at registration time
//! - **Backtracking**: a static branch that dead-ends falls back to the
//!   wildcard sibling it shadowed, via an explicit stack of skipped nodes
//!
//! ## Pattern Syntax
//!
//! ```text
//! /users/:id          named parameter, matches one segment
//! /static/*filepath   catch-all, matches the rest including slashes
//! ```
//!
//! ## Node Layout
//!
//! Registering `/src/*filepath`, `/search/` and `/support` produces:
//!
//! ```text
//! /s                  root
//! ├── earch/          static
//! ├── upport          static
//! └── rc              static, indexed by 'r'
//!     └── ""          catch-all separator, indexed by '/'
//!         └── /*filepath
//! ```

use std::mem;
use std::sync::Arc;

use super::error::RouteError;
use super::params::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum NodeKind {
    #[default]
    Static,
    Root,
    Param,
    CatchAll,
}

/// One vertex of the compressed tree.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    /// Text consumed by this node
    path: String,
    /// First character of each static child, in the same order as `children`
    indices: Vec<char>,
    /// Whether the last child is a param or catch-all node
    wild_child: bool,
    kind: NodeKind,
    /// Routes passing through this node (self + descendants)
    priority: u32,
    children: Vec<Node<V>>,
    value: Option<V>,
    full_path: String,
    /// Parameter name for wildcard leaves, shared with every lookup
    key: Option<Arc<str>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            path: String::new(),
            indices: Vec::new(),
            wild_child: false,
            kind: NodeKind::Static,
            priority: 0,
            children: Vec::new(),
            value: None,
            full_path: String::new(),
            key: None,
        }
    }
}

/// Backtracking point recorded when lookup takes a static child while a
/// wildcard sibling is available.
#[derive(Debug)]
pub struct SkippedNode<'t, 'p, V> {
    path: &'p str,
    node: &'t Node<V>,
    params_count: usize,
}

/// Result of a tree lookup
#[derive(Debug)]
pub struct RouteValue<'t, V> {
    /// The registered value, if the path matched a route
    pub value: Option<&'t V>,
    /// A route exists for the same path with a trailing slash added or removed
    pub tsr: bool,
    /// The registered pattern of the matched route
    pub full_path: Option<&'t str>,
}

impl<V> RouteValue<'_, V> {
    fn unmatched() -> Self {
        Self {
            value: None,
            tsr: false,
            full_path: None,
        }
    }
}

fn longest_common_prefix(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map_or(0, |((i, x), _)| i + x.len_utf8())
}

/// Find the first wildcard segment in `path`.
///
/// Returns the wildcard (up to the next `/`), its byte offset, and whether the
/// segment is free of further `:` or `*` markers.
fn find_wildcard(path: &str) -> Option<(&str, usize, bool)> {
    let start = path.find([':', '*'])?;
    let mut valid = true;
    for (end, c) in path[start + 1..].char_indices() {
        match c {
            '/' => return Some((&path[start..start + 1 + end], start, valid)),
            ':' | '*' => valid = false,
            _ => {}
        }
    }
    Some((&path[start..], start, valid))
}

fn capture(raw: &str, unescape: bool) -> String {
    if unescape {
        if let Ok(decoded) = urlencoding::decode(raw) {
            return decoded.into_owned();
        }
    }
    raw.to_owned()
}

fn eq_fold(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive `strip_prefix`, comparing Unicode scalar values.
fn strip_prefix_fold<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let mut rest = path.chars();
    for expected in prefix.chars() {
        if !eq_fold(rest.next()?, expected) {
            return None;
        }
    }
    Some(rest.as_str())
}

/// Pop skipped nodes until one can resume the current walk.
fn backtrack<'t, 'p, V>(
    path: &mut &'p str,
    node: &mut &'t Node<V>,
    wildcard_only: &mut bool,
    params: &mut Params,
    skipped: &mut Vec<SkippedNode<'t, 'p, V>>,
) -> bool {
    while let Some(skip) = skipped.pop() {
        if skip.path.ends_with(*path) {
            *path = skip.path;
            *node = skip.node;
            *wildcard_only = true;
            params.truncate(skip.params_count);
            return true;
        }
    }
    false
}

impl<V> Node<V> {
    fn is_empty(&self) -> bool {
        self.path.is_empty() && self.children.is_empty()
    }

    fn wildcard(kind: NodeKind, path: &str, key: &str) -> Self {
        Self {
            path: path.to_owned(),
            kind,
            key: Some(Arc::from(key)),
            ..Self::default()
        }
    }

    fn leaf_has_value(&self) -> bool {
        (self.path.len() == 1 && self.value.is_some())
            || (self.kind == NodeKind::CatchAll
                && self.children.first().is_some_and(|leaf| leaf.value.is_some()))
    }

    /// Append a static child, keeping the wildcard child last.
    fn add_child(&mut self, child: Node<V>) {
        if self.wild_child && !self.children.is_empty() {
            let at = self.children.len() - 1;
            self.children.insert(at, child);
        } else {
            self.children.push(child);
        }
    }

    /// Bump the priority of the static child at `pos` and move it forward past
    /// siblings with a lower priority. Returns its new position.
    fn increment_child_prio(&mut self, pos: usize) -> usize {
        self.children[pos].priority += 1;
        let prio = self.children[pos].priority;

        let mut new_pos = pos;
        while new_pos > 0 && self.children[new_pos - 1].priority < prio {
            self.children.swap(new_pos - 1, new_pos);
            new_pos -= 1;
        }

        if new_pos != pos {
            let c = self.indices.remove(pos);
            self.indices.insert(new_pos, c);
        }
        new_pos
    }

    /// Shrink this node to `path[..at]`, moving the suffix and everything
    /// hanging off it into a new static child.
    fn split(&mut self, at: usize) {
        let child = Node {
            path: self.path[at..].to_owned(),
            indices: mem::take(&mut self.indices),
            wild_child: self.wild_child,
            kind: NodeKind::Static,
            priority: self.priority.saturating_sub(1),
            children: mem::take(&mut self.children),
            value: self.value.take(),
            full_path: mem::take(&mut self.full_path),
            key: None,
        };

        self.indices = child.path.chars().take(1).collect();
        self.children = vec![child];
        self.path.truncate(at);
        self.wild_child = false;
    }

    /// Register `value` for `path`. Not safe to run concurrently with lookups.
    pub(crate) fn add_route(&mut self, path: &str, value: V) -> Result<(), RouteError> {
        let full_path = path;
        self.priority += 1;

        if self.is_empty() {
            self.kind = NodeKind::Root;
            return self.set_child(path, value, full_path);
        }

        let mut n = self;
        let mut path = path;
        loop {
            // Nothing can be added below or beside a catch-all
            if n.kind == NodeKind::CatchAll {
                return Err(RouteError::CatchAllConflict {
                    path: full_path.to_owned(),
                });
            }

            let i = longest_common_prefix(path, &n.path);
            if i < n.path.len() {
                n.split(i);
            }

            if i == path.len() {
                if n.value.is_some() {
                    return Err(RouteError::DuplicateRoute {
                        path: full_path.to_owned(),
                    });
                }
                n.value = Some(value);
                n.full_path = full_path.to_owned();
                return Ok(());
            }

            path = &path[i..];
            let Some(c) = path.chars().next() else {
                return Err(RouteError::DuplicateRoute {
                    path: full_path.to_owned(),
                });
            };

            if c == '*' {
                return Err(RouteError::CatchAllMissingSlash {
                    path: full_path.to_owned(),
                });
            }

            if c == ':' {
                if !n.wild_child || n.children.is_empty() {
                    return n.set_child(path, value, full_path);
                }
                let last = n.children.len() - 1;
                let wild = &n.children[last];
                if wild.kind != NodeKind::Param {
                    return Err(RouteError::CatchAllConflict {
                        path: full_path.to_owned(),
                    });
                }
                // ":abc" conflicts with ":abcd", but not with ":abc/..."
                let existing = wild.path.as_str();
                let compatible = path.starts_with(existing)
                    && matches!(path[existing.len()..].chars().next(), None | Some('/'));
                if !compatible {
                    return Err(RouteError::WildcardConflict {
                        segment: path.split('/').next().unwrap_or(path).to_owned(),
                        existing: existing.to_owned(),
                        path: full_path.to_owned(),
                    });
                }
                n = &mut n.children[last];
                n.priority += 1;
                continue;
            }

            // A param node has at most one child, which starts with '/'
            if n.kind == NodeKind::Param && c == '/' && n.children.len() == 1 {
                n = &mut n.children[0];
                n.priority += 1;
                continue;
            }

            if let Some(pos) = n.indices.iter().position(|&ic| ic == c) {
                let pos = n.increment_child_prio(pos);
                n = &mut n.children[pos];
                continue;
            }

            n.indices.push(c);
            n.add_child(Node::default());
            let pos = n.increment_child_prio(n.indices.len() - 1);
            return n.children[pos].set_child(path, value, full_path);
        }
    }

    /// Build the remainder of a route below a fresh (or wildcard-less) node,
    /// creating param and catch-all nodes as the pattern requires.
    fn set_child(&mut self, path: &str, value: V, full_path: &str) -> Result<(), RouteError> {
        let mut n = self;
        let mut path = path;

        while let Some((wildcard, i, valid)) = find_wildcard(path) {
            if !valid {
                return Err(RouteError::MultipleWildcards {
                    segment: wildcard.to_owned(),
                    path: full_path.to_owned(),
                });
            }
            if wildcard.len() < 2 {
                return Err(RouteError::MissingWildcardName {
                    path: full_path.to_owned(),
                });
            }

            if wildcard.starts_with(':') {
                if i > 0 {
                    n.path = path[..i].to_owned();
                    path = &path[i..];
                }

                n.add_child(Node::wildcard(NodeKind::Param, wildcard, &wildcard[1..]));
                n.wild_child = true;
                let last = n.children.len() - 1;
                n = &mut n.children[last];
                n.priority += 1;

                // The pattern continues after the param with a '/'
                if wildcard.len() < path.len() {
                    path = &path[wildcard.len()..];
                    n.indices = vec!['/'];
                    n.add_child(Node {
                        priority: 1,
                        ..Node::default()
                    });
                    n = &mut n.children[0];
                    continue;
                }

                n.value = Some(value);
                n.full_path = full_path.to_owned();
                return Ok(());
            }

            if i + wildcard.len() != path.len() {
                return Err(RouteError::CatchAllNotLast {
                    path: full_path.to_owned(),
                });
            }
            if !path[..i].ends_with('/') {
                return Err(RouteError::CatchAllMissingSlash {
                    path: full_path.to_owned(),
                });
            }
            let i = i - 1;

            // Empty separator node, unless this fresh node can serve as one
            if i > 0 || n.kind == NodeKind::Root {
                n.path = path[..i].to_owned();
                n.add_child(Node {
                    wild_child: true,
                    kind: NodeKind::CatchAll,
                    priority: 1,
                    ..Node::default()
                });
                n.indices = vec!['/'];
                let last = n.children.len() - 1;
                n = &mut n.children[last];
            } else {
                n.wild_child = true;
                n.kind = NodeKind::CatchAll;
            }

            let leaf_path = &path[i..];
            let mut leaf = Node::wildcard(NodeKind::CatchAll, leaf_path, &leaf_path[2..]);
            leaf.priority = 1;
            leaf.value = Some(value);
            leaf.full_path = full_path.to_owned();
            n.children = vec![leaf];
            return Ok(());
        }

        n.path = path.to_owned();
        n.value = Some(value);
        n.full_path = full_path.to_owned();
        Ok(())
    }

    /// Walk the tree for `path`, filling `params` with wildcard captures.
    ///
    /// Static children are preferred; when one is taken while a wildcard
    /// sibling exists, a [`SkippedNode`] is pushed so a dead end further down
    /// can resume at the wildcard.
    pub(crate) fn get_value<'t, 'p>(
        &'t self,
        path: &'p str,
        params: &mut Params,
        skipped: &mut Vec<SkippedNode<'t, 'p, V>>,
        unescape: bool,
    ) -> RouteValue<'t, V> {
        skipped.clear();
        params.truncate(0);

        let mut value = RouteValue::unmatched();
        let mut n = self;
        let mut path = path;
        let mut wildcard_only = false;

        'walk: loop {
            let prefix = n.path.as_str();

            if path.len() > prefix.len() {
                if let Some(rest) = path.strip_prefix(prefix) {
                    let consumed = path;
                    path = rest;

                    if !mem::take(&mut wildcard_only) {
                        let first = path.chars().next();
                        if let Some(i) = n.indices.iter().position(|&c| Some(c) == first) {
                            if n.wild_child {
                                skipped.push(SkippedNode {
                                    path: consumed,
                                    node: n,
                                    params_count: params.len(),
                                });
                            }
                            n = &n.children[i];
                            continue 'walk;
                        }
                    }

                    if !n.wild_child {
                        if path != "/"
                            && backtrack(&mut path, &mut n, &mut wildcard_only, params, skipped)
                        {
                            continue 'walk;
                        }
                        // Recommend dropping the trailing slash if a leaf exists here
                        value.tsr = path == "/" && n.value.is_some();
                        return value;
                    }

                    let Some(wild) = n.children.last() else {
                        return value;
                    };
                    n = wild;

                    match n.kind {
                        NodeKind::Param => {
                            let end = path.find('/').unwrap_or(path.len());
                            if let Some(key) = &n.key {
                                params.push(Arc::clone(key), capture(&path[..end], unescape));
                            }

                            if end < path.len() {
                                if let Some(next) = n.children.first() {
                                    path = &path[end..];
                                    n = next;
                                    continue 'walk;
                                }
                                if backtrack(&mut path, &mut n, &mut wildcard_only, params, skipped)
                                {
                                    continue 'walk;
                                }
                                value.tsr = path.len() == end + 1;
                                return value;
                            }

                            if let Some(v) = &n.value {
                                value.value = Some(v);
                                value.full_path = Some(&n.full_path);
                                return value;
                            }
                            if backtrack(&mut path, &mut n, &mut wildcard_only, params, skipped) {
                                continue 'walk;
                            }
                            if let [only] = n.children.as_slice() {
                                value.tsr = (only.path == "/" && only.value.is_some())
                                    || (only.path.is_empty() && n.indices == ['/']);
                            }
                            return value;
                        }
                        NodeKind::CatchAll => {
                            if let Some(key) = &n.key {
                                params.push(Arc::clone(key), capture(path, unescape));
                            }
                            value.value = n.value.as_ref();
                            value.full_path = Some(&n.full_path);
                            return value;
                        }
                        #[allow(clippy::unreachable)]
                        NodeKind::Static | NodeKind::Root => {
                            unreachable!("invalid node type for wildcard child: {:?}", n.kind)
                        }
                    }
                }
            }

            if path == prefix {
                if n.value.is_none()
                    && path != "/"
                    && backtrack(&mut path, &mut n, &mut wildcard_only, params, skipped)
                {
                    continue 'walk;
                }

                if let Some(v) = &n.value {
                    value.value = Some(v);
                    value.full_path = Some(&n.full_path);
                    return value;
                }

                // No handler here, but a wildcard child implies one with a trailing slash
                if path == "/" && n.wild_child && n.kind != NodeKind::Root {
                    value.tsr = true;
                    return value;
                }
                if path == "/" && n.kind == NodeKind::Static {
                    value.tsr = true;
                    return value;
                }

                if let Some(i) = n.indices.iter().position(|&c| c == '/') {
                    value.tsr = n.children[i].leaf_has_value();
                }
                return value;
            }

            // Recommend adding a trailing slash if this node is exactly path + "/"
            value.tsr = path == "/"
                || (prefix.len() == path.len() + 1
                    && prefix.ends_with('/')
                    && prefix.starts_with(path)
                    && n.value.is_some());

            if !value.tsr && backtrack(&mut path, &mut n, &mut wildcard_only, params, skipped) {
                continue 'walk;
            }
            return value;
        }
    }

    /// Case-insensitive lookup, optionally adding or removing a trailing slash.
    /// Returns the path as registered (with captured wildcard text kept as-is).
    pub(crate) fn find_case_insensitive_path(
        &self,
        path: &str,
        fix_trailing_slash: bool,
    ) -> Option<String> {
        let mut ci_path = String::with_capacity(path.len() + 1);
        self.find_case_insensitive_rec(path, &mut ci_path, fix_trailing_slash)
            .then_some(ci_path)
    }

    fn find_case_insensitive_rec(&self, path: &str, ci_path: &mut String, fix: bool) -> bool {
        let Some(rest) = strip_prefix_fold(path, &self.path) else {
            // The node is exactly path + "/"
            let slash_added = self
                .path
                .strip_suffix('/')
                .and_then(|trimmed| strip_prefix_fold(path, trimmed))
                .is_some_and(str::is_empty);
            if fix && slash_added && self.value.is_some() {
                ci_path.push_str(&self.path);
                return true;
            }
            return false;
        };

        let mark = ci_path.len();
        ci_path.push_str(&self.path);

        if rest.is_empty() {
            if self.value.is_some() {
                return true;
            }
            if fix {
                if let Some(i) = self.indices.iter().position(|&c| c == '/') {
                    if self.children[i].leaf_has_value() {
                        ci_path.push('/');
                        return true;
                    }
                }
            }
            ci_path.truncate(mark);
            return false;
        }

        // Both the upper- and lower-case character may be indexed
        if let Some(first) = rest.chars().next() {
            for (i, &c) in self.indices.iter().enumerate() {
                if eq_fold(c, first) && self.children[i].find_case_insensitive_rec(rest, ci_path, fix)
                {
                    return true;
                }
            }
        }

        if self.wild_child {
            if let Some(wild) = self.children.last() {
                match wild.kind {
                    NodeKind::Param => {
                        let end = rest.find('/').unwrap_or(rest.len());
                        let param_mark = ci_path.len();
                        ci_path.push_str(&rest[..end]);

                        if end < rest.len() {
                            match wild.children.first() {
                                Some(next) => {
                                    if next.find_case_insensitive_rec(&rest[end..], ci_path, fix) {
                                        return true;
                                    }
                                }
                                None => {
                                    if fix && rest.len() == end + 1 {
                                        return true;
                                    }
                                }
                            }
                        } else if wild.value.is_some() {
                            return true;
                        } else if let [only] = wild.children.as_slice() {
                            if fix && only.path == "/" && only.value.is_some() {
                                ci_path.push('/');
                                return true;
                            }
                        }
                        ci_path.truncate(param_mark);
                    }
                    NodeKind::CatchAll => {
                        ci_path.push_str(rest);
                        return true;
                    }
                    NodeKind::Static | NodeKind::Root => {}
                }
            }
        }

        // Drop the trailing slash if this node holds a route
        if fix && rest == "/" && self.value.is_some() {
            return true;
        }

        ci_path.truncate(mark);
        false
    }

    fn collect_routes<'t>(&'t self, out: &mut Vec<(&'t str, &'t V)>) {
        if let Some(v) = &self.value {
            out.push((&self.full_path, v));
        }
        for child in &self.children {
            child.collect_routes(out);
        }
    }
}

/// A compressed prefix tree for one HTTP method.
///
/// Build it completely with [`Tree::insert`] before sharing it; lookups only
/// take `&self` and are safe to run from any number of threads.
#[derive(Debug, Clone)]
pub struct Tree<V> {
    root: Node<V>,
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self {
            root: Node::default(),
        }
    }
}

impl<V> Tree<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Register `value` for the route pattern `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for duplicate routes, wildcard conflicts and
    /// malformed wildcards. The tree may be left partially modified.
    pub fn insert(&mut self, path: &str, value: V) -> Result<(), RouteError> {
        self.root.add_route(path, value)
    }

    /// Look up `path` reusing caller-owned scratch buffers.
    ///
    /// Both buffers are reset on entry, so they can be kept across lookups to
    /// avoid reallocating. On return `params` holds the wildcard captures in
    /// pattern order; `skipped` holds nothing meaningful.
    pub fn get_value<'t, 'p>(
        &'t self,
        path: &'p str,
        params: &mut Params,
        skipped: &mut Vec<SkippedNode<'t, 'p, V>>,
        unescape: bool,
    ) -> RouteValue<'t, V> {
        self.root.get_value(path, params, skipped, unescape)
    }

    /// Look up `path` with freshly allocated buffers.
    #[must_use]
    pub fn lookup(&self, path: &str) -> (RouteValue<'_, V>, Params) {
        let mut params = Params::new();
        let mut skipped = Vec::new();
        let value = self.root.get_value(path, &mut params, &mut skipped, false);
        (value, params)
    }

    /// Case-insensitive lookup returning the corrected path.
    #[must_use]
    pub fn find_case_insensitive_path(&self, path: &str, fix_trailing_slash: bool) -> Option<String> {
        self.root.find_case_insensitive_path(path, fix_trailing_slash)
    }

    /// Every registered `(pattern, value)` in tree order.
    #[must_use]
    pub fn routes(&self) -> Vec<(&str, &V)> {
        let mut out = Vec::new();
        self.root.collect_routes(&mut out);
        out
    }
}
