use thiserror::Error;

/// Route registration error
///
/// Returned by [`Router::add_route`](super::Router::add_route) and the group
/// helpers when a route table is malformed. These are programmer errors:
/// callers are expected to abort startup rather than retry. A failed insertion
/// may leave the method tree partially modified, so the router should be
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The HTTP method was empty or not an upper-case token
    #[error("HTTP method '{method}' is invalid, expected an upper-case token such as GET")]
    InvalidMethod { method: String },

    /// The route pattern did not start with `/`
    #[error("path must begin with '/' in path '{path}'")]
    MissingLeadingSlash { path: String },

    /// No handler was supplied for the route
    #[error("there must be at least one handler for path '{path}'")]
    EmptyHandlers { path: String },

    /// The combined handler chain would reach the abort sentinel
    #[error("too many handlers for path '{path}': {count} (max {max})")]
    TooManyHandlers {
        path: String,
        count: usize,
        max: usize,
    },

    /// The same literal pattern was registered twice for one method
    #[error("handlers are already registered for path '{path}'")]
    DuplicateRoute { path: String },

    /// A `:param` segment disagrees with an existing wildcard at the same position
    #[error(
        "'{segment}' in new path '{path}' conflicts with existing wildcard '{existing}': \
         param node cannot have wildcard siblings"
    )]
    WildcardConflict {
        segment: String,
        existing: String,
        path: String,
    },

    /// A route tried to descend through an existing catch-all
    #[error("path '{path}' conflicts with an existing catch-all route")]
    CatchAllConflict { path: String },

    /// `*name` was not preceded by a `/` that could be split off
    #[error("catch-all must follow a free slash in path '{path}'")]
    CatchAllMissingSlash { path: String },

    /// `*name` was followed by more path
    #[error("catch-all must be the final path element in path '{path}'")]
    CatchAllNotLast { path: String },

    /// A segment such as `:a:b` carried two wildcard markers
    #[error("only one wildcard per segment is allowed, has: '{segment}' in path '{path}'")]
    MultipleWildcards { segment: String, path: String },

    /// A bare `:` or `*`
    #[error("wildcards must be named with a non-empty name in path '{path}'")]
    MissingWildcardName { path: String },
}
