//! Error types for citation graph operations.
//!
//! All failures are local and synchronous: an operation either succeeds or
//! reports one of these kinds without touching observable graph state. None
//! of them is fatal; callers decide whether to retry with corrected
//! arguments.

#![allow(clippy::module_name_repetitions)]

/// Errors reported by [`CitationGraph`](crate::graph::CitationGraph)
/// operations.
///
/// Generic over the publication id type so the offending id travels with the
/// error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError<I: std::fmt::Debug> {
    /// The operation referenced an id with no live publication.
    #[error("publication not found: {0:?}")]
    NotFound(I),

    /// `create` was called with an id that is already registered.
    #[error("publication already created: {0:?}")]
    AlreadyExists(I),

    /// `remove` targeted the root publication.
    #[error("cannot remove the root publication: {0:?}")]
    CannotRemoveRoot(I),
}
