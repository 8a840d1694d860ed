//! citegraph-core: a citation graph whose nodes live exactly as long as
//! they are reachable from the root.
//!
//! Publications are identified records connected by citation edges. An edge
//! from a citing publication to a cited one is **owning**: it keeps the
//! cited side alive. The reverse direction is tracked as a non-owning
//! back-reference for traversal. Removing a publication severs its incoming
//! owning edges; whatever that leaves unreachable is reclaimed
//! automatically, cascading through whole subtrees.
//!
//! The graph is generic over the stored record via the [`Publication`]
//! contract; [`Paper`] is the minimal implementation used by the `cg`
//! driver.
//!
//! # Conventions
//!
//! - **Errors**: typed [`GraphError`] results from every fallible
//!   operation; no panics on bad input.
//! - **Logging**: `tracing` macros (`debug!` on mutation, `trace!` on
//!   reclamation).
//!
//! # Example
//!
//! ```
//! use citegraph_core::{CitationGraph, Paper};
//!
//! let mut graph: CitationGraph<Paper> = CitationGraph::new("root".into());
//! graph.create("survey".into(), &["root".into()])?;
//! graph.create("result".into(), &["survey".into()])?;
//!
//! graph.remove(&"survey".into())?;
//! // "result" lost its only citer and was reclaimed with it.
//! assert!(!graph.exists(&"result".into()));
//! # Ok::<(), citegraph_core::GraphError<String>>(())
//! ```

mod arena;
mod node;
mod table;

pub mod error;
pub mod graph;
pub mod publication;

pub use error::GraphError;
pub use graph::CitationGraph;
pub use publication::{Paper, Publication};
