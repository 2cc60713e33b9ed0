//! Type-signature search infrastructure.
//!
//! This module provides the append-only index of documented entries, the structural
//! scorers, and query classification and ranking.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;

// Public re-exports (used via lib.rs)
pub use index::{
    IndexedEntry, IndexedModule, NameDictionary, PackageBatch, PackageId, SearchIndex,
    SkippedModule,
};
pub use query::{Query, RankedEntry, SearchHit, rank, rank_with};
pub use scoring::{Metric, distance, similarity};
