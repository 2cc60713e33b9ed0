pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod logging;
pub mod search;
pub mod server;
pub mod signature;
pub mod tools;
pub mod worker;

pub use config::Config;
pub use docs::{DocChunk, RawEntry, RawModuleDocs, extract_chunks, index_package};
pub use search::{Metric, PackageId, Query, RankedEntry, SearchIndex, rank, rank_with};
pub use server::SearchServer;
pub use signature::{Type, normalize, parse};
pub use worker::{LoadSummary, SearchSession};
