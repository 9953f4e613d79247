//! Enrichment pipelines
//!
//! Both pipelines follow the same shape: load the table, resolve words
//! through a lookup service, merge results into blank cells, write the file.

pub mod cache;
pub mod definitions;
pub mod merge;
pub mod syn_ant;

pub use cache::LookupCache;
pub use definitions::{DefinitionsOptions, DefinitionsSummary, FetchOutcome};
pub use merge::{merge_results, FileWriter, TableWriter};
pub use syn_ant::{RelationCache, SynAntResolver, SynAntSummary};
