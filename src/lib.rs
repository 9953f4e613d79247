//! Vocab Enrich - spreadsheet enrichment for vocabulary lists
//!
//! Fills vocabulary spreadsheets with data from public word APIs:
//! - Synonyms and antonyms from the Datamuse thesaurus
//! - Definitions and example sentences from dictionaryapi.dev
//!
//! # Architecture
//!
//! - **Table / Sheet**: in-memory table plus xlsx/csv loading and saving
//! - **Services**: HTTP lookup clients behind small traits
//! - **Pipeline**: resolvers, per-run caches, merging and checkpointing
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vocab_enrich_core::{
//!     pipeline::{definitions, DefinitionsOptions, FileWriter},
//!     sheet::load_table, DictionaryApiClient, EnrichConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> vocab_enrich_core::Result<()> {
//!     let config = EnrichConfig::load(None)?;
//!     let mut table = load_table("vocab.xlsx".as_ref(), &definitions::OUTPUT_COLUMNS)?;
//!     let client = DictionaryApiClient::new(
//!         &config.dictionary,
//!         config.definitions.timeout(),
//!         &config.retry,
//!     )?;
//!     let options = DefinitionsOptions::from_config(&config.definitions, 0);
//!     let mut writer = FileWriter::new("vocab_with_defs.xlsx");
//!     definitions::run(&mut table, Arc::new(client), &options, &mut writer).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod sheet;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use config::EnrichConfig;
pub use error::{EnrichError, Result};
pub use services::{DatamuseClient, DictionaryApiClient, DictionaryClient, ThesaurusClient};
pub use table::Table;
pub use types::{DefinitionPair, RelatedWords, Relation};
