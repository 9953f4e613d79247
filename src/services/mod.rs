//! Remote lookup services
//!
//! The pipelines depend on the two traits below; the concrete clients talk to
//! Datamuse and dictionaryapi.dev over a shared reqwest transport.

pub mod dictionary;
pub mod thesaurus;
pub mod transport;

use crate::error::Result;
use crate::types::{DefinitionPair, Relation};
use async_trait::async_trait;

pub use dictionary::{pick_definition, DictionaryApiClient};
pub use thesaurus::DatamuseClient;
pub use transport::{HttpTransport, RetryPolicy};

/// Related-word lookups (synonyms, antonyms)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThesaurusClient: Send + Sync {
    /// Up to `max` words related to `word` by `relation`, best match first
    async fn related_words(&self, word: &str, relation: Relation, max: usize)
        -> Result<Vec<String>>;
}

/// Dictionary lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DictionaryClient: Send + Sync {
    /// First usable definition of `word`, or `None` when the entry has none
    async fn define(&self, word: &str) -> Result<Option<DefinitionPair>>;
}
