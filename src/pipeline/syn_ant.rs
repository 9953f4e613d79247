//! Synonym/antonym enrichment
//!
//! Rows are resolved one at a time in table order. Each distinct
//! `(relation, word)` pair costs at most one thesaurus call per run, and a
//! failed call is remembered as an empty list.

use super::cache::LookupCache;
use super::merge::{merge_results, TableWriter};
use crate::config::ThesaurusConfig;
use crate::error::Result;
use crate::services::ThesaurusClient;
use crate::table::{Table, ANTONYMS, SYNONYMS};
use crate::types::{RelatedWords, Relation};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Cache of related-word lists keyed by relation and trimmed word
pub type RelationCache = LookupCache<(Relation, String), Vec<String>>;

/// Columns this pipeline fills
pub const OUTPUT_COLUMNS: [&str; 2] = [SYNONYMS, ANTONYMS];

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynAntSummary {
    pub rows: usize,
    pub blank_words: usize,
    pub lookups: usize,
    pub failed_lookups: usize,
    pub cells_filled: usize,
}

/// Sequential resolver over a thesaurus client
pub struct SynAntResolver<'a, C: ThesaurusClient + ?Sized> {
    client: &'a C,
    cache: &'a mut RelationCache,
    max_results: usize,
    delay: Duration,
    summary: SynAntSummary,
}

impl<'a, C: ThesaurusClient + ?Sized> SynAntResolver<'a, C> {
    pub fn new(client: &'a C, cache: &'a mut RelationCache, config: &ThesaurusConfig) -> Self {
        Self {
            client,
            cache,
            max_results: config.max_results,
            delay: config.delay(),
            summary: SynAntSummary::default(),
        }
    }

    /// Related words for one trimmed, non-empty word
    pub async fn resolve(&mut self, word: &str, relation: Relation) -> Vec<String> {
        let key = (relation, word.to_string());
        if let Some(words) = self.cache.get(&key) {
            return words.clone();
        }

        self.summary.lookups += 1;
        let words = match self
            .client
            .related_words(word, relation, self.max_results)
            .await
        {
            Ok(words) => {
                sleep(self.delay).await;
                words
            }
            Err(e) => {
                self.summary.failed_lookups += 1;
                warn!("{} lookup for '{}' failed: {}", relation, word, e);
                Vec::new()
            }
        };

        self.cache.insert(key, words.clone());
        words
    }

    /// Resolve every row and merge the joined lists into the table
    ///
    /// A relation whose cell already holds text is left alone and not queried.
    pub async fn enrich(mut self, table: &mut Table) -> SynAntSummary {
        for column in OUTPUT_COLUMNS {
            table.ensure_column(column);
        }

        let mut results = BTreeMap::new();
        for row in 0..table.len() {
            let word = table.word(row).to_string();
            if word.is_empty() {
                self.summary.blank_words += 1;
                continue;
            }

            let mut related = RelatedWords::default();
            for relation in Relation::ALL {
                if !table.get(row, relation.column()).trim().is_empty() {
                    debug!("Row {} already has {}", row, relation.column());
                    continue;
                }
                related.set(relation, self.resolve(&word, relation).await);
            }
            results.insert(row, related);
        }

        self.summary.rows = table.len();
        self.summary.cells_filled = merge_results(table, &results);
        self.summary
    }
}

/// Enrich a loaded table and write it once
pub async fn run<C, W>(
    table: &mut Table,
    client: &C,
    cache: &mut RelationCache,
    config: &ThesaurusConfig,
    writer: &mut W,
) -> Result<SynAntSummary>
where
    C: ThesaurusClient + ?Sized,
    W: TableWriter + ?Sized,
{
    let summary = SynAntResolver::new(client, cache, config).enrich(table).await;
    writer.write(table)?;

    info!(
        "Resolved {} rows with {} thesaurus calls ({} failed)",
        summary.rows, summary.lookups, summary.failed_lookups
    );
    Ok(summary)
}
