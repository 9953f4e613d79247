//! Datamuse thesaurus client

use super::transport::{HttpTransport, RetryPolicy};
use super::ThesaurusClient;
use crate::config::ThesaurusConfig;
use crate::error::{EnrichError, Result};
use crate::types::Relation;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

/// One element of the Datamuse response array
#[derive(Debug, Deserialize)]
struct DatamuseWord {
    word: String,
}

/// Synonym/antonym lookups against `api.datamuse.com/words`
pub struct DatamuseClient {
    transport: HttpTransport,
    base_url: String,
}

impl DatamuseClient {
    /// Lookups are single-shot; a failed relation simply comes back empty upstream.
    pub fn new(config: &ThesaurusConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config.timeout(), RetryPolicy::none())?,
            base_url: config.base_url.clone(),
        })
    }

    /// `<base>?rel_syn=<word>&max=<n>`
    pub fn request_url(&self, word: &str, relation: Relation, max: usize) -> Result<Url> {
        Url::parse_with_params(
            &self.base_url,
            &[
                (relation.query_param(), word.to_string()),
                ("max", max.to_string()),
            ],
        )
        .map_err(|e| EnrichError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }
}

#[async_trait]
impl ThesaurusClient for DatamuseClient {
    async fn related_words(&self, word: &str, relation: Relation, max: usize) -> Result<Vec<String>> {
        let url = self.request_url(word, relation, max)?;
        let words: Vec<DatamuseWord> = self.transport.get_json(url).await?;
        debug!("{} {} -> {} words", relation, word, words.len());
        Ok(words.into_iter().map(|w| w.word).collect())
    }
}
