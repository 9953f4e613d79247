//! dictionaryapi.dev client and definition selection

use super::transport::{HttpTransport, RetryPolicy};
use super::DictionaryClient;
use crate::config::{DictionaryConfig, RetryConfig};
use crate::error::{EnrichError, Result};
use crate::types::DefinitionPair;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Entry lookups against `api.dictionaryapi.dev/api/v2/entries/en/<word>`
pub struct DictionaryApiClient {
    transport: HttpTransport,
    base_url: Url,
}

impl DictionaryApiClient {
    pub fn new(config: &DictionaryConfig, timeout: Duration, retry: &RetryConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| EnrichError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(EnrichError::InvalidUrl(config.base_url.clone()));
        }

        Ok(Self {
            transport: HttpTransport::new(timeout, RetryPolicy::from(retry))?,
            base_url,
        })
    }

    /// Base URL with the word appended as a percent-encoded path segment
    pub fn request_url(&self, word: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(word);
        }
        url
    }
}

#[async_trait]
impl DictionaryClient for DictionaryApiClient {
    async fn define(&self, word: &str) -> Result<Option<DefinitionPair>> {
        let payload: Value = self.transport.get_json(self.request_url(word)).await?;
        let picked = pick_definition(&payload);
        if picked.is_none() {
            debug!("No usable definition in response for '{}'", word);
        }
        Ok(picked)
    }
}

/// Pick the first non-empty definition and its example
///
/// Only the first entry is considered. Its meanings and their definitions are
/// walked in order; anything missing or of the wrong shape is skipped.
pub fn pick_definition(payload: &Value) -> Option<DefinitionPair> {
    let entry = payload.as_array()?.first()?;
    entry
        .get("meanings")?
        .as_array()?
        .iter()
        .filter_map(|meaning| meaning.get("definitions")?.as_array())
        .flatten()
        .find_map(|sense| {
            let definition = sense.get("definition")?.as_str()?.trim();
            if definition.is_empty() {
                return None;
            }
            let example = sense
                .get("example")
                .and_then(Value::as_str)
                .unwrap_or("")
                .trim();
            Some(DefinitionPair::new(definition, example))
        })
}
