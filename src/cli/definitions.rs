//! Definitions command

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use vocab_enrich_core::{
    pipeline::{definitions, DefinitionsOptions, FileWriter},
    sheet::load_table,
    DictionaryApiClient, EnrichConfig,
};

/// Handle the definitions command
pub async fn handle(config: &EnrichConfig, input: &Path, output: &Path, limit: usize) -> Result<()> {
    debug!("Reading {}", input.display());
    let mut table = load_table(input, &definitions::OUTPUT_COLUMNS)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let client = DictionaryApiClient::new(
        &config.dictionary,
        config.definitions.timeout(),
        &config.retry,
    )?;
    let options = DefinitionsOptions::from_config(&config.definitions, limit);
    let mut writer = FileWriter::new(output);

    let summary = definitions::run(&mut table, Arc::new(client), &options, &mut writer)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if summary.all_defined() {
        println!("Nothing to fetch — all rows already have definitions.");
    } else if summary.words == 0 {
        println!(
            "Nothing to fetch — {} row(s) without a definition have no word.",
            summary.blank_words
        );
    } else {
        println!(
            "Fetched {} word(s): {} defined, {} without a definition",
            summary.words,
            summary.succeeded,
            summary.failed + summary.unexpected
        );
    }
    if summary.unexpected > 0 {
        warn!(
            "{} lookup(s) crashed unexpectedly; see errors above",
            summary.unexpected
        );
    }

    println!("Saved {}", output.display());
    Ok(())
}
