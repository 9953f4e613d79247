//! Synonym/antonym command

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use vocab_enrich_core::{
    pipeline::{syn_ant, FileWriter, RelationCache},
    sheet::load_table,
    DatamuseClient, EnrichConfig,
};

/// Handle the syn-ant command
pub async fn handle(config: &EnrichConfig, input: &Path, output: &Path) -> Result<()> {
    debug!("Reading {}", input.display());
    let mut table = load_table(input, &syn_ant::OUTPUT_COLUMNS)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let client = DatamuseClient::new(&config.thesaurus)?;
    let mut cache = RelationCache::new();
    let mut writer = FileWriter::new(output);

    let summary = syn_ant::run(&mut table, &client, &mut cache, &config.thesaurus, &mut writer)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    debug!(
        "{} rows, {} blank words, {} cells filled",
        summary.rows, summary.blank_words, summary.cells_filled
    );
    println!("Saved {}", output.display());
    Ok(())
}
