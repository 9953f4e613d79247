//! Concurrent definition/example enrichment
//!
//! Only rows with a blank `definition` are targeted. Each distinct word becomes
//! one fetch task; a semaphore bounds how many run at once and every task
//! reports back over a channel. The coordinating loop is the only code that
//! touches the table and the writer, merging outcomes as they arrive and
//! writing periodic checkpoints.

use super::merge::{merge_results, TableWriter};
use crate::config::DefinitionsConfig;
use crate::error::Result;
use crate::services::DictionaryClient;
use crate::table::{Table, DEFINITION, EXAMPLE};
use crate::types::DefinitionPair;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Columns this pipeline fills
pub const OUTPUT_COLUMNS: [&str; 2] = [DEFINITION, EXAMPLE];

/// Run parameters, usually built from config plus CLI flags
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionsOptions {
    /// Fetches in flight at once
    pub max_workers: usize,

    /// Pause at the start of each fetch
    pub throttle: Duration,

    /// Checkpoint after every N completed words (0 = final write only)
    pub checkpoint_every: usize,

    /// Only consider the first N rows (0 = all)
    pub limit: usize,
}

impl DefinitionsOptions {
    pub fn from_config(config: &DefinitionsConfig, limit: usize) -> Self {
        Self {
            max_workers: config.max_workers.max(1),
            throttle: config.throttle(),
            checkpoint_every: config.checkpoint_every,
            limit,
        }
    }
}

impl Default for DefinitionsOptions {
    fn default() -> Self {
        Self::from_config(&DefinitionsConfig::default(), 0)
    }
}

/// One distinct word and every target row that carries it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTask {
    pub word: String,
    pub rows: Vec<usize>,
}

/// Fetch work derived from a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPlan {
    /// Tasks in first-appearance order
    pub tasks: Vec<WordTask>,

    /// Rows with a blank definition, including blank-word rows
    pub target_rows: usize,

    /// Target rows skipped because the word is blank
    pub blank_words: usize,
}

/// Group blank-definition rows by trimmed word
pub fn plan_targets(table: &Table, limit: usize) -> FetchPlan {
    let mut plan = FetchPlan::default();
    let mut by_word: HashMap<String, usize> = HashMap::new();

    for row in table.row_range(limit) {
        if !table.get(row, DEFINITION).trim().is_empty() {
            continue;
        }
        plan.target_rows += 1;

        let word = table.word(row);
        if word.is_empty() {
            plan.blank_words += 1;
            continue;
        }

        match by_word.get(word) {
            Some(&idx) => plan.tasks[idx].rows.push(row),
            None => {
                by_word.insert(word.to_string(), plan.tasks.len());
                plan.tasks.push(WordTask {
                    word: word.to_string(),
                    rows: vec![row],
                });
            }
        }
    }

    plan
}

/// Terminal state of one word's fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Succeeded(DefinitionPair),
    /// Timeout, transport error, bad status, undecodable body, or no definition
    Failed(String),
    /// The fetch task itself crashed
    Unexpected(String),
}

impl FetchOutcome {
    /// Value to merge; failures merge as an empty pair
    pub fn into_pair(self) -> DefinitionPair {
        match self {
            FetchOutcome::Succeeded(pair) => pair,
            FetchOutcome::Failed(_) | FetchOutcome::Unexpected(_) => DefinitionPair::default(),
        }
    }
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionsSummary {
    pub target_rows: usize,
    pub blank_words: usize,
    pub words: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub unexpected: usize,
    /// Intermediate checkpoints plus the final write
    pub writes: usize,
}

impl DefinitionsSummary {
    /// No considered row was missing a definition
    pub fn all_defined(&self) -> bool {
        self.target_rows == 0
    }
}

struct Completed {
    task: WordTask,
    outcome: FetchOutcome,
}

/// Fetch definitions for every target row, checkpointing along the way
///
/// The table is written through `writer` every `checkpoint_every`
/// completions and once more at the end. A failed intermediate write is
/// logged and the run continues; a failed final write is returned.
pub async fn run<D, W>(
    table: &mut Table,
    client: Arc<D>,
    options: &DefinitionsOptions,
    writer: &mut W,
) -> Result<DefinitionsSummary>
where
    D: DictionaryClient + ?Sized + 'static,
    W: TableWriter + ?Sized,
{
    for column in OUTPUT_COLUMNS {
        table.ensure_column(column);
    }

    let plan = plan_targets(table, options.limit);
    let total = plan.tasks.len();
    let mut summary = DefinitionsSummary {
        target_rows: plan.target_rows,
        blank_words: plan.blank_words,
        words: total,
        ..Default::default()
    };

    if total == 0 {
        info!("Nothing to fetch: no rows with a blank definition and a word");
        writer.write(table)?;
        summary.writes = 1;
        return Ok(summary);
    }

    info!(
        "Fetching definitions for {} word(s) across {} row(s)",
        total,
        plan.target_rows - plan.blank_words
    );

    let workers = options.max_workers.max(1);
    let (tx, mut rx) = mpsc::channel(workers);
    let dispatcher = tokio::spawn(dispatch(
        plan.tasks,
        client,
        Arc::new(Semaphore::new(workers)),
        options.throttle,
        tx,
    ));

    let mut pending: BTreeMap<usize, DefinitionPair> = BTreeMap::new();
    let mut completed = 0;

    while let Some(Completed { task, outcome }) = rx.recv().await {
        completed += 1;
        match &outcome {
            FetchOutcome::Succeeded(_) => summary.succeeded += 1,
            FetchOutcome::Failed(_) => summary.failed += 1,
            FetchOutcome::Unexpected(_) => summary.unexpected += 1,
        }

        let pair = outcome.into_pair();
        for row in task.rows {
            pending.insert(row, pair.clone());
        }

        let due = options.checkpoint_every > 0
            && completed % options.checkpoint_every == 0
            && completed < total;
        if due {
            merge_results(table, &std::mem::take(&mut pending));
            info!("[{}/{}] processed, writing checkpoint...", completed, total);
            match writer.write(table) {
                Ok(()) => summary.writes += 1,
                Err(e) => warn!("Checkpoint at {}/{} failed: {}", completed, total, e),
            }
        }
    }

    if let Err(e) = dispatcher.await {
        error!("Definition dispatcher stopped abnormally: {}", e);
    }
    if completed < total {
        warn!("Only {}/{} lookups reported back", completed, total);
    }

    merge_results(table, &pending);
    info!("[{}/{}] processed, writing final output...", completed, total);
    writer.write(table)?;
    summary.writes += 1;

    Ok(summary)
}

/// Hand tasks to workers as permits free up
async fn dispatch<D>(
    tasks: Vec<WordTask>,
    client: Arc<D>,
    permits: Arc<Semaphore>,
    throttle: Duration,
    tx: mpsc::Sender<Completed>,
) where
    D: DictionaryClient + ?Sized + 'static,
{
    for task in tasks {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let client = client.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let outcome = fetch(client, &task.word, throttle).await;
            if tx.send(Completed { task, outcome }).await.is_err() {
                debug!("Result channel closed before delivery");
            }
        });
    }
}

/// Fetch one word in its own task so a crash becomes an outcome
async fn fetch<D>(client: Arc<D>, word: &str, throttle: Duration) -> FetchOutcome
where
    D: DictionaryClient + ?Sized + 'static,
{
    debug!("Fetching '{}'", word);
    let owned = word.to_string();
    let handle = tokio::spawn(async move {
        sleep(throttle).await;
        client.define(&owned).await
    });

    match handle.await {
        Ok(Ok(Some(pair))) => FetchOutcome::Succeeded(pair),
        Ok(Ok(None)) => FetchOutcome::Failed("no usable definition".to_string()),
        Ok(Err(e)) => {
            if e.is_transient() {
                warn!("Lookup for '{}' failed: {}", word, e);
            } else {
                debug!("Lookup for '{}' failed: {}", word, e);
            }
            FetchOutcome::Failed(e.to_string())
        }
        Err(e) => {
            error!("Lookup task for '{}' crashed: {}", word, e);
            FetchOutcome::Unexpected(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnrichError;
    use crate::services::MockDictionaryClient;

    #[derive(Default)]
    struct Snapshots(Vec<Table>);

    impl TableWriter for Snapshots {
        fn write(&mut self, table: &Table) -> Result<()> {
            self.0.push(table.clone());
            Ok(())
        }
    }

    fn quick(checkpoint_every: usize) -> DefinitionsOptions {
        DefinitionsOptions {
            max_workers: 3,
            throttle: Duration::ZERO,
            checkpoint_every,
            limit: 0,
        }
    }

    #[test]
    fn test_plan_groups_by_word() {
        let table = Table::from_records(
            &["word", "definition"],
            &[
                &["happy", ""],
                &["", ""],
                &["sad", "existing"],
                &[" happy", ""],
                &["odd", "  "],
            ],
        );
        let plan = plan_targets(&table, 0);

        assert_eq!(plan.target_rows, 4);
        assert_eq!(plan.blank_words, 1);
        assert_eq!(
            plan.tasks,
            vec![
                WordTask {
                    word: "happy".into(),
                    rows: vec![0, 3]
                },
                WordTask {
                    word: "odd".into(),
                    rows: vec![4]
                },
            ]
        );
    }

    #[test]
    fn test_plan_respects_limit() {
        let table = Table::from_records(&["word", "definition"], &[&["a", ""], &["b", ""], &["c", ""]]);
        let plan = plan_targets(&table, 2);
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.target_rows, 2);
    }

    #[tokio::test]
    async fn test_duplicate_words_fetch_once() {
        let mut client = MockDictionaryClient::new();
        client
            .expect_define()
            .withf(|word| word == "happy")
            .times(1)
            .returning(|_| Ok(Some(DefinitionPair::new("feeling joy", "she is happy"))));

        let mut table = Table::from_records(&["word"], &[&["happy"], &["happy "], &["happy"]]);
        let mut writer = Snapshots::default();
        let summary = run(&mut table, Arc::new(client), &quick(25), &mut writer)
            .await
            .unwrap();

        assert_eq!(summary.words, 1);
        assert_eq!(summary.succeeded, 1);
        for row in 0..3 {
            assert_eq!(table.get(row, DEFINITION), "feeling joy");
        }
    }

    #[tokio::test]
    async fn test_failures_leave_cells_blank() {
        let mut client = MockDictionaryClient::new();
        client
            .expect_define()
            .withf(|word| word == "zzyzx")
            .returning(|_| {
                Err(EnrichError::HttpStatus {
                    status: 404,
                    url: "https://api.dictionaryapi.dev/api/v2/entries/en/zzyzx".into(),
                })
            });
        client
            .expect_define()
            .withf(|word| word == "qwerty")
            .returning(|_| Ok(None));

        let mut table = Table::from_records(&["word"], &[&["zzyzx"], &["qwerty"]]);
        let mut writer = Snapshots::default();
        let summary = run(&mut table, Arc::new(client), &quick(25), &mut writer)
            .await
            .unwrap();

        assert_eq!(summary.failed, 2);
        assert_eq!(table.get(0, DEFINITION), "");
        assert_eq!(table.get(1, EXAMPLE), "");
        assert_eq!(writer.0.len(), 1);
    }

    #[tokio::test]
    async fn test_panicking_lookup_is_reported_as_unexpected() {
        let mut client = MockDictionaryClient::new();
        client
            .expect_define()
            .withf(|word| word == "boom")
            .returning(|_| panic!("parser bug"));
        client
            .expect_define()
            .withf(|word| word == "calm")
            .returning(|_| Ok(Some(DefinitionPair::new("peaceful", ""))));

        let mut table = Table::from_records(&["word"], &[&["boom"], &["calm"]]);
        let mut writer = Snapshots::default();
        let summary = run(&mut table, Arc::new(client), &quick(0), &mut writer)
            .await
            .unwrap();

        assert_eq!(summary.unexpected, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(table.get(0, DEFINITION), "");
        assert_eq!(table.get(1, DEFINITION), "peaceful");
    }

    #[tokio::test]
    async fn test_checkpoint_cadence() {
        let mut client = MockDictionaryClient::new();
        client
            .expect_define()
            .returning(|word| Ok(Some(DefinitionPair::new(format!("meaning of {}", word), ""))));

        let words: Vec<String> = (0..7).map(|i| format!("w{}", i)).collect();
        let rows: Vec<Vec<String>> = words.iter().map(|w| vec![w.clone()]).collect();
        let mut table = Table::new(vec!["word".into()], rows);
        let mut writer = Snapshots::default();

        let summary = run(&mut table, Arc::new(client), &quick(3), &mut writer)
            .await
            .unwrap();

        // after 3 and 6 completions, then the final write
        assert_eq!(summary.writes, 3);
        assert_eq!(writer.0.len(), 3);
        let filled = |t: &Table| (0..t.len()).filter(|&r| !t.get(r, DEFINITION).is_empty()).count();
        assert_eq!(filled(&writer.0[0]), 3);
        assert_eq!(filled(&writer.0[1]), 6);
        assert_eq!(filled(&writer.0[2]), 7);
    }

    #[tokio::test]
    async fn test_nothing_to_fetch_still_writes() {
        let client = MockDictionaryClient::new();
        let mut table = Table::from_records(&["word", "definition"], &[&["sad", "existing"]]);
        let mut writer = Snapshots::default();

        let summary = run(&mut table, Arc::new(client), &quick(25), &mut writer)
            .await
            .unwrap();

        assert_eq!(summary.words, 0);
        assert!(summary.all_defined());
        assert_eq!(writer.0.len(), 1);
        assert_eq!(writer.0[0].columns(), &["word", "definition", "example"]);
    }

    #[tokio::test]
    async fn test_blank_words_are_not_reported_as_defined() {
        let client = MockDictionaryClient::new();
        let mut table = Table::from_records(
            &["word", "definition"],
            &[&["sad", "existing"], &["  ", ""]],
        );
        let mut writer = Snapshots::default();

        let summary = run(&mut table, Arc::new(client), &quick(25), &mut writer)
            .await
            .unwrap();

        assert_eq!(summary.words, 0);
        assert_eq!(summary.target_rows, 1);
        assert_eq!(summary.blank_words, 1);
        assert!(!summary.all_defined());
        assert_eq!(writer.0.len(), 1);
    }
}
