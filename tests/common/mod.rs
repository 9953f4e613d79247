//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use vocab_enrich_core::{
    pipeline::TableWriter, DefinitionPair, DictionaryClient, EnrichError, Relation, Result, Table,
    ThesaurusClient,
};

/// In-memory dictionary that records every word it is asked for
#[derive(Default)]
pub struct FakeDictionary {
    entries: HashMap<String, DefinitionPair>,
    calls: Mutex<Vec<String>>,
}

impl FakeDictionary {
    pub fn with(entries: &[(&str, &str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(w, d, e)| (w.to_string(), DefinitionPair::new(*d, *e)))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DictionaryClient for FakeDictionary {
    async fn define(&self, word: &str) -> Result<Option<DefinitionPair>> {
        self.calls.lock().unwrap().push(word.to_string());
        match self.entries.get(word) {
            Some(pair) => Ok(Some(pair.clone())),
            None => Err(EnrichError::HttpStatus {
                status: 404,
                url: format!("fake://entries/en/{}", word),
            }),
        }
    }
}

/// In-memory thesaurus that records every `(relation, word)` query
#[derive(Default)]
pub struct FakeThesaurus {
    entries: HashMap<(Relation, String), Vec<String>>,
    calls: Mutex<Vec<(Relation, String)>>,
}

impl FakeThesaurus {
    pub fn with(entries: &[(Relation, &str, &[&str])]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(r, w, words)| {
                    (
                        (*r, w.to_string()),
                        words.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Relation, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThesaurusClient for FakeThesaurus {
    async fn related_words(&self, word: &str, relation: Relation, max: usize) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push((relation, word.to_string()));
        Ok(self
            .entries
            .get(&(relation, word.to_string()))
            .map(|words| words.iter().take(max).cloned().collect())
            .unwrap_or_default())
    }
}

/// Keeps every snapshot it is handed
#[derive(Default)]
pub struct RecordingWriter {
    pub snapshots: Vec<Table>,
}

impl TableWriter for RecordingWriter {
    fn write(&mut self, table: &Table) -> Result<()> {
        self.snapshots.push(table.clone());
        Ok(())
    }
}

/// Fails the first `failures` writes, then keeps snapshots like [`RecordingWriter`]
#[derive(Default)]
pub struct FailingWriter {
    pub failures: usize,
    pub attempts: usize,
    pub snapshots: Vec<Table>,
}

impl FailingWriter {
    pub fn failing_first(failures: usize) -> Self {
        Self {
            failures,
            ..Default::default()
        }
    }
}

impl TableWriter for FailingWriter {
    fn write(&mut self, table: &Table) -> Result<()> {
        self.attempts += 1;
        if self.attempts <= self.failures {
            return Err(EnrichError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "output locked",
            )));
        }
        self.snapshots.push(table.clone());
        Ok(())
    }
}

/// Write a CSV fixture
pub fn write_csv(path: &Path, content: &str) {
    std::fs::write(path, content).expect("Failed to write fixture");
}

/// Serve a router on an ephemeral localhost port
pub async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub server failed");
    });
    addr
}
