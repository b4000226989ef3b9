//! Reportage document store
//!
//! The single source of truth for the document collection. Documents are
//! immutable once stored; the collection is append-only apart from
//! [`ReportStore::clear`]. Every derived view is recomputed from a listing,
//! so the store's only job is durability and ordered reads:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    REPORT STORE                          │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │   add / bulk_add ──►  RwLock<Vec<Document>>              │
//! │                             │                            │
//! │                             ▼ (write-then-rename)        │
//! │                       reports.json                       │
//! │                             │                            │
//! │   list(order) ◄─────────────┘                            │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Listings are ordered by `(timestamp, id)` in either direction; callers
//! never assume an index survives a clear.


use anyhow::{Context, Result};
use parking_lot::RwLock;
use reportage_model::Document;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Listing direction for [`ReportStore::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

/// Configuration for the report store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON collection file.
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./reports.json"),
        }
    }
}

/// The JSON-file-backed document store.
pub struct ReportStore {
    config: StoreConfig,
    documents: RwLock<Vec<Document>>,
}

impl ReportStore {
    /// Load the collection from disk, or start empty when the file does
    /// not exist yet.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let documents = if config.path.exists() {
            let contents = std::fs::read_to_string(&config.path)
                .with_context(|| format!("reading report store at {}", config.path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("decoding report store at {}", config.path.display()))?
        } else {
            Vec::new()
        };

        tracing::info!(
            path = %config.path.display(),
            count = documents.len(),
            "opened report store"
        );

        Ok(Self {
            config,
            documents: RwLock::new(documents),
        })
    }

    /// Append one document and persist.
    pub fn add(&self, document: Document) -> Result<()> {
        let mut documents = self.documents.write();
        tracing::info!(id = %document.id, name = %document.name, "storing report");
        documents.push(document);
        self.persist(&documents)
    }

    /// Append a batch of documents and persist once.
    ///
    /// The one-time seeding path calls this; its idempotence guard (a
    /// marker owned by the caller) lives outside the store.
    pub fn bulk_add(&self, batch: Vec<Document>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut documents = self.documents.write();
        tracing::info!(count = batch.len(), "storing report batch");
        documents.extend(batch);
        self.persist(&documents)
    }

    /// All documents ordered by `(timestamp, id)`.
    pub fn list(&self, order: SortOrder) -> Vec<Document> {
        let documents = self.documents.read();
        let mut listed: Vec<Document> = documents.clone();
        listed.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        if order == SortOrder::Descending {
            listed.reverse();
        }
        listed
    }

    /// Look up one document by id.
    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents.read().iter().find(|d| d.id == id).cloned()
    }

    pub fn count(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Drop every document and persist the empty collection.
    pub fn clear(&self) -> Result<()> {
        let mut documents = self.documents.write();
        tracing::info!(dropped = documents.len(), "clearing report store");
        documents.clear();
        self.persist(&documents)
    }

    /// Write the collection as pretty JSON via a temp file + rename, so a
    /// failed write never truncates the existing file.
    fn persist(&self, documents: &[Document]) -> Result<()> {
        let json = serde_json::to_string_pretty(documents)?;
        let tmp = tmp_path(&self.config.path);
        std::fs::write(&tmp, json)
            .with_context(|| format!("writing report store at {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.config.path)
            .with_context(|| format!("replacing report store at {}", self.config.path.display()))?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
