//! Time-expiring cache of page content documents.
//!
//! [`ContentCache`] sits in front of a [`ContentSource`] and keeps one
//! document per section. Entries younger than the TTL are served without
//! touching the source. Misses are fetched with a per-attempt timeout and a
//! linear backoff between retries; when every attempt fails the built-in
//! default for the section is cached instead so a failing store is not
//! hammered.
//!
//! Every fetch is tagged with a ticket. Starting another fetch for the same
//! section, or invalidating it, supersedes older tickets, and a superseded
//! fetch never writes its result into the cache.
//!
//! Invalidations are broadcast as [`ContentInvalidation`]s so that open
//! pages (e.g. SSE subscribers) know to re-fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;

use super::defaults::default_document;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Where content documents come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the stored document for `section`, or `None` if there is none.
    async fn fetch(&self, section: &str) -> Result<Option<Value>, CoreError>;
}

/// Tuning for [`ContentCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a fetched document is served without re-fetching.
    pub ttl: Duration,
    /// Upper bound for a single fetch attempt.
    pub fetch_timeout: Duration,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Retry `n` (1-based) waits `n * backoff_step`.
    pub backoff_step: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(30),
            max_retries: 3,
            backoff_step: Duration::from_millis(1500),
        }
    }
}

/// A section's content as served to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ContentDocument {
    pub section: String,
    pub document: Value,
    /// `true` when `document` is the built-in default rather than stored copy.
    pub is_fallback: bool,
    pub fetched_at: Timestamp,
}

/// Broadcast when cached content is dropped. `section: None` means everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentInvalidation {
    pub section: Option<String>,
}

struct Entry {
    document: ContentDocument,
    stored_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Entry>,
    /// Most recent ticket issued per section. Only its fetch may store.
    latest: HashMap<String, u64>,
    next_ticket: u64,
}

impl CacheState {
    fn issue(&mut self, section: &str) -> u64 {
        self.next_ticket += 1;
        self.latest.insert(section.to_string(), self.next_ticket);
        self.next_ticket
    }
}

/// Default buffer capacity for the invalidation channel.
const INVALIDATION_CAPACITY: usize = 64;

/// In-process content cache. Share via `Arc<ContentCache>`.
pub struct ContentCache {
    source: Arc<dyn ContentSource>,
    config: CacheConfig,
    state: Mutex<CacheState>,
    invalidations: broadcast::Sender<ContentInvalidation>,
}

impl ContentCache {
    pub fn new(source: Arc<dyn ContentSource>, config: CacheConfig) -> Self {
        let (invalidations, _) = broadcast::channel(INVALIDATION_CAPACITY);
        Self {
            source,
            config,
            state: Mutex::new(CacheState::default()),
            invalidations,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the document for `section`, fetching it if the cached copy is
    /// missing or older than the TTL. Never fails: the worst case is the
    /// built-in default.
    pub async fn get(&self, section: &str) -> ContentDocument {
        let ticket = {
            let mut state = self.state.lock().await;
            if let Some(entry) = state.entries.get(section) {
                if entry.stored_at.elapsed() < self.config.ttl {
                    return entry.document.clone();
                }
            }
            state.issue(section)
        };

        let document = self.fetch_with_retry(section).await;

        let mut state = self.state.lock().await;
        if state.latest.get(section) == Some(&ticket) {
            state.entries.insert(
                section.to_string(),
                Entry {
                    document: document.clone(),
                    stored_at: Instant::now(),
                },
            );
        } else {
            tracing::debug!(section, ticket, "Discarding superseded content fetch");
        }
        document
    }

    /// Drop the cached entry for `section`, or every entry when `None`, and
    /// notify subscribers. In-flight fetches for the affected sections will
    /// not be cached.
    pub async fn invalidate(&self, section: Option<&str>) {
        {
            let mut state = self.state.lock().await;
            match section {
                Some(section) => {
                    state.entries.remove(section);
                    state.issue(section);
                }
                None => {
                    state.entries.clear();
                    let sections: Vec<String> = state.latest.keys().cloned().collect();
                    for section in sections {
                        state.issue(&section);
                    }
                }
            }
        }

        tracing::info!(section = section.unwrap_or("*"), "Content cache invalidated");

        // A send error only means nobody is listening.
        let _ = self.invalidations.send(ContentInvalidation {
            section: section.map(str::to_string),
        });
    }

    /// Subscribe to invalidation notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ContentInvalidation> {
        self.invalidations.subscribe()
    }

    async fn fetch_with_retry(&self, section: &str) -> ContentDocument {
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.config.backoff_step * attempt).await;
            }

            match tokio::time::timeout(self.config.fetch_timeout, self.source.fetch(section)).await
            {
                Ok(Ok(Some(document))) => return self.document(section, document, false),
                Ok(Ok(None)) => {
                    tracing::debug!(section, "No stored content, using built-in default");
                    return self.document(section, default_document(section), true);
                }
                Ok(Err(e)) => {
                    tracing::warn!(section, attempt, error = %e, "Content fetch failed");
                }
                Err(_) => {
                    tracing::warn!(
                        section,
                        attempt,
                        timeout_ms = self.config.fetch_timeout.as_millis() as u64,
                        "Content fetch timed out"
                    );
                }
            }
        }

        tracing::error!(
            section,
            attempts = self.config.max_retries + 1,
            "Content fetch exhausted retries, caching built-in default"
        );
        self.document(section, default_document(section), true)
    }

    fn document(&self, section: &str, document: Value, is_fallback: bool) -> ContentDocument {
        ContentDocument {
            section: section.to_string(),
            document,
            is_fallback,
            fetched_at: chrono::Utc::now(),
        }
    }
}
