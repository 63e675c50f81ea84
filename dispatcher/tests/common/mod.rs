//! Fakes and a harness for dispatcher tests.
//!
//! The store is a real in-memory [`SqliteRecordStore`] behind [`FlakyStore`], which can be told
//! to fail selected operations. Upstream services are scripted fakes.

#![allow(dead_code)]

use annotation::{AnnotationFacade, PolarityScorer, Translator};
use anyhow::Result;
use async_trait::async_trait;
use dispatcher::{DispatchContext, Dispatcher, ReferralLedger, SearchOrchestrator, WebSearch};
use llm_client::{GenerationFacade, LlmClient};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use storage::{
    FileRecord, MessageRecord, RecordCounts, RecordStore, SearchRecord, SqliteRecordStore,
    StorageError, UserRecord, UserUpdate,
};

/// Generation backend answering every call with `answer`, or failing when it is `None`.
pub struct FakeLlm {
    answer: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn respond(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn complete_text(&self, prompt: &str) -> Result<String> {
        self.respond(prompt)
    }

    async fn describe_image(&self, prompt: &str, _image: &[u8], _mime: &str) -> Result<String> {
        self.respond(prompt)
    }

    async fn describe_document(&self, prompt: &str, _doc: &[u8], _mime: &str) -> Result<String> {
        self.respond(prompt)
    }
}

/// Translator returning a fixed translation, or failing when it is `None`.
pub struct FakeTranslator(pub Option<String>);

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, _text: &str) -> Result<String> {
        self.0
            .clone()
            .ok_or_else(|| anyhow::anyhow!("translate service unavailable"))
    }
}

/// Scorer returning a fixed polarity, or failing when it is `None`.
pub struct FakeScorer(pub Option<f64>);

impl PolarityScorer for FakeScorer {
    fn polarity(&self, _text: &str) -> Result<f64> {
        self.0.ok_or_else(|| anyhow::anyhow!("scorer crashed"))
    }
}

/// Search backend returning fixed links, or failing when they are `None`.
pub struct FakeSearch(pub Option<Vec<String>>);

#[async_trait]
impl WebSearch for FakeSearch {
    async fn search(&self, _query: &str) -> Result<Vec<String>> {
        self.0
            .clone()
            .ok_or_else(|| anyhow::anyhow!("search backend timed out"))
    }
}

/// In-memory SQLite store that fails the operations named in `failing`.
pub struct FlakyStore {
    pub inner: SqliteRecordStore,
    failing: Mutex<HashSet<&'static str>>,
    stale_reads: Mutex<bool>,
    failing_credits: Mutex<HashSet<i64>>,
}

impl FlakyStore {
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    /// Makes `find_user` report no user, as a concurrent registration would see before the
    /// other insert lands.
    pub fn stale_user_reads(&self) {
        *self.stale_reads.lock().unwrap() = true;
    }

    /// Makes `credit_bonus` fail for `chat_id` only.
    pub fn fail_credit_for(&self, chat_id: i64) {
        self.failing_credits.lock().unwrap().insert(chat_id);
    }

    fn check(&self, operation: &'static str) -> Result<(), StorageError> {
        if self.failing.lock().unwrap().contains(operation) {
            Err(StorageError::Database(format!("{} failed: disk I/O error", operation)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn find_user(&self, chat_id: i64) -> Result<Option<UserRecord>, StorageError> {
        self.check("find_user")?;
        if *self.stale_reads.lock().unwrap() {
            return Ok(None);
        }
        self.inner.find_user(chat_id).await
    }

    async fn insert_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        self.check("insert_user")?;
        self.inner.insert_user(user).await
    }

    async fn update_user(&self, chat_id: i64, update: &UserUpdate) -> Result<(), StorageError> {
        self.check("update_user")?;
        self.inner.update_user(chat_id, update).await
    }

    async fn credit_bonus(&self, chat_id: i64, amount: u32) -> Result<(), StorageError> {
        self.check("credit_bonus")?;
        if self.failing_credits.lock().unwrap().contains(&chat_id) {
            return Err(StorageError::Database(format!(
                "credit for {} failed: database is locked",
                chat_id
            )));
        }
        self.inner.credit_bonus(chat_id, amount).await
    }

    async fn insert_message(&self, message: &MessageRecord) -> Result<(), StorageError> {
        self.check("insert_message")?;
        self.inner.insert_message(message).await
    }

    async fn insert_file(&self, file: &FileRecord) -> Result<(), StorageError> {
        self.check("insert_file")?;
        self.inner.insert_file(file).await
    }

    async fn insert_search(&self, search: &SearchRecord) -> Result<(), StorageError> {
        self.check("insert_search")?;
        self.inner.insert_search(search).await
    }

    async fn counts(&self) -> Result<RecordCounts, StorageError> {
        self.check("counts")?;
        self.inner.counts().await
    }
}

/// Upstream behaviour for a [`Harness`].
pub struct Upstreams {
    pub llm: Arc<FakeLlm>,
    pub translation: Option<String>,
    pub polarity: Option<f64>,
    pub search_links: Option<Vec<String>>,
    pub bonus: u32,
}

impl Default for Upstreams {
    fn default() -> Self {
        Self {
            llm: FakeLlm::answering("Generated answer"),
            translation: Some("hello".to_string()),
            polarity: Some(0.0),
            search_links: Some(
                (1..=5)
                    .map(|n| format!("https://example.com/search?q=test{}", n))
                    .collect(),
            ),
            bonus: 10,
        }
    }
}

pub struct Harness {
    pub store: Arc<FlakyStore>,
    pub llm: Arc<FakeLlm>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with(Upstreams::default()).await
    }

    pub async fn with(upstreams: Upstreams) -> Self {
        let store = Arc::new(FlakyStore {
            inner: SqliteRecordStore::new("sqlite::memory:")
                .await
                .expect("in-memory store"),
            failing: Mutex::new(HashSet::new()),
            stale_reads: Mutex::new(false),
            failing_credits: Mutex::new(HashSet::new()),
        });
        let record_store: Arc<dyn RecordStore> = store.clone();

        let generation = GenerationFacade::new(upstreams.llm.clone());
        let ctx = DispatchContext {
            store: record_store.clone(),
            annotation: AnnotationFacade::new(
                Arc::new(FakeTranslator(upstreams.translation)),
                Arc::new(FakeScorer(upstreams.polarity)),
            ),
            generation: generation.clone(),
            search: SearchOrchestrator::new(
                Arc::new(FakeSearch(upstreams.search_links)),
                generation,
            ),
            referral: ReferralLedger::new(record_store, upstreams.bonus),
        };

        Self {
            store,
            llm: upstreams.llm,
            dispatcher: Dispatcher::new(ctx),
        }
    }

    pub async fn user(&self, chat_id: i64) -> Option<UserRecord> {
        self.store.inner.find_user(chat_id).await.expect("find_user")
    }

    pub async fn counts(&self) -> RecordCounts {
        self.store.inner.counts().await.expect("counts")
    }
}
