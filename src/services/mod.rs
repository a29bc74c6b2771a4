//! External collaborators: text summarization and machine translation.
//!
//! Both are reached over HTTP and sit behind small traits so the pipeline can
//! be driven by mocks in tests.

pub mod google;
pub mod ollama;

pub use google::*;
pub use ollama::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Input of {len} characters exceeds the {max} character limit")]
    InputTooLong { len: usize, max: usize },

    #[error("Service returned an empty result")]
    EmptyResult,
}

impl ServiceError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) | Self::HttpClient(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::ResponseParsing(_) | Self::InputTooLong { .. } | Self::EmptyResult => false,
        }
    }

    fn from_reqwest(e: reqwest::Error, endpoint: &str, timeout_secs: u64) -> Self {
        if e.is_connect() {
            Self::Connection(endpoint.to_string())
        } else if e.is_timeout() {
            Self::Timeout(timeout_secs)
        } else {
            Self::HttpClient(e.to_string())
        }
    }
}

/// Abstractive summarization of clinical text.
pub trait Summarizer {
    /// Summarize `text` to roughly `min_len..=max_len` words.
    fn summarize(&self, text: &str, max_len: u32, min_len: u32) -> Result<String, ServiceError>;
}

/// Machine translation between languages given as ISO 639-1 codes
/// (`"auto"` is accepted as a source).
pub trait Translator {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError>;
}

/// Mock summarizer for testing: returns a fixed summary and records prompts.
pub struct MockSummarizer {
    summary: String,
    prompts: Mutex<Vec<String>>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Summarizer for MockSummarizer {
    fn summarize(&self, text: &str, _max_len: u32, _min_len: u32) -> Result<String, ServiceError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(text.to_string());
        }
        Ok(self.summary.clone())
    }
}

/// Mock translator for testing: looks up whole inputs in a table and falls
/// back to echoing the input. Can be told to fail its first N calls.
pub struct MockTranslator {
    table: Vec<(String, String)>,
    fail_first: usize,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            table: Vec::new(),
            fail_first: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_translation(mut self, source: &str, target: &str) -> Self {
        self.table.push((source.to_string(), target.to_string()));
        self
    }

    /// Fail the first `n` calls with a connection error.
    pub fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for MockTranslator {
    fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, ServiceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            return Err(ServiceError::Connection("mock://translator".into()));
        }
        Ok(self
            .table
            .iter()
            .find(|(source, _)| source == text)
            .map(|(_, target)| target.clone())
            .unwrap_or_else(|| text.to_string()))
    }
}
