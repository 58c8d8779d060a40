//! Test helpers: a scripted [`Fetcher`] that records when it was called.
//!
//! Pairs with tokio's paused clock so tests can assert exact scheduling.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::cards::CardData;
use crate::fetch::{FetchError, FetchResponse, Fetcher};

type FetchResult = Result<FetchResponse, FetchError>;

enum Step {
    Respond(FetchResult),
    Hold(oneshot::Receiver<FetchResult>),
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct FetchCall {
    pub url: String,
    pub at: Instant,
}

/// Fetcher that replays queued responses in order.
///
/// When the queue is empty every call returns the fallback, which defaults
/// to a transport error.
pub struct ScriptedFetcher {
    steps: Mutex<VecDeque<Step>>,
    fallback: Mutex<FetchResult>,
    calls: Mutex<Vec<FetchCall>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Err(FetchError::Request(
                "no scripted response".to_string(),
            ))),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response with the given status and body.
    pub fn respond(&self, status: u16, body: impl Into<String>) {
        self.push(Step::Respond(Ok(FetchResponse::new(status, body))));
    }

    /// Queue a transport failure.
    pub fn fail(&self, error: FetchError) {
        self.push(Step::Respond(Err(error)));
    }

    /// Queue a response that resolves only when the returned sender fires.
    pub fn hold(&self) -> oneshot::Sender<FetchResult> {
        let (tx, rx) = oneshot::channel();
        self.push(Step::Hold(rx));
        tx
    }

    /// Result returned once the queue is exhausted.
    pub fn set_fallback(&self, result: FetchResult) {
        if let Ok(mut fallback) = self.fallback.lock() {
            *fallback = result;
        }
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn push(&self, step: Step) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(step);
        }
    }

    fn next_step(&self, url: &str) -> Option<Step> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(FetchCall {
                url: url.to_string(),
                at: Instant::now(),
            });
        }
        self.steps.lock().ok().and_then(|mut steps| steps.pop_front())
    }

    fn fallback(&self) -> FetchResult {
        self.fallback
            .lock()
            .map(|f| f.clone())
            .unwrap_or_else(|_| Err(FetchError::Request("fallback poisoned".to_string())))
    }
}

impl Default for ScriptedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        match self.next_step(url) {
            Some(Step::Respond(result)) => result,
            Some(Step::Hold(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Request("held response dropped".to_string()))),
            None => self.fallback(),
        }
    }
}

/// Serialize cards as an endpoint payload: `{"items": [...]}`.
pub fn items_body(cards: &[CardData]) -> String {
    serde_json::json!({ "items": cards }).to_string()
}
