//! `GenerationBackend` doubles for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use nightfable_core::generation::{
    BackendError, GenerationBackend, GenerationRequest, GenerationResponse,
};

/// A backend that replays a fixed script of outcomes, one per call, and
/// records every request it receives. Calls past the end of the script fail
/// with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<GenerationResponse, BackendError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    /// Create a backend that returns `outcomes` in order.
    #[must_use]
    pub fn new(outcomes: Vec<Result<GenerationResponse, BackendError>>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a backend whose calls return the given texts in order.
    #[must_use]
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            texts
                .into_iter()
                .map(|text| Ok(GenerationResponse::text(text)))
                .collect(),
        )
    }

    /// Returns a snapshot of all requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("script exhausted".into())))
    }
}

/// A backend that always reports a content block.
#[derive(Debug)]
pub struct BlockedBackend;

#[async_trait]
impl GenerationBackend for BlockedBackend {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, BackendError> {
        Ok(GenerationResponse::blocked())
    }
}

/// A backend that always fails at the transport layer.
#[derive(Debug)]
pub struct FailingBackend;

#[async_trait]
impl GenerationBackend for FailingBackend {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, BackendError> {
        Err(BackendError::Transport("connection refused".into()))
    }
}
