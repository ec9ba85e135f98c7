//! Shared test helpers for pipeline tests.

use std::sync::Mutex;

use storepilot_core::error::InferenceError;
use storepilot_core::inference::{InferenceBackend, ModelRequest, RawModelOutput};

/// A backend that replays scripted outcomes and records every request.
///
/// Panics if more calls are made than outcomes provided.
pub struct ScriptedBackend {
    outcomes: Mutex<Vec<Result<RawModelOutput, InferenceError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedBackend {
    pub fn new(outcomes: Vec<Result<RawModelOutput, InferenceError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(vec![Ok(RawModelOutput::Text(text.into()))])
    }

    pub fn failing(error: InferenceError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl InferenceBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, request: &ModelRequest) -> Result<RawModelOutput, InferenceError> {
        let mut requests = self.requests.lock().unwrap();
        let outcomes = self.outcomes.lock().unwrap();
        let call = requests.len();
        if call >= outcomes.len() {
            panic!(
                "ScriptedBackend: no more outcomes (call #{call}, have {})",
                outcomes.len()
            );
        }
        requests.push(request.clone());
        outcomes[call].clone()
    }
}
