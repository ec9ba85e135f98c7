//! Per-request lifecycle.
//!
//! ```text
//! Composed → Dispatched → { FailedTransport | FailedEndpoint | Received }
//! Received → { Validated | FailedSchema }
//! ```
//!
//! There is no retry edge: a caller that sees a failed terminal state starts a
//! fresh request at `Composed`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Composed,
    Dispatched,
    Received,
    Validated,
    FailedTransport,
    FailedEndpoint,
    FailedSchema,
}

impl RequestState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestState::Validated
                | RequestState::FailedTransport
                | RequestState::FailedEndpoint
                | RequestState::FailedSchema
        )
    }

    pub fn can_transition_to(self, next: RequestState) -> bool {
        use RequestState::*;
        matches!(
            (self, next),
            (Composed, Dispatched)
                | (Dispatched, FailedTransport)
                | (Dispatched, FailedEndpoint)
                | (Dispatched, Received)
                | (Received, Validated)
                | (Received, FailedSchema)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestState::Composed => "composed",
            RequestState::Dispatched => "dispatched",
            RequestState::Received => "received",
            RequestState::Validated => "validated",
            RequestState::FailedTransport => "failed_transport",
            RequestState::FailedEndpoint => "failed_endpoint",
            RequestState::FailedSchema => "failed_schema",
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
