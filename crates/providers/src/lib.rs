//! Inference endpoint clients for StorePilot.
//!
//! All clients implement the `storepilot_core::InferenceBackend` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatClient;
