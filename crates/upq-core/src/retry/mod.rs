//! Retry and backoff policy for failed uploads.
//!
//! Classifies transfer failures (throttling, server errors, network errors)
//! and decides whether the orchestrator should try an item again. The default
//! policy allows a single attempt, so a failed transfer is final for the run.

mod classify;
mod policy;

pub use classify::{classify, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
