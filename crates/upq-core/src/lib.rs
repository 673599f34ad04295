//! Rate-limited upload queue bound to a session id delivered over a push channel.

pub mod config;
pub mod context;
pub mod endpoints;
pub mod logging;
pub mod notify;
pub mod orchestrator;
pub mod queue;
pub mod rate_limit;
pub mod retry;
pub mod session;
pub mod transfer;
