//! Freshness tokens for last-trigger-wins request handling.
//!
//! Every query call site (discovery search, detail fetch) draws a token
//! before issuing a request and checks it when the response arrives. Issuing
//! a newer token, or invalidating the source outright, makes every older
//! token stale, so late responses to superseded requests are discarded
//! instead of overwriting newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared generation counter handing out freshness tokens.
#[derive(Debug, Clone, Default)]
pub struct FreshnessSource {
    generation: Arc<AtomicU64>,
}

impl FreshnessSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for a request about to be sent.
    ///
    /// Supersedes every previously issued token.
    pub fn issue(&self) -> FreshnessToken {
        let value = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        FreshnessToken {
            value,
            generation: Arc::clone(&self.generation),
        }
    }

    /// Invalidate all outstanding tokens without issuing a new one.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// A token tied to one issued request.
#[derive(Debug, Clone)]
pub struct FreshnessToken {
    value: u64,
    generation: Arc<AtomicU64>,
}

impl FreshnessToken {
    /// Whether this token still represents the newest request.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.value
    }
}
