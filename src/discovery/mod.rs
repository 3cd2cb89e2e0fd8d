//! Viewport discovery: querying peaks and challenges for the current view.
//!
//! Discovery is the default browsing mode. Every trigger (viewport settled,
//! search text change, filter change) is debounced through a
//! cancel-and-replace timer; responses are guarded by freshness tokens so a
//! late response to a superseded query never overwrites newer state.

pub mod engine;

pub use engine::DiscoveryEngine;

use crate::model::{ChallengeKind, ChallengeProgress, Peak};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which entity types discovery should query and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityTypeFilter {
    #[default]
    All,
    PeaksOnly,
    ChallengesOnly,
}

impl EntityTypeFilter {
    pub fn includes_peaks(&self) -> bool {
        matches!(self, EntityTypeFilter::All | EntityTypeFilter::PeaksOnly)
    }

    pub fn includes_challenges(&self) -> bool {
        matches!(self, EntityTypeFilter::All | EntityTypeFilter::ChallengesOnly)
    }
}

/// User-controlled discovery inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryParams {
    /// Free-text search; empty means unfiltered
    pub search: String,
    /// Scope queries to the current viewport bounding box
    pub viewport_only: bool,
    pub filter: EntityTypeFilter,
    pub challenge_kind: ChallengeKind,
}

impl DiscoveryParams {
    /// Search text as the backend expects it: trimmed, `None` when empty.
    pub fn search_term(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryConfig {
    /// Quiet window after the last trigger before a query is issued
    pub debounce: Duration,
    /// Below this zoom, discovery clears its sources and queries nothing
    pub min_zoom: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            min_zoom: 6.0,
        }
    }
}

/// The current result set; superseded wholesale by each successful query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryResults {
    pub peaks: Vec<Peak>,
    pub challenges: Vec<ChallengeProgress>,
}

/// Discovery state changes streamed to the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    /// A query succeeded and the result set was replaced
    ResultsUpdated {
        peak_count: usize,
        challenge_count: usize,
    },
    /// Sources and results were cleared (below min zoom, or suppressed exit)
    Cleared,
    /// A query failed; sources and results were cleared
    QueryFailed { message: String },
}
