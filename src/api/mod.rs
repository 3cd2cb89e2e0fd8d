//! Backend query endpoints.
//!
//! Two seams: [`DiscoveryApi`] for viewport-scoped search and [`DetailApi`]
//! for entity detail fetches. Detail fetches distinguish "the entity is not
//! visible to you" (`Ok(None)`, covering not-found and unauthorized alike)
//! from transport failure (`Err`). [`HttpApi`] implements both over reqwest.

pub mod http;

pub use http::HttpApi;

use crate::geometry::LngLatBounds;
use crate::model::{
    ActivityDetail, ChallengeDetail, ChallengeKind, ChallengeProgress, Peak, PeakDetail,
    ProfileDetail, UserChallengeDetail,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Server error: status {0}")]
    ServerError(u16),
}

/// Parameters of a viewport-scoped peak search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeakSearchQuery {
    /// Restrict results to this box; `None` searches without a viewport scope
    pub bbox: Option<LngLatBounds>,
    /// Free-text search
    pub search: Option<String>,
    /// Restrict by summit state (`Some(true)` = only summited)
    pub summited: Option<bool>,
}

/// Parameters of a viewport-scoped challenge search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSearchQuery {
    pub kind: ChallengeKind,
    pub bbox: Option<LngLatBounds>,
    pub search: Option<String>,
}

impl Default for ChallengeSearchQuery {
    fn default() -> Self {
        Self {
            kind: ChallengeKind::Official,
            bbox: None,
            search: None,
        }
    }
}

/// Trait for viewport-scoped discovery search backends
pub trait DiscoveryApi: Send + Sync {
    /// Search peaks, optionally scoped to a bounding box
    fn search_peaks(
        &self,
        query: &PeakSearchQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Peak>, ApiError>> + Send;

    /// Search challenges with the user's progress attached
    fn search_challenges(
        &self,
        query: &ChallengeSearchQuery,
    ) -> impl std::future::Future<Output = Result<Vec<ChallengeProgress>, ApiError>> + Send;
}

/// Trait for entity detail backends
///
/// `Ok(None)` is the explicit not-found/unauthorized signal.
pub trait DetailApi: Send + Sync {
    fn fetch_peak(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<PeakDetail>, ApiError>> + Send;

    fn fetch_challenge(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChallengeDetail>, ApiError>> + Send;

    fn fetch_activity(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ActivityDetail>, ApiError>> + Send;

    fn fetch_profile(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ProfileDetail>, ApiError>> + Send;

    fn fetch_user_challenge(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserChallengeDetail>, ApiError>> + Send;
}
