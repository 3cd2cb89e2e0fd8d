//! Overlay orchestration: reconciling route, data, sources, and camera.
//!
//! The orchestrator is the one component that owns transitions. On every
//! route change it derives the content type, suppresses or re-enables
//! discovery, clears the sources the outgoing state owned, fetches the
//! incoming entity, projects it, and drives the camera once. Entry and exit
//! actions are symmetric: whatever entering a state writes or disables,
//! leaving it undoes.

pub mod orchestrator;

pub use orchestrator::OverlayOrchestrator;

use crate::model::{
    ActivityDetail, ChallengeDetail, PeakDetail, ProfileDetail, UserChallengeDetail,
};
use crate::routes::ContentType;

/// The loaded entity behind a detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailContent {
    Peak(PeakDetail),
    Challenge(ChallengeDetail),
    Activity(ActivityDetail),
    Profile(ProfileDetail),
    UserChallenge(UserChallengeDetail),
}

/// Lifecycle of the current detail view.
///
/// `Missing` is an explicit terminal state ("may be private or doesn't
/// exist"), never conflated with `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPhase {
    Loading,
    Loaded(DetailContent),
    Missing,
}

/// Orchestrator state changes streamed to the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// Back in the default browsing mode
    EnteredDiscovery,
    DetailLoading { content_type: ContentType },
    DetailLoaded { content_type: ContentType },
    /// The entity is not visible: not found or unauthorized
    DetailMissing { content_type: ContentType },
    /// The detail fetch failed in transit
    DetailFailed {
        content_type: ContentType,
        message: String,
    },
}
