//! Domain entities for peaks, challenges, activities, and profiles.

use crate::geometry::LngLat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mountain peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Peak location
    pub coords: LngLat,
    /// Elevation in meters, if known
    pub elevation_m: Option<f64>,
    /// Whether the current user has summited this peak
    #[serde(default)]
    pub summited: bool,
    /// Whether the current user has favorited this peak
    #[serde(default)]
    pub favorited: bool,
}

/// Challenge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    /// Curated challenge maintained by the platform
    #[default]
    Official,
    /// Challenge created by a community member
    Community,
}

/// A multi-peak challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Challenge category
    #[serde(default)]
    pub kind: ChallengeKind,
    /// Optional description
    pub description: Option<String>,
    /// Number of peaks in the challenge
    pub peak_count: u32,
    /// Representative center point, if the backend provides one
    pub center: Option<LngLat>,
}

/// A challenge together with the current user's progress in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    /// The challenge
    pub challenge: Challenge,
    /// Peaks the user has summited within the challenge
    pub completed_count: u32,
}

impl ChallengeProgress {
    /// Completion ratio in `[0, 1]`; zero-peak challenges report 0.
    pub fn completion(&self) -> f64 {
        if self.challenge.peak_count == 0 {
            return 0.0;
        }
        f64::from(self.completed_count) / f64::from(self.challenge.peak_count)
    }
}

/// A recorded summit of a peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summit {
    /// Peak that was summited
    pub peak_id: String,
    /// Peak display name
    pub peak_name: String,
    /// Peak location
    pub coords: LngLat,
    /// When the summit happened
    pub summited_at: DateTime<Utc>,
}

/// A user activity (a hike/climb with an optional GPS track).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Display title
    pub title: String,
    /// Activity date
    pub date: DateTime<Utc>,
    /// GPS track, possibly empty
    #[serde(default)]
    pub track: Vec<LngLat>,
    /// Summits recorded during the activity
    #[serde(default)]
    pub summits: Vec<Summit>,
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: String,
    /// Login name
    pub username: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Lifetime summit count
    pub summit_count: u32,
}

/// Detail payload for a peak view: the peak plus its summit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDetail {
    pub peak: Peak,
    /// Recent community summits of this peak
    #[serde(default)]
    pub summits: Vec<Summit>,
}

/// Detail payload for a challenge view: the challenge plus its peaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDetail {
    pub challenge: Challenge,
    /// All peaks belonging to the challenge
    #[serde(default)]
    pub peaks: Vec<Peak>,
}

/// Detail payload for an activity view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetail {
    pub activity: Activity,
}

/// Detail payload for a profile view: the profile plus the user's summits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetail {
    pub profile: UserProfile,
    #[serde(default)]
    pub summits: Vec<Summit>,
}

/// Detail payload for one user's progress through one challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserChallengeDetail {
    /// The user whose progress is shown
    pub user_id: String,
    pub challenge: Challenge,
    /// All peaks belonging to the challenge
    #[serde(default)]
    pub peaks: Vec<Peak>,
    /// Peaks the user has completed
    #[serde(default)]
    pub completed_peak_ids: Vec<String>,
}
