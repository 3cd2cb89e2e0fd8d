//! Geometry primitives and projection of domain entities onto map sources.

pub mod features;
pub mod project;

pub use features::{Feature, FeatureCollection, Geometry, LngLat, LngLatBounds};
pub use project::{
    activity_features, activity_focus_points, challenge_features, challenge_peak_features,
    partition_peaks, peak_features, selected_peak_features, summit_features,
};
