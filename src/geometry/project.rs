//! Pure projection of domain entities into feature collections.
//!
//! Every function here is a total, synchronous transform; writing the result
//! to a map source is the caller's concern.

use crate::geometry::{Feature, FeatureCollection, Geometry, LngLat};
use crate::model::{Activity, ChallengeProgress, Peak, Summit};
use serde_json::json;

fn peak_properties(peak: &Peak) -> serde_json::Value {
    json!({
        "kind": "peak",
        "id": peak.id,
        "name": peak.name,
        "elevation_m": peak.elevation_m,
        "summited": peak.summited,
        "favorited": peak.favorited,
    })
}

fn peak_feature(peak: &Peak) -> Feature {
    Feature::point(peak.id.clone(), peak.coords, peak_properties(peak))
}

/// Projects peaks into one collection.
pub fn peak_features(peaks: &[Peak]) -> FeatureCollection {
    FeatureCollection::new(peaks.iter().map(peak_feature).collect())
}

/// Splits peaks into (unsummited, summited) collections so the surface can
/// style the two sets independently.
pub fn partition_peaks(peaks: &[Peak]) -> (FeatureCollection, FeatureCollection) {
    let (summited, unsummited): (Vec<&Peak>, Vec<&Peak>) =
        peaks.iter().partition(|p| p.summited);
    (
        FeatureCollection::new(unsummited.into_iter().map(peak_feature).collect()),
        FeatureCollection::new(summited.into_iter().map(peak_feature).collect()),
    )
}

/// Projects the single peak shown by a peak detail view.
pub fn selected_peak_features(peak: &Peak) -> FeatureCollection {
    FeatureCollection::new(vec![peak_feature(peak)])
}

/// Projects a challenge's peaks, marking which ones are completed.
pub fn challenge_peak_features(peaks: &[Peak], completed_peak_ids: &[String]) -> FeatureCollection {
    let features = peaks
        .iter()
        .map(|peak| {
            let mut feature = peak_feature(peak);
            let completed =
                peak.summited || completed_peak_ids.iter().any(|id| id == &peak.id);
            feature.properties["completed"] = json!(completed);
            feature
        })
        .collect();
    FeatureCollection::new(features)
}

/// Projects challenge search results (one point per challenge center).
///
/// Challenges without a center coordinate are omitted; they are still present
/// in the result set for list rendering.
pub fn challenge_features(challenges: &[ChallengeProgress]) -> FeatureCollection {
    let features = challenges
        .iter()
        .filter_map(|progress| {
            let center = progress.challenge.center?;
            Some(Feature::point(
                progress.challenge.id.clone(),
                center,
                json!({
                    "kind": "challenge",
                    "id": progress.challenge.id,
                    "name": progress.challenge.name,
                    "peak_count": progress.challenge.peak_count,
                    "completed_count": progress.completed_count,
                }),
            ))
        })
        .collect();
    FeatureCollection::new(features)
}

/// Projects a user's summits as point features.
pub fn summit_features(summits: &[Summit]) -> FeatureCollection {
    let features = summits
        .iter()
        .map(|summit| {
            Feature::point(
                summit.peak_id.clone(),
                summit.coords,
                json!({
                    "kind": "summit",
                    "peak_id": summit.peak_id,
                    "peak_name": summit.peak_name,
                    "summited_at": summit.summited_at.to_rfc3339(),
                }),
            )
        })
        .collect();
    FeatureCollection::new(features)
}

/// Projects an activity as its track line plus one point per summit.
pub fn activity_features(activity: &Activity) -> FeatureCollection {
    let mut features = Vec::new();
    if activity.track.len() >= 2 {
        features.push(Feature {
            id: Some(activity.id.clone()),
            geometry: Geometry::line(&activity.track),
            properties: json!({
                "kind": "track",
                "id": activity.id,
                "title": activity.title,
            }),
        });
    }
    features.extend(summit_features(&activity.summits).features);
    FeatureCollection::new(features)
}

/// Coordinates an activity occupies, used for camera fitting.
pub fn activity_focus_points(activity: &Activity) -> Vec<LngLat> {
    if !activity.track.is_empty() {
        return activity.track.clone();
    }
    activity.summits.iter().map(|s| s.coords).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn peak(id: &str, summited: bool) -> Peak {
        Peak {
            id: id.to_string(),
            name: format!("Peak {id}"),
            coords: LngLat::new(7.0, 46.0),
            elevation_m: Some(3000.0),
            summited,
            favorited: false,
        }
    }

    #[test]
    fn test_partition_peaks() {
        let peaks = vec![peak("p1", false), peak("p2", true), peak("p3", false)];
        let (unsummited, summited) = partition_peaks(&peaks);
        assert_eq!(unsummited.len(), 2);
        assert_eq!(summited.len(), 1);
        assert_eq!(summited.features[0].id.as_deref(), Some("p2"));
    }

    #[test]
    fn test_challenge_peak_features_marks_completed() {
        let peaks = vec![peak("p1", false), peak("p2", false)];
        let completed = vec!["p2".to_string()];
        let collection = challenge_peak_features(&peaks, &completed);
        assert_eq!(collection.features[0].properties["completed"], false);
        assert_eq!(collection.features[1].properties["completed"], true);
    }

    #[test]
    fn test_activity_features_skips_short_track() {
        let activity = Activity {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            title: "Morning hike".to_string(),
            date: Utc::now(),
            track: vec![LngLat::new(7.0, 46.0)],
            summits: vec![],
        };
        assert!(activity_features(&activity).is_empty());
        assert_eq!(activity_focus_points(&activity).len(), 1);
    }
}
