//! HTTP implementation of the backend API traits.
//!
//! Talks JSON to the platform backend. Authentication (cookies/tokens) is the
//! host's concern; pass a pre-configured `reqwest::Client` when needed.

use super::{ApiError, ChallengeSearchQuery, DetailApi, DiscoveryApi, PeakSearchQuery};
use crate::model::{
    ActivityDetail, ChallengeDetail, ChallengeKind, ChallengeProgress, Peak, PeakDetail,
    ProfileDetail, UserChallengeDetail,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Backend client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApi {
    /// Create a client against `base_url` (no trailing slash required).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client reusing a host-configured `reqwest::Client`.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON payload; 404/403 map to `Ok(None)`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Ok(None),
            status if status.is_success() => response
                .json::<T>()
                .await
                .map(Some)
                .map_err(|e| ApiError::InvalidResponse(e.to_string())),
            status => Err(ApiError::ServerError(status.as_u16())),
        }
    }

    /// GET a JSON payload that must exist.
    async fn get_required<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.get_optional(path, query)
            .await?
            .ok_or_else(|| ApiError::InvalidResponse(format!("{path} returned no body")))
    }

    fn bbox_param(bbox: &Option<crate::geometry::LngLatBounds>) -> Option<(&'static str, String)> {
        bbox.map(|b| {
            (
                "bbox",
                format!(
                    "{},{},{},{}",
                    b.north_west.lng, b.south_east.lat, b.south_east.lng, b.north_west.lat
                ),
            )
        })
    }
}

impl DiscoveryApi for HttpApi {
    async fn search_peaks(&self, query: &PeakSearchQuery) -> Result<Vec<Peak>, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(bbox) = Self::bbox_param(&query.bbox) {
            params.push(bbox);
        }
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        if let Some(summited) = query.summited {
            params.push(("summited", summited.to_string()));
        }
        self.get_required("/peaks/search", &params).await
    }

    async fn search_challenges(
        &self,
        query: &ChallengeSearchQuery,
    ) -> Result<Vec<ChallengeProgress>, ApiError> {
        let kind = match query.kind {
            ChallengeKind::Official => "official",
            ChallengeKind::Community => "community",
        };
        let mut params: Vec<(&str, String)> = vec![("type", kind.to_string())];
        if let Some(bbox) = Self::bbox_param(&query.bbox) {
            params.push(bbox);
        }
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        self.get_required("/challenges/search", &params).await
    }
}

impl DetailApi for HttpApi {
    async fn fetch_peak(&self, id: &str) -> Result<Option<PeakDetail>, ApiError> {
        self.get_optional(&format!("/peaks/{id}"), &[]).await
    }

    async fn fetch_challenge(&self, id: &str) -> Result<Option<ChallengeDetail>, ApiError> {
        self.get_optional(&format!("/challenges/{id}"), &[]).await
    }

    async fn fetch_activity(&self, id: &str) -> Result<Option<ActivityDetail>, ApiError> {
        self.get_optional(&format!("/activities/{id}"), &[]).await
    }

    async fn fetch_profile(&self, id: &str) -> Result<Option<ProfileDetail>, ApiError> {
        self.get_optional(&format!("/users/{id}"), &[]).await
    }

    async fn fetch_user_challenge(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<UserChallengeDetail>, ApiError> {
        self.get_optional(&format!("/users/{user_id}/challenges/{challenge_id}"), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let api = HttpApi::new("https://api.example.com/");
        assert_eq!(api.url("/peaks/p1"), "https://api.example.com/peaks/p1");
    }

    #[test]
    fn test_bbox_param_order_is_w_s_e_n() {
        use crate::geometry::{LngLat, LngLatBounds};
        let bounds = LngLatBounds::new(LngLat::new(6.0, 47.0), LngLat::new(8.0, 45.0));
        let (key, value) = HttpApi::bbox_param(&Some(bounds)).expect("Should build param");
        assert_eq!(key, "bbox");
        assert_eq!(value, "6,45,8,47");
    }
}
