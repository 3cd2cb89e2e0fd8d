//! Route resolution.
//!
//! Pure, total mapping from an application path to the content being viewed.
//! Grammar: `/peaks/:id`, `/challenges/:id`, `/activities/:id`, `/users/:id`,
//! `/users/:id/challenges/:id`; everything else resolves to discovery.

use serde::{Deserialize, Serialize};

/// What kind of content the current route shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    /// Default browsing mode over the current viewport
    #[default]
    Discovery,
    Peak,
    Challenge,
    Activity,
    Profile,
    UserChallenge,
}

/// Entity identifiers carried by the route, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityIds {
    pub peak_id: Option<String>,
    pub challenge_id: Option<String>,
    pub activity_id: Option<String>,
    pub user_id: Option<String>,
}

/// The resolved route. Immutable per evaluation; recomputed on navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteState {
    pub content_type: ContentType,
    pub entity_ids: EntityIds,
    /// Whether the route shows a detail view rather than discovery
    pub has_detail: bool,
}

impl RouteState {
    fn discovery() -> Self {
        Self::default()
    }

    fn detail(content_type: ContentType, entity_ids: EntityIds) -> Self {
        Self {
            content_type,
            entity_ids,
            has_detail: true,
        }
    }
}

/// Default sub-tab of a detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailTab {
    Conditions,
    Progress,
    Details,
    Summits,
}

/// Resolve a path string into route state.
///
/// Query strings, fragments, and trailing slashes are ignored. A path with
/// an empty id segment resolves to discovery rather than a detail view with
/// an empty id. Precedence when shapes overlap: peak > challenge > activity >
/// user-challenge > profile > discovery.
pub fn resolve(path: &str) -> RouteState {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["peaks", id] => RouteState::detail(
            ContentType::Peak,
            EntityIds {
                peak_id: Some((*id).to_string()),
                ..Default::default()
            },
        ),
        ["challenges", id] => RouteState::detail(
            ContentType::Challenge,
            EntityIds {
                challenge_id: Some((*id).to_string()),
                ..Default::default()
            },
        ),
        ["activities", id] => RouteState::detail(
            ContentType::Activity,
            EntityIds {
                activity_id: Some((*id).to_string()),
                ..Default::default()
            },
        ),
        ["users", user_id, "challenges", challenge_id] => RouteState::detail(
            ContentType::UserChallenge,
            EntityIds {
                user_id: Some((*user_id).to_string()),
                challenge_id: Some((*challenge_id).to_string()),
                ..Default::default()
            },
        ),
        ["users", id] => RouteState::detail(
            ContentType::Profile,
            EntityIds {
                user_id: Some((*id).to_string()),
                ..Default::default()
            },
        ),
        _ => RouteState::discovery(),
    }
}

/// Default sub-tab for a content type; `None` for discovery.
pub fn default_tab(content_type: ContentType) -> Option<DetailTab> {
    match content_type {
        ContentType::Discovery => None,
        ContentType::Peak => Some(DetailTab::Conditions),
        ContentType::Challenge => Some(DetailTab::Progress),
        ContentType::Activity => Some(DetailTab::Details),
        ContentType::Profile => Some(DetailTab::Summits),
        ContentType::UserChallenge => Some(DetailTab::Progress),
    }
}
