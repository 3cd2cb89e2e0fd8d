//! Camera moves and layout-aware viewport padding.
//!
//! Padding keeps the visible map clear of whatever chrome the host layout
//! currently shows (bottom sheet on mobile, side panel on desktop). Camera
//! moves are one-shot intents; the fit-once guard makes sure a detail view
//! fits the camera a single time per entity, never again on re-renders of
//! the same entity.

use crate::geometry::{LngLat, LngLatBounds};
use crate::surface::{MapSurface, Padding};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Bottom-sheet snap heights on mobile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawerHeight {
    #[default]
    Collapsed,
    Half,
    Full,
}

/// Side-panel state on desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Collapsed,
    #[default]
    Expanded,
}

/// The host's current layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum LayoutMode {
    /// Bottom sheet over the map
    Mobile { drawer: DrawerHeight },
    /// Side panel next to the map
    Desktop { panel: PanelState },
}

impl Default for LayoutMode {
    fn default() -> Self {
        LayoutMode::Desktop {
            panel: PanelState::Expanded,
        }
    }
}

/// Pixel sizes of the layout chrome, used to compute padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddingConfig {
    pub drawer_collapsed_px: f32,
    pub drawer_half_px: f32,
    pub drawer_full_px: f32,
    pub panel_collapsed_px: f32,
    pub panel_expanded_px: f32,
    pub panel_margin_px: f32,
    /// Extra clearance added on the padded side
    pub buffer_px: f32,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            drawer_collapsed_px: 88.0,
            drawer_half_px: 320.0,
            drawer_full_px: 560.0,
            panel_collapsed_px: 56.0,
            panel_expanded_px: 384.0,
            panel_margin_px: 16.0,
            buffer_px: 24.0,
        }
    }
}

/// Compute the camera inset for the current layout.
pub fn compute_padding(layout: LayoutMode, config: &PaddingConfig) -> Padding {
    match layout {
        LayoutMode::Mobile { drawer } => {
            let drawer_px = match drawer {
                DrawerHeight::Collapsed => config.drawer_collapsed_px,
                DrawerHeight::Half => config.drawer_half_px,
                DrawerHeight::Full => config.drawer_full_px,
            };
            Padding {
                bottom: drawer_px + config.buffer_px,
                ..Default::default()
            }
        }
        LayoutMode::Desktop { panel } => {
            let panel_px = match panel {
                PanelState::Collapsed => config.panel_collapsed_px,
                PanelState::Expanded => config.panel_expanded_px,
            };
            Padding {
                left: panel_px + config.panel_margin_px + config.buffer_px,
                ..Default::default()
            }
        }
    }
}

/// Issues camera moves against the surface, at most one fit per entity view.
pub struct CameraCoordinator {
    surface: Arc<dyn MapSurface>,
    /// Entity id the last fit was issued for
    last_fit_entity: Mutex<Option<String>>,
    padding_config: PaddingConfig,
    default_detail_zoom: f64,
    fit_max_zoom: f64,
}

impl CameraCoordinator {
    pub fn new(
        surface: Arc<dyn MapSurface>,
        padding_config: PaddingConfig,
        default_detail_zoom: f64,
        fit_max_zoom: f64,
    ) -> Self {
        Self {
            surface,
            last_fit_entity: Mutex::new(None),
            padding_config,
            default_detail_zoom,
            fit_max_zoom,
        }
    }

    /// Recompute and apply padding for a layout change.
    pub fn apply_layout(&self, layout: LayoutMode) {
        self.surface
            .set_padding(compute_padding(layout, &self.padding_config));
    }

    /// Fit the camera to `points`, at most once per distinct `entity_id`.
    ///
    /// Returns `true` when a camera move was issued. A repeated call with the
    /// same id is a no-op; a call with a different id fits exactly once for
    /// the new id.
    pub fn fit_once(&self, entity_id: &str, points: &[LngLat]) -> bool {
        {
            let mut last = self.last_fit_entity.lock().expect("camera guard poisoned");
            if last.as_deref() == Some(entity_id) {
                return false;
            }
            *last = Some(entity_id.to_string());
        }
        tracing::debug!(entity = entity_id, "fitting camera");
        self.fit(points);
        true
    }

    /// Explicit user-triggered re-centering; bypasses the fit-once guard.
    pub fn show_on_map(&self, points: &[LngLat]) {
        self.fit(points);
    }

    /// Forget the last fitted entity, so the next view of it fits again.
    pub fn reset(&self) {
        *self.last_fit_entity.lock().expect("camera guard poisoned") = None;
    }

    /// Fit to multi-point bounds, or fly to the single/center point when the
    /// bounds are degenerate or invalid.
    fn fit(&self, points: &[LngLat]) {
        match LngLatBounds::around(points) {
            Some(bounds) if bounds.is_valid() => {
                self.surface.fit_bounds(bounds, self.fit_max_zoom);
            }
            Some(bounds) => {
                self.surface
                    .fly_to(bounds.center(), self.default_detail_zoom, 0.0, 0.0);
            }
            None => {
                if let Some(point) = points.iter().find(|p| p.is_valid()) {
                    self.surface
                        .fly_to(*point, self.default_detail_zoom, 0.0, 0.0);
                }
            }
        }
    }
}
