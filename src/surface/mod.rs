//! Rendering-surface contract.
//!
//! The engine never talks to a concrete map widget; it talks to [`MapSurface`].
//! Any WebGL/vector map library can satisfy the contract: named mutable
//! sources with whole-collection replacement, camera control, and viewport
//! accessors. Surface events (viewport settled, feature hover, feature click)
//! flow the other way: the host wires them to
//! [`crate::discovery::DiscoveryEngine::on_viewport_settled`],
//! [`crate::hover::HoverOverlay::set_hover`], and
//! [`crate::overlay::OverlayOrchestrator::navigate`].

pub mod memory;

pub use memory::{CameraCall, MemorySurface};

use crate::geometry::{FeatureCollection, LngLat, LngLatBounds};
use serde::{Deserialize, Serialize};

/// Current visible extent and zoom of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: LngLatBounds,
    pub zoom: f64,
}

/// Four-sided camera inset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Abstract rendering surface the engine drives.
///
/// All methods are synchronous and infallible from the engine's point of
/// view: a detached or torn-down surface reports `false`/`None` and ignores
/// writes instead of failing. Implementations handle their own interior
/// mutability so the engine can hold the surface behind `Arc<dyn MapSurface>`.
pub trait MapSurface: Send + Sync {
    /// Whether the surface is mounted and able to draw.
    fn is_attached(&self) -> bool;

    /// Whether the named source exists yet.
    ///
    /// Sources are created asynchronously during the surface's own style-load
    /// sequence, so a `false` here is often transient; see
    /// [`crate::sources::SourceRegistry`].
    fn has_source(&self, id: &str) -> bool;

    /// Create an empty named source. Returns `false` on a detached surface.
    fn add_source(&self, id: &str) -> bool;

    /// Replace the named source's entire feature collection.
    ///
    /// Returns `false` when the source does not exist or the surface is
    /// detached; the engine treats that as a soft failure.
    fn set_source_data(&self, id: &str, data: FeatureCollection) -> bool;

    /// Remove the named source. Returns `false` if it did not exist.
    fn remove_source(&self, id: &str) -> bool;

    /// Current viewport, or `None` when detached.
    fn viewport(&self) -> Option<Viewport>;

    /// Apply a camera inset.
    fn set_padding(&self, padding: Padding);

    /// Animated move to a single point.
    fn fly_to(&self, center: LngLat, zoom: f64, pitch: f64, bearing: f64);

    /// Animated fit of the viewport to `bounds`, never zooming past `max_zoom`.
    fn fit_bounds(&self, bounds: LngLatBounds, max_zoom: f64);
}
