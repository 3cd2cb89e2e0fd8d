//! Pointer-hover highlight overlay.
//!
//! Renders a single ephemeral highlight feature while the pointer is over a
//! list row. Independent of the discovery/detail data flow: it only ever
//! touches its own dedicated source, and teardown removes that source only
//! if this manager created it.

use crate::geometry::{Feature, FeatureCollection, LngLat};
use crate::sources::PEAK_HOVER;
use crate::surface::MapSurface;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Manages the single-feature hover highlight source.
pub struct HoverOverlay {
    surface: Arc<dyn MapSurface>,
    /// Whether this manager created the hover source itself
    created_source: AtomicBool,
}

impl HoverOverlay {
    pub fn new(surface: Arc<dyn MapSurface>) -> Self {
        Self {
            surface,
            created_source: AtomicBool::new(false),
        }
    }

    /// Highlight `coords`, or clear the highlight with `None`.
    ///
    /// The hover source is created lazily on first use. The source holds at
    /// most one feature at any time; moving between rows rewrites it rather
    /// than accumulating.
    pub fn set_hover(&self, coords: Option<LngLat>) {
        match coords {
            Some(coords) => {
                if !self.surface.has_source(PEAK_HOVER) {
                    if !self.surface.add_source(PEAK_HOVER) {
                        return;
                    }
                    self.created_source.store(true, Ordering::SeqCst);
                }
                let feature = Feature::point("hover", coords, json!({ "kind": "hover" }));
                let _ = self
                    .surface
                    .set_source_data(PEAK_HOVER, FeatureCollection::new(vec![feature]));
            }
            None => self.clear(),
        }
    }

    /// Clear the highlight, leaving the source in place.
    pub fn clear(&self) {
        if self.surface.has_source(PEAK_HOVER) {
            let _ = self
                .surface
                .set_source_data(PEAK_HOVER, FeatureCollection::empty());
        }
    }

    /// Remove the hover source if this manager created it; otherwise only
    /// clear its feature, since another component owns the source itself.
    pub fn teardown(&self) {
        if self.created_source.swap(false, Ordering::SeqCst) {
            let _ = self.surface.remove_source(PEAK_HOVER);
        } else {
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn setup() -> (Arc<MemorySurface>, HoverOverlay) {
        let surface = Arc::new(MemorySurface::new());
        let overlay = HoverOverlay::new(Arc::clone(&surface) as Arc<dyn MapSurface>);
        (surface, overlay)
    }

    #[test]
    fn test_hover_holds_exactly_one_feature() {
        let (surface, overlay) = setup();

        overlay.set_hover(Some(LngLat::new(7.0, 46.0)));
        overlay.set_hover(Some(LngLat::new(8.0, 45.0)));

        let data = surface.source_data(PEAK_HOVER).expect("Source exists");
        assert_eq!(data.len(), 1);
        assert_eq!(
            data.features[0].geometry,
            crate::geometry::Geometry::point(LngLat::new(8.0, 45.0))
        );
    }

    #[test]
    fn test_clear_with_none() {
        let (surface, overlay) = setup();
        overlay.set_hover(Some(LngLat::new(7.0, 46.0)));
        overlay.set_hover(None);
        assert!(surface.source_data(PEAK_HOVER).expect("Source exists").is_empty());
    }

    #[test]
    fn test_teardown_removes_only_owned_source() {
        let (surface, overlay) = setup();
        overlay.set_hover(Some(LngLat::new(7.0, 46.0)));
        overlay.teardown();
        assert!(!surface.has_source(PEAK_HOVER));
    }

    #[test]
    fn test_teardown_keeps_shared_source() {
        let (surface, overlay) = setup();
        // Source pre-created by someone else.
        surface.add_source(PEAK_HOVER);
        overlay.set_hover(Some(LngLat::new(7.0, 46.0)));
        overlay.teardown();
        assert!(surface.has_source(PEAK_HOVER));
        assert!(surface.source_data(PEAK_HOVER).expect("Source exists").is_empty());
    }

    #[test]
    fn test_detached_surface_is_ignored() {
        let (surface, overlay) = setup();
        surface.detach();
        overlay.set_hover(Some(LngLat::new(7.0, 46.0)));
        overlay.teardown();
    }
}
