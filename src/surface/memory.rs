//! In-memory rendering surface.
//!
//! Implements [`MapSurface`] with plain data structures and a camera call
//! log. Used headless (server-side rendering of engine state, tests) and as
//! the reference implementation of the contract's soft-failure behavior.

use super::{MapSurface, Padding, Viewport};
use crate::geometry::{FeatureCollection, LngLat, LngLatBounds};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A camera operation the surface was asked to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCall {
    FlyTo {
        center: LngLat,
        zoom: f64,
        pitch: f64,
        bearing: f64,
    },
    FitBounds {
        bounds: LngLatBounds,
        max_zoom: f64,
    },
}

#[derive(Debug)]
struct MemoryState {
    attached: bool,
    sources: BTreeMap<String, FeatureCollection>,
    viewport: Viewport,
    padding: Padding,
    camera_calls: Vec<CameraCall>,
}

/// In-memory [`MapSurface`] implementation.
#[derive(Debug)]
pub struct MemorySurface {
    state: Mutex<MemoryState>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Create an attached surface with a world-spanning viewport at zoom 1.
    pub fn new() -> Self {
        let viewport = Viewport {
            bounds: LngLatBounds::new(LngLat::new(-180.0, 85.0), LngLat::new(180.0, -85.0)),
            zoom: 1.0,
        };
        Self {
            state: Mutex::new(MemoryState {
                attached: true,
                sources: BTreeMap::new(),
                viewport,
                padding: Padding::default(),
                camera_calls: Vec::new(),
            }),
        }
    }

    /// Move the viewport, as a user pan/zoom would.
    pub fn set_viewport(&self, bounds: LngLatBounds, zoom: f64) {
        let mut state = self.state.lock().expect("surface state poisoned");
        state.viewport = Viewport { bounds, zoom };
    }

    /// Simulate surface teardown; all writes become no-ops.
    pub fn detach(&self) {
        self.state.lock().expect("surface state poisoned").attached = false;
    }

    /// Re-attach a detached surface.
    pub fn attach(&self) {
        self.state.lock().expect("surface state poisoned").attached = true;
    }

    /// Current contents of a source, if it exists.
    pub fn source_data(&self, id: &str) -> Option<FeatureCollection> {
        self.state
            .lock()
            .expect("surface state poisoned")
            .sources
            .get(id)
            .cloned()
    }

    /// Names of all existing sources.
    pub fn source_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("surface state poisoned")
            .sources
            .keys()
            .cloned()
            .collect()
    }

    /// Every camera operation performed so far, oldest first.
    pub fn camera_calls(&self) -> Vec<CameraCall> {
        self.state
            .lock()
            .expect("surface state poisoned")
            .camera_calls
            .clone()
    }

    /// Currently applied padding.
    pub fn padding(&self) -> Padding {
        self.state.lock().expect("surface state poisoned").padding
    }
}

impl MapSurface for MemorySurface {
    fn is_attached(&self) -> bool {
        self.state.lock().expect("surface state poisoned").attached
    }

    fn has_source(&self, id: &str) -> bool {
        self.state
            .lock()
            .expect("surface state poisoned")
            .sources
            .contains_key(id)
    }

    fn add_source(&self, id: &str) -> bool {
        let mut state = self.state.lock().expect("surface state poisoned");
        if !state.attached {
            return false;
        }
        state
            .sources
            .entry(id.to_string())
            .or_insert_with(FeatureCollection::empty);
        true
    }

    fn set_source_data(&self, id: &str, data: FeatureCollection) -> bool {
        let mut state = self.state.lock().expect("surface state poisoned");
        if !state.attached {
            return false;
        }
        match state.sources.get_mut(id) {
            Some(existing) => {
                *existing = data;
                true
            }
            None => false,
        }
    }

    fn remove_source(&self, id: &str) -> bool {
        let mut state = self.state.lock().expect("surface state poisoned");
        if !state.attached {
            return false;
        }
        state.sources.remove(id).is_some()
    }

    fn viewport(&self) -> Option<Viewport> {
        let state = self.state.lock().expect("surface state poisoned");
        state.attached.then_some(state.viewport)
    }

    fn set_padding(&self, padding: Padding) {
        let mut state = self.state.lock().expect("surface state poisoned");
        if state.attached {
            state.padding = padding;
        }
    }

    fn fly_to(&self, center: LngLat, zoom: f64, pitch: f64, bearing: f64) {
        let mut state = self.state.lock().expect("surface state poisoned");
        if state.attached {
            state.camera_calls.push(CameraCall::FlyTo {
                center,
                zoom,
                pitch,
                bearing,
            });
        }
    }

    fn fit_bounds(&self, bounds: LngLatBounds, max_zoom: f64) {
        let mut state = self.state.lock().expect("surface state poisoned");
        if state.attached {
            state
                .camera_calls
                .push(CameraCall::FitBounds { bounds, max_zoom });
        }
    }
}
