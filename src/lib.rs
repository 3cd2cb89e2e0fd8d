//! PeakMap - Map Synchronization Engine
//!
//! A library that keeps four independently-changing things consistent for a
//! peak/challenge discovery application: the current route, the map camera and
//! viewport, the geometry sources rendered on the map, and the results of
//! viewport-scoped backend queries. Hosts embed the engine and wire their
//! concrete map widget to the [`surface::MapSurface`] trait and their backend
//! transport to the [`api`] traits.

pub mod api;
pub mod camera;
pub mod config;
pub mod discovery;
pub mod freshness;
pub mod geometry;
pub mod hover;
pub mod model;
pub mod overlay;
pub mod routes;
pub mod sources;
pub mod surface;

// Re-export commonly used types
pub use camera::CameraCoordinator;
pub use config::EngineConfig;
pub use discovery::DiscoveryEngine;
pub use freshness::FreshnessSource;
pub use hover::HoverOverlay;
pub use overlay::OverlayOrchestrator;
pub use routes::{ContentType, RouteState};
pub use sources::SourceRegistry;
pub use surface::{MapSurface, MemorySurface};
