//! Route geometry and spectrogram catalog for the interactive cable viewer.
//!
//! The modules cover the two startup computations the viewer depends on: the
//! procedural layout of a fiber route with coiled loop sections, and the
//! distance-keyed index of per-channel spectrogram images. Both produce
//! immutable data that the rest of the process only reads.

pub mod catalog;
pub mod math;
pub mod prelude;
pub mod route;
pub mod telemetry;

pub use catalog::{CatalogEntry, CatalogError, ImageCatalog};
pub use route::{LoopSpec, RouteConfig, RouteError, RoutePlan};
