pub use crate::catalog::{CatalogEntry, CatalogError, ImageCatalog};
pub use crate::route::{LoopSpec, RouteConfig, RouteError, RoutePlan};
