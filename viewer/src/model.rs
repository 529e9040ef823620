use serde::{Deserialize, Serialize};

/// Route geometry payload served to the map pane. `selected` lets the client
/// highlight the current point without re-sending geometry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RouteView {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub distances_m: Vec<f64>,
    pub selected: Option<usize>,
}

/// The one piece of mutable state: the current selection, shared between the
/// map payload and the image endpoint.
#[derive(Debug, Clone, Default)]
pub struct SelectionInfo {
    pub index: usize,
    pub distance_m: f64,
    pub label: String,
    pub image: Vec<u8>,
}
