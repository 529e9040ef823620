use crate::route::{RouteError, RouteResult};
use serde::{Deserialize, Serialize};

/// A coiled section of the cable: a full circular excursion that begins at a
/// distance along the fiber and consumes `arc_length_m` meters of it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoopSpec {
    pub start_m: f64,
    pub arc_length_m: f64,
}

impl LoopSpec {
    pub fn new(start_m: f64, arc_length_m: f64) -> Self {
        Self {
            start_m,
            arc_length_m,
        }
    }
}

/// Static checks on the loop list: non-negative starts, positive arc
/// lengths, strictly increasing start order.
///
/// A loop's nominal start only gates the straight walk, so starts may sit
/// closer together than the previous loop's arc length; whether a start has
/// already been passed depends on the channel spacing and is checked during
/// generation, where the walked position is known.
pub fn validate_layout(loops: &[LoopSpec]) -> RouteResult<()> {
    for (index, spec) in loops.iter().enumerate() {
        if spec.start_m < 0.0 || spec.arc_length_m <= 0.0 {
            return Err(RouteError::LoopLayout(format!(
                "loop {} has start {} and arc length {}",
                index, spec.start_m, spec.arc_length_m
            )));
        }
        if let Some(next) = loops.get(index + 1) {
            if next.start_m <= spec.start_m {
                return Err(RouteError::LoopLayout(format!(
                    "loop {} start {} does not increase past loop {} start {}",
                    index + 1,
                    next.start_m,
                    index,
                    spec.start_m
                )));
            }
        }
    }
    Ok(())
}
