use crate::math::sampling::linspace;
use crate::route::loops::{validate_layout, LoopSpec};
use crate::route::{RouteError, RouteResult};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Layout parameters for one cable route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Fiber distance between consecutive sensing channels, meters.
    pub channel_spacing_m: f64,
    pub total_length_m: f64,
    pub loops: Vec<LoopSpec>,
}

impl RouteConfig {
    pub fn validate(&self) -> RouteResult<()> {
        if !(self.channel_spacing_m > 0.0) || !self.channel_spacing_m.is_finite() {
            return Err(RouteError::InvalidSpacing(format!(
                "channel spacing {} must be a positive number",
                self.channel_spacing_m
            )));
        }
        if !(self.total_length_m > 0.0) || !self.total_length_m.is_finite() {
            return Err(RouteError::InvalidLength(format!(
                "route length {} must be a positive number",
                self.total_length_m
            )));
        }
        validate_layout(&self.loops)
    }
}

/// Immutable route geometry plus the virtual-distance key array.
///
/// `x`/`y` are display coordinates: the walked x positions are mirrored about
/// the route length so the map reads fiber-end-first. `distances` is evenly
/// spaced over `0..=total_length` and is used only as a lookup key; it is
/// deliberately decoupled from geometric x, which loops distort.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    x: Vec<f64>,
    y: Vec<f64>,
    distances: Vec<f64>,
}

impl RoutePlan {
    pub fn generate(config: &RouteConfig) -> RouteResult<Self> {
        config.validate()?;

        let (walked_x, y) = trace_route(config)?;
        let total = config.total_length_m;
        let x: Vec<f64> = walked_x.iter().map(|&value| total - value).collect();
        let distances = linspace(0.0, total, x.len());

        LogManager::new("route").record(&format!(
            "route laid out: {} points, {} loops",
            x.len(),
            config.loops.len()
        ));

        Ok(Self { x, y, distances })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Virtual distance of the route point at `index`, if in range.
    pub fn distance_at(&self, index: usize) -> Option<f64> {
        self.distances.get(index).copied()
    }
}

/// Walks the route in channel-spacing steps, inserting a sampled circle for
/// each loop, before the display mirror is applied. Loop y-amplitude
/// alternates sign so successive coils render on opposite sides.
///
/// A loop's nominal start only gates the straight walk: the walk stops at
/// the last step strictly before it, and the coil consumes its arc length of
/// fiber from there. A start the walk has already passed, or an arc that
/// runs past the route end, would silently corrupt every coordinate after
/// it, so both are rejected here where the walked position is known.
fn trace_route(config: &RouteConfig) -> RouteResult<(Vec<f64>, Vec<f64>)> {
    let dx = config.channel_spacing_m;
    let mut x = vec![0.0];
    let mut y = vec![0.0];
    let mut current = 0.0_f64;
    let mut loop_sign = 1.0_f64;

    for (index, spec) in config.loops.iter().enumerate() {
        while current + dx < spec.start_m {
            current += dx;
            x.push(current);
            y.push(0.0);
        }

        if spec.start_m < current {
            return Err(RouteError::LoopLayout(format!(
                "loop {} at {} starts before the walked position {:.2}",
                index, spec.start_m, current
            )));
        }

        let radius = spec.arc_length_m / (2.0 * PI);
        let samples = (spec.arc_length_m / dx) as usize;
        for theta in linspace(0.0, 2.0 * PI, samples) {
            x.push(current + radius * theta.cos());
            y.push(loop_sign * radius * theta.sin());
        }

        // Advance by the arc length, not the chord: the loop consumes fiber.
        current += spec.arc_length_m;
        loop_sign = -loop_sign;

        if current > config.total_length_m {
            return Err(RouteError::LoopLayout(format!(
                "loop {} consumes fiber to {:.2} past route end {}",
                index, current, config.total_length_m
            )));
        }
    }

    while current + dx <= config.total_length_m {
        current += dx;
        x.push(current);
        y.push(0.0);
    }

    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surveyed_route() -> RouteConfig {
        let starts = [
            118.0, 147.0, 271.0, 400.0, 466.0, 510.0, 630.0, 1300.0, 1800.0,
        ];
        let lengths = [30.0, 60.0, 60.0, 30.0, 30.0, 30.0, 30.0, 60.0, 60.0];
        RouteConfig {
            channel_spacing_m: 3.19,
            total_length_m: 1920.0,
            loops: starts
                .iter()
                .zip(lengths.iter())
                .map(|(&start, &length)| LoopSpec::new(start, length))
                .collect(),
        }
    }

    #[test]
    fn straight_route_walks_in_even_steps() {
        let config = RouteConfig {
            channel_spacing_m: 1.0,
            total_length_m: 10.0,
            loops: Vec::new(),
        };
        let plan = RoutePlan::generate(&config).unwrap();
        assert_eq!(plan.len(), 11);
        assert!(plan.y().iter().all(|&value| value == 0.0));
        assert_eq!(plan.distance_at(0), Some(0.0));
        assert_eq!(plan.distance_at(10), Some(10.0));
        assert_eq!(plan.distance_at(11), None);
    }

    #[test]
    fn generation_is_deterministic() {
        let config = surveyed_route();
        let first = RoutePlan::generate(&config).unwrap();
        let second = RoutePlan::generate(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn mirrored_x_complements_walked_x() {
        let config = surveyed_route();
        let (walked_x, _) = trace_route(&config).unwrap();
        let plan = RoutePlan::generate(&config).unwrap();
        for (walked, mirrored) in walked_x.iter().zip(plan.x()) {
            assert!((walked + mirrored - config.total_length_m).abs() < 1e-9);
        }
    }

    #[test]
    fn loop_points_lie_on_expected_circle() {
        let config = RouteConfig {
            channel_spacing_m: 1.0,
            total_length_m: 100.0,
            loops: vec![LoopSpec::new(50.0, 10.0)],
        };
        let (walked_x, y) = trace_route(&config).unwrap();

        // Straight walk stops at 49, so the circle is centered there with 10
        // sample points following the 50 straight ones.
        let center = 49.0;
        let radius = 10.0 / (2.0 * PI);
        for index in 50..60 {
            let dx = walked_x[index] - center;
            let dy = y[index];
            let off_circle = (dx * dx + dy * dy).sqrt() - radius;
            assert!(off_circle.abs() < 1e-9, "point {} off circle", index);
        }
    }

    #[test]
    fn loop_sides_alternate() {
        let config = RouteConfig {
            channel_spacing_m: 1.0,
            total_length_m: 100.0,
            loops: vec![LoopSpec::new(20.0, 12.0), LoopSpec::new(60.0, 12.0)],
        };
        let plan = RoutePlan::generate(&config).unwrap();
        let max_y = plan.y().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_y = plan.y().iter().cloned().fold(f64::INFINITY, f64::min);
        let radius = 12.0 / (2.0 * PI);
        assert!(max_y > radius * 0.9);
        assert!(min_y < -radius * 0.9);
    }

    #[test]
    fn surveyed_route_matches_known_point_count() {
        let config = surveyed_route();
        let plan = RoutePlan::generate(&config).unwrap();
        assert_eq!(plan.len(), 597);
        assert_eq!(plan.distances().len(), plan.len());
        assert_eq!(plan.distance_at(0), Some(0.0));
        assert!((plan.distances()[plan.len() - 1] - 1920.0).abs() < 1e-9);
    }

    #[test]
    fn leading_straight_run_steps_by_spacing() {
        let config = surveyed_route();
        let plan = RoutePlan::generate(&config).unwrap();
        // 36 straight steps precede the first loop at 118 m.
        for index in 1..=36 {
            let step = (plan.x()[index] - plan.x()[index - 1]).abs();
            assert!((step - 3.19).abs() < 1e-9);
            assert_eq!(plan.y()[index], 0.0);
        }
    }

    #[test]
    fn generation_rejects_bad_spacing() {
        let config = RouteConfig {
            channel_spacing_m: 0.0,
            total_length_m: 10.0,
            loops: Vec::new(),
        };
        assert!(matches!(
            RoutePlan::generate(&config),
            Err(RouteError::InvalidSpacing(_))
        ));
    }

    #[test]
    fn generation_accepts_starts_inside_previous_arc_span() {
        // Surveyed-route shape: the 118 m loop nominally spans to 148 while
        // the next loop starts at 147, but the walk only reaches 144.84
        // before placing it, so generation must succeed.
        let config = RouteConfig {
            channel_spacing_m: 3.19,
            total_length_m: 400.0,
            loops: vec![LoopSpec::new(118.0, 30.0), LoopSpec::new(147.0, 60.0)],
        };
        let plan = RoutePlan::generate(&config).unwrap();
        assert!(plan.len() > 100);
    }

    #[test]
    fn generation_rejects_loop_starting_behind_walk() {
        // The first arc carries the walk to 39, well past the second start.
        let config = RouteConfig {
            channel_spacing_m: 1.0,
            total_length_m: 100.0,
            loops: vec![LoopSpec::new(10.0, 30.0), LoopSpec::new(20.0, 10.0)],
        };
        assert!(matches!(
            RoutePlan::generate(&config),
            Err(RouteError::LoopLayout(_))
        ));
    }

    #[test]
    fn generation_rejects_loop_past_route_end() {
        let config = RouteConfig {
            channel_spacing_m: 1.0,
            total_length_m: 500.0,
            loops: vec![LoopSpec::new(480.0, 30.0)],
        };
        assert!(matches!(
            RoutePlan::generate(&config),
            Err(RouteError::LoopLayout(_))
        ));
    }
}
