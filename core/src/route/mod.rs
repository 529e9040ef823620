pub mod layout;
pub mod loops;

pub use layout::{RouteConfig, RoutePlan};
pub use loops::LoopSpec;

/// Errors raised while validating or laying out a route.
#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    #[error("invalid spacing: {0}")]
    InvalidSpacing(String),
    #[error("invalid length: {0}")]
    InvalidLength(String),
    #[error("loop layout: {0}")]
    LoopLayout(String),
}

pub type RouteResult<T> = Result<T, RouteError>;
