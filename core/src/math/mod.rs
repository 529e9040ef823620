pub mod sampling;

pub use sampling::{argmin_abs, linspace};
