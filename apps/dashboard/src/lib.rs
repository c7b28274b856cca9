// Export our modules for use in binaries and tests
pub mod config;
pub mod display;
pub mod domain;
pub mod sim;

pub use domain::{CoupletStatus, EfRating, VelocityDirection};
