// Export our modules for use in the server binary and tests
pub mod error;
pub mod model;
pub mod routes;
pub mod schema;

pub use error::{ApiError, UpdateError};
pub use model::{round2, BaseFields, CoupletTrend, DerivedFields, RadarRecord};
pub use routes::{router, SharedRecord};
