pub mod api;

#[allow(unused_imports)]
pub use api::{ApiError, CacheStatus, CachedPayload, ParkingClient};
