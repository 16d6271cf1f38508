//! Delivery distance, ETA and window estimation

pub mod estimator;

pub use estimator::{haversine_meters, DeliveryEstimator, LegEstimate, EARTH_RADIUS_M};
