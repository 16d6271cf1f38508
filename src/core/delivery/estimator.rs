//! Distance and ETA estimation
//!
//! Great-circle (haversine) distance at a fixed average courier speed.
//! A split cart arrives with its slowest leg.

use crate::config::DeliveryConfig;
use crate::domain::{DeliveryEstimate, GeoPoint, VendorDelivery, VendorId};
use chrono::{DateTime, Duration, Utc};

/// Mean Earth radius in metres
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Shortest possible trip, in seconds
const MIN_TRIP_SECONDS: f64 = 60.0;

/// Haversine distance between two points, in metres
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let s1 = (d_lat / 2.0).sin();
    let s2 = (d_lng / 2.0).sin();
    let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Distance and ETA of a single leg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegEstimate {
    /// Rounded to 2 decimals
    pub distance_km: f64,
    /// Rounded to 1 decimal, never below one minute
    pub eta_minutes: f64,
}

/// Delivery estimator for one customer location
#[derive(Debug, Clone)]
pub struct DeliveryEstimator {
    customer: GeoPoint,
    speed_mps: f64,
    window: Duration,
}

impl DeliveryEstimator {
    pub fn new(customer: GeoPoint, average_speed_kmh: f64, window_minutes: i64) -> Self {
        Self {
            customer,
            speed_mps: average_speed_kmh * 1000.0 / 3600.0,
            window: Duration::minutes(window_minutes),
        }
    }

    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(
            config.customer_location(),
            config.average_speed_kmh,
            config.window_minutes,
        )
    }

    pub fn customer(&self) -> GeoPoint {
        self.customer
    }

    /// Distance and ETA from `from` to `to`
    pub fn estimate(&self, from: GeoPoint, to: GeoPoint) -> LegEstimate {
        let meters = haversine_meters(from, to);
        let seconds = (meters / self.speed_mps).round().max(MIN_TRIP_SECONDS);
        LegEstimate {
            distance_km: round_to(meters / 1000.0, 2),
            eta_minutes: round_to(seconds / 60.0, 1),
        }
    }

    /// Delivery estimate for a cart
    ///
    /// `vendors` lists every known vendor in canonical order with its
    /// location; a vendor without one is assumed to sit at the customer.
    /// The overall ETA is the maximum over `vendors_used` (zero when none).
    pub fn estimate_cart(
        &self,
        vendors: &[(VendorId, Option<GeoPoint>)],
        vendors_used: &[VendorId],
        now: DateTime<Utc>,
    ) -> DeliveryEstimate {
        let eta_by_vendor: Vec<VendorDelivery> = vendors
            .iter()
            .map(|(vendor, location)| {
                let leg = self.estimate(location.unwrap_or(self.customer), self.customer);
                VendorDelivery {
                    vendor: vendor.clone(),
                    distance_km: leg.distance_km,
                    eta_minutes: leg.eta_minutes,
                }
            })
            .collect();

        let per_vendor: Vec<VendorDelivery> = vendors_used
            .iter()
            .filter_map(|used| eta_by_vendor.iter().find(|d| &d.vendor == used).cloned())
            .collect();

        let eta_minutes = per_vendor
            .iter()
            .map(|d| d.eta_minutes)
            .fold(0.0_f64, f64::max);

        let window_start = now + Duration::milliseconds((eta_minutes * 60_000.0).round() as i64);
        let window_end = window_start + self.window;

        DeliveryEstimate {
            eta_minutes,
            window_start,
            window_end,
            per_vendor,
            eta_by_vendor,
        }
    }
}

impl Default for DeliveryEstimator {
    fn default() -> Self {
        Self::from_config(&DeliveryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MUMBAI: GeoPoint = GeoPoint::new(19.076, 72.8777);
    const PUNE: GeoPoint = GeoPoint::new(18.5204, 73.8567);
    const DELHI: GeoPoint = GeoPoint::new(28.6139, 77.209);

    fn vendor(id: &str) -> VendorId {
        VendorId::new(id).unwrap()
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_meters(MUMBAI, MUMBAI), 0.0);
    }

    #[test]
    fn test_haversine_mumbai_pune() {
        let km = haversine_meters(MUMBAI, PUNE) / 1000.0;
        assert!((km - 120.0).abs() < 2.0, "got {km}");
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let there = haversine_meters(MUMBAI, DELHI);
        let back = haversine_meters(DELHI, MUMBAI);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn test_same_location_has_one_minute_floor() {
        let leg = DeliveryEstimator::default().estimate(MUMBAI, MUMBAI);
        assert_eq!(leg.distance_km, 0.0);
        assert_eq!(leg.eta_minutes, 1.0);
    }

    #[test]
    fn test_eta_at_25_kmh() {
        let estimator = DeliveryEstimator::default();
        let leg = estimator.estimate(PUNE, MUMBAI);
        // ~120 km at 25 km/h is a bit under five hours
        let expected = leg.distance_km / 25.0 * 60.0;
        assert!((leg.eta_minutes - expected).abs() < 0.5);
    }

    #[test]
    fn test_cart_eta_is_slowest_used_leg() {
        let estimator = DeliveryEstimator::default();
        let vendors = vec![
            (vendor("site-a"), Some(MUMBAI)),
            (vendor("site-b"), Some(PUNE)),
            (vendor("site-c"), Some(DELHI)),
        ];
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();

        let estimate =
            estimator.estimate_cart(&vendors, &[vendor("site-a"), vendor("site-b")], now);

        assert_eq!(estimate.eta_by_vendor.len(), 3);
        assert_eq!(estimate.per_vendor.len(), 2);
        assert_eq!(estimate.eta_minutes, estimate.per_vendor[1].eta_minutes);
        assert!(estimate.window_start > now);
        assert_eq!(estimate.window_end - estimate.window_start, Duration::minutes(20));
    }

    #[test]
    fn test_cart_without_vendors_has_zero_eta() {
        let estimator = DeliveryEstimator::default();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let estimate = estimator.estimate_cart(&[(vendor("site-a"), None)], &[], now);

        assert_eq!(estimate.eta_minutes, 0.0);
        assert_eq!(estimate.window_start, now);
        assert_eq!(estimate.eta_by_vendor[0].eta_minutes, 1.0);
    }
}
