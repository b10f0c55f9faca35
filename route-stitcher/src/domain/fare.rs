//! Fare calculation over stitched trip distance.
//!
//! A flat base fare covers the first few kilometres; each kilometre after
//! that adds a constant rate. The discounted fare is a fixed fraction of the
//! regular fare.

use serde::Serialize;

/// Fare formula parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareSchedule {
    /// Fare charged for any trip up to `base_km`.
    pub base_fare: f64,
    /// Distance covered by the base fare, in kilometres.
    pub base_km: f64,
    /// Rate per kilometre beyond `base_km`.
    pub per_km: f64,
    /// Fraction of the regular fare paid with a discount.
    pub discount_rate: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            base_fare: 13.0,
            base_km: 4.0,
            per_km: 1.80,
            discount_rate: 0.80,
        }
    }
}

/// Regular and discounted fare for one trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fare {
    pub regular: f64,
    pub discounted: f64,
}

impl FareSchedule {
    /// Regular fare for a trip of `km` kilometres.
    ///
    /// Negative or non-finite distances are charged the base fare.
    pub fn fare(&self, km: f64) -> f64 {
        if !km.is_finite() || km <= self.base_km {
            self.base_fare
        } else {
            self.base_fare + (km - self.base_km) * self.per_km
        }
    }

    /// Discounted price for a regular fare.
    pub fn discounted(&self, fare: f64) -> f64 {
        fare * self.discount_rate
    }

    /// Both fares for a trip of `km` kilometres.
    pub fn quote(&self, km: f64) -> Fare {
        let regular = self.fare(km);
        Fare {
            regular,
            discounted: self.discounted(regular),
        }
    }
}

/// Regular fare under the default schedule.
pub fn fare(km: f64) -> f64 {
    FareSchedule::default().fare(km)
}

/// Discounted fare under the default schedule.
pub fn discounted(fare: f64) -> f64 {
    FareSchedule::default().discounted(fare)
}
