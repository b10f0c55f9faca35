//! Matching thresholds for the route composer.

/// Distance thresholds for the case ladder, in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// A segment is a start candidate when the origin is within this distance.
    pub start_radius_m: f64,

    /// A segment is an end candidate when the destination is within this distance.
    pub end_radius_m: f64,

    /// A segment "reaches" the destination within this distance.
    pub reach_threshold_m: f64,

    /// End distance accepted by the single-route-with-walking case.
    pub walk_radius_m: f64,

    /// Two polylines intersect when they come this close.
    pub intersection_threshold_m: f64,

    /// A second leg shorter than this is considered short.
    pub short_leg_m: f64,

    /// A short second leg is dropped when its intersection is this close
    /// to the destination.
    pub collapse_radius_m: f64,

    /// Largest endpoint gap bridged by walking.
    pub walking_gap_m: f64,

    /// Largest endpoint gap bridged when the second leg is short.
    pub extended_walking_gap_m: f64,

    /// Residual distance to the destination below which no final walk is added.
    pub min_walk_m: f64,

    /// Start and end radius used by the relaxed retry.
    pub relaxed_radius_m: f64,

    /// Intersection threshold used by the relaxed retry.
    pub relaxed_intersection_threshold_m: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            start_radius_m: 1_000.0,
            end_radius_m: 500.0,
            reach_threshold_m: 500.0,
            walk_radius_m: 500.0,
            intersection_threshold_m: 100.0,
            short_leg_m: 500.0,
            collapse_radius_m: 500.0,
            walking_gap_m: 500.0,
            extended_walking_gap_m: 1_000.0,
            min_walk_m: 10.0,
            relaxed_radius_m: 3_000.0,
            relaxed_intersection_threshold_m: 200.0,
        }
    }
}

impl MatchConfig {
    /// The widened bounds used by the relaxed retry.
    pub fn relaxed(&self) -> Self {
        Self {
            start_radius_m: self.relaxed_radius_m,
            end_radius_m: self.relaxed_radius_m,
            intersection_threshold_m: self.relaxed_intersection_threshold_m,
            ..self.clone()
        }
    }

    /// Walking allowance across an endpoint gap, given the second leg's length.
    pub fn gap_allowance(&self, second_leg_m: f64) -> f64 {
        if second_leg_m < self.short_leg_m {
            self.extended_walking_gap_m
        } else {
            self.walking_gap_m
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MatchConfig::default();

        assert_eq!(config.start_radius_m, 1_000.0);
        assert_eq!(config.end_radius_m, 500.0);
        assert_eq!(config.reach_threshold_m, 500.0);
        assert_eq!(config.intersection_threshold_m, 100.0);
        assert_eq!(config.min_walk_m, 10.0);
    }

    #[test]
    fn relaxed_widens_bounds_only() {
        let config = MatchConfig::default();
        let relaxed = config.relaxed();

        assert_eq!(relaxed.start_radius_m, 3_000.0);
        assert_eq!(relaxed.end_radius_m, 3_000.0);
        assert_eq!(relaxed.intersection_threshold_m, 200.0);
        assert_eq!(relaxed.reach_threshold_m, config.reach_threshold_m);
        assert_eq!(relaxed.short_leg_m, config.short_leg_m);
    }

    #[test]
    fn short_second_leg_earns_larger_allowance() {
        let config = MatchConfig::default();
        assert_eq!(config.gap_allowance(499.0), 1_000.0);
        assert_eq!(config.gap_allowance(500.0), 500.0);
    }
}
