use thiserror::Error;

/// Result alias for fallible configuration handling.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Rejected simulation parameters.
///
/// The aggregation step itself never fails; this type only covers
/// configuration that cannot produce a meaningful simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A parameter was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    /// A parameter that must be strictly positive was zero or negative.
    #[error("{name} must be > 0, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    /// A parameter that must be non-negative was negative.
    #[error("{name} must be >= 0, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// A parameter fell outside its closed range.
    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Particles would be spawned outside the containing cube.
    #[error("spawn_half_extent ({spawn}) must not exceed boundary ({boundary})")]
    SpawnOutsideBoundary { spawn: f64, boundary: f64 },

    /// At least one attached seed is needed for anything to aggregate onto.
    #[error("seed_count must be at least 1")]
    NoSeed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_parameter() {
        let e = ConfigError::NotPositive {
            name: "boundary",
            value: -1.0,
        };
        let msg = e.to_string();
        assert!(msg.contains("boundary"));
        assert!(msg.contains("> 0"));
    }

    #[test]
    fn out_of_range_reports_bounds() {
        let e = ConfigError::OutOfRange {
            name: "bounce_damping",
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            e.to_string(),
            "bounce_damping must lie in [0, 1], got 1.5"
        );
    }
}
