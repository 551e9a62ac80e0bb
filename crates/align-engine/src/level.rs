//! Level encoding.
//!
//! Maps qualitative levels to the numeric targets experiments are
//! recorded against.

use align_manifest::{Level, ValueProfile};

/// Numeric target for `low`.
pub const LOW_VALUE: f64 = 0.0;

/// Numeric target for `medium`, and for anything unrecognized.
pub const MEDIUM_VALUE: f64 = 0.5;

/// Numeric target for `high`.
pub const HIGH_VALUE: f64 = 1.0;

/// Target value used for every baseline query.
pub const BASELINE_TARGET: f64 = 0.0;

/// Encodes a level as its numeric target.
///
/// Unrecognized input falls back to `medium` rather than failing.
///
/// ```rust
/// use align_engine::level_to_numeric;
/// use align_manifest::Level;
///
/// assert_eq!(level_to_numeric(&Level::High), 1.0);
/// assert_eq!(level_to_numeric(&Level::parse("extreme")), 0.5);
/// ```
pub fn level_to_numeric(level: &Level) -> f64 {
    match level {
        Level::Low => LOW_VALUE,
        Level::Medium => MEDIUM_VALUE,
        Level::High => HIGH_VALUE,
        Level::Unrecognized(_) => MEDIUM_VALUE,
    }
}

/// Numeric target a profile sets for one dimension.
///
/// A dimension the profile does not mention reads as `medium`.
pub fn profile_target(profile: &ValueProfile, dimension: &str) -> f64 {
    profile.get(dimension).map_or(MEDIUM_VALUE, level_to_numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_levels() {
        assert_eq!(level_to_numeric(&Level::parse("low")), 0.0);
        assert_eq!(level_to_numeric(&Level::parse("medium")), 0.5);
        assert_eq!(level_to_numeric(&Level::parse("high")), 1.0);
    }

    #[test]
    fn test_unrecognized_defaults_to_medium() {
        for raw in ["", "HIGH", "very high", "0.9"] {
            assert_eq!(level_to_numeric(&Level::parse(raw)), MEDIUM_VALUE, "{:?}", raw);
        }
    }

    #[test]
    fn test_profile_target() {
        let profile = ValueProfile::new().with("merit", "high");
        assert_eq!(profile_target(&profile, "merit"), HIGH_VALUE);
        assert_eq!(profile_target(&profile, "search"), MEDIUM_VALUE);
    }
}
