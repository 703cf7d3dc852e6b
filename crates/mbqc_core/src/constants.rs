//! Constants for MBQC
//!
//! Gantree: L0_Foundation → Constants
//!
//! Tolerances and display limits shared across crates.

// ============================================================================
// Numeric Constants
// Gantree: numeric // 수치 상수
// ============================================================================

pub mod numeric {
    //! Numeric tolerances

    /// Two measurement angles closer than this are considered equal
    /// Gantree: ANGLE_TOLERANCE: f64 = 1e-12
    pub const ANGLE_TOLERANCE: f64 = 1e-12;

    /// Compare two angles modulo 2π
    pub fn angles_equal(a: f64, b: f64) -> bool {
        let two_pi = 2.0 * std::f64::consts::PI;
        let diff = (a - b).rem_euclid(two_pi);
        diff < ANGLE_TOLERANCE || two_pi - diff < ANGLE_TOLERANCE
    }
}

// ============================================================================
// Pattern Constants
// Gantree: pattern // 패턴 상수
// ============================================================================

pub mod pattern {
    //! Pattern formatting defaults

    /// Default number of commands rendered by `format_pattern`
    pub const DEFAULT_FORMAT_LIMIT: usize = 40;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::numeric::angles_equal;
    use std::f64::consts::PI;

    #[test]
    fn test_angles_equal() {
        assert!(angles_equal(0.5, 0.5));
        assert!(angles_equal(0.0, 2.0 * PI));
        assert!(angles_equal(-PI, PI));
        assert!(!angles_equal(0.0, 0.1));
    }
}
