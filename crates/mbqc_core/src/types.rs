//! Core types for MBQC
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Node handles, measurement planes and the measurement basis type shared by
//! graphs, commands and the compiler.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Node identifier (dense, 0-indexed handle into the graph arena)
/// Gantree: Node // pub type Node = usize
pub type Node = usize;

/// Ordered node set
pub type NodeSet = BTreeSet<Node>;

/// Measurement angle in radians
pub type Angle = f64;

/// Node → correction domain (outcomes XOR-ed to decide a correction)
pub type Corrections = BTreeMap<Node, NodeSet>;

// ============================================================================
// Plane
// ============================================================================

/// Measurement plane of a single-qubit projective measurement
/// Gantree: Plane // XY/XZ/YZ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Plane {
    /// XY plane
    XY,
    /// XZ plane
    XZ,
    /// YZ plane
    YZ,
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Plane::XY => "XY",
            Plane::XZ => "XZ",
            Plane::YZ => "YZ",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Pauli axis measurement
// ============================================================================

/// Pauli measurement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

/// Sign of a Pauli measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// +1 eigenstate
    Plus,
    /// -1 eigenstate
    Minus,
}

impl Sign {
    /// Opposite sign
    pub fn flip(self) -> Self {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }
}

// ============================================================================
// MeasBasis
// ============================================================================

/// Measurement basis of a node
/// Gantree: MeasBasis // planar | axis
///
/// Both representations answer the same queries; the axis form keeps the
/// exact Pauli information that an angle would only approximate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeasBasis {
    /// Arbitrary angle in a measurement plane
    Planar {
        /// Measurement plane
        plane: Plane,
        /// Angle in radians
        angle: Angle,
    },
    /// Pauli axis measurement
    Axis {
        /// Pauli axis
        axis: Axis,
        /// Eigenvalue sign
        sign: Sign,
    },
}

impl MeasBasis {
    /// Planar basis
    pub fn planar(plane: Plane, angle: Angle) -> Self {
        MeasBasis::Planar { plane, angle }
    }

    /// Pauli axis basis
    pub fn axis(axis: Axis, sign: Sign) -> Self {
        MeasBasis::Axis { axis, sign }
    }

    /// Measurement plane
    /// Gantree: plane() -> Plane // 평면
    pub fn plane(&self) -> Plane {
        match *self {
            MeasBasis::Planar { plane, .. } => plane,
            MeasBasis::Axis { axis, .. } => match axis {
                Axis::X => Plane::XY,
                Axis::Y => Plane::YZ,
                Axis::Z => Plane::XZ,
            },
        }
    }

    /// Measurement angle in radians
    /// Gantree: angle() -> f64 // 각도
    pub fn angle(&self) -> Angle {
        match *self {
            MeasBasis::Planar { angle, .. } => angle,
            MeasBasis::Axis { axis: Axis::Y, sign } => match sign {
                Sign::Plus => FRAC_PI_2,
                Sign::Minus => 3.0 * FRAC_PI_2,
            },
            MeasBasis::Axis { sign, .. } => match sign {
                Sign::Plus => 0.0,
                Sign::Minus => PI,
            },
        }
    }

    /// Antipodal basis (the other outcome of the same measurement)
    pub fn flip(&self) -> Self {
        match *self {
            MeasBasis::Planar { plane, angle } => MeasBasis::Planar {
                plane,
                angle: angle + PI,
            },
            MeasBasis::Axis { axis, sign } => MeasBasis::Axis {
                axis,
                sign: sign.flip(),
            },
        }
    }

    /// Complex conjugate of the basis
    pub fn conjugate(&self) -> Self {
        match *self {
            MeasBasis::Planar { plane, angle } => match plane {
                Plane::XY | Plane::YZ => MeasBasis::Planar {
                    plane,
                    angle: -angle,
                },
                Plane::XZ => MeasBasis::Planar { plane, angle },
            },
            MeasBasis::Axis { axis: Axis::Y, sign } => MeasBasis::Axis {
                axis: Axis::Y,
                sign: sign.flip(),
            },
            axis_basis @ MeasBasis::Axis { .. } => axis_basis,
        }
    }

    /// State vector of the +1 outcome
    /// Gantree: vector() -> [C64;2] // 상태 벡터
    pub fn vector(&self) -> [Complex64; 2] {
        meas_basis_vector(self.plane(), self.angle())
    }

    /// True for the Pauli axis representation
    pub fn is_axis(&self) -> bool {
        matches!(self, MeasBasis::Axis { .. })
    }
}

impl Default for MeasBasis {
    /// XY plane, angle 0
    fn default() -> Self {
        MeasBasis::Planar {
            plane: Plane::XY,
            angle: 0.0,
        }
    }
}

impl fmt::Display for MeasBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasBasis::Planar { plane, angle } => write!(f, "{}({:.4})", plane, angle),
            MeasBasis::Axis { axis, sign } => {
                let s = match sign {
                    Sign::Plus => '+',
                    Sign::Minus => '-',
                };
                write!(f, "{}{:?}", s, axis)
            }
        }
    }
}

/// Measurement basis vector for a plane and angle
pub fn meas_basis_vector(plane: Plane, angle: Angle) -> [Complex64; 2] {
    match plane {
        Plane::XY => [
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            Complex64::from_polar(FRAC_1_SQRT_2, angle),
        ],
        Plane::YZ => [
            Complex64::new((angle / 2.0).cos(), 0.0),
            Complex64::new(0.0, (angle / 2.0).sin()),
        ],
        Plane::XZ => [
            Complex64::new((angle / 2.0).cos(), 0.0),
            Complex64::new((angle / 2.0).sin(), 0.0),
        ],
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_plane_mapping() {
        assert_eq!(MeasBasis::axis(Axis::X, Sign::Plus).plane(), Plane::XY);
        assert_eq!(MeasBasis::axis(Axis::Y, Sign::Plus).plane(), Plane::YZ);
        assert_eq!(MeasBasis::axis(Axis::Z, Sign::Minus).plane(), Plane::XZ);
    }

    #[test]
    fn test_axis_angles() {
        assert_relative_eq!(MeasBasis::axis(Axis::Y, Sign::Plus).angle(), FRAC_PI_2);
        assert_relative_eq!(MeasBasis::axis(Axis::Y, Sign::Minus).angle(), 3.0 * FRAC_PI_2);
        assert_relative_eq!(MeasBasis::axis(Axis::X, Sign::Minus).angle(), PI);
        assert_relative_eq!(MeasBasis::axis(Axis::Z, Sign::Plus).angle(), 0.0);
    }

    #[test]
    fn test_flip() {
        let b = MeasBasis::planar(Plane::XZ, 0.25);
        assert_relative_eq!(b.flip().angle(), 0.25 + PI);
        assert_eq!(b.flip().plane(), Plane::XZ);

        let a = MeasBasis::axis(Axis::X, Sign::Plus);
        assert_eq!(a.flip(), MeasBasis::axis(Axis::X, Sign::Minus));
    }

    #[test]
    fn test_conjugate() {
        assert_relative_eq!(MeasBasis::planar(Plane::XY, 0.3).conjugate().angle(), -0.3);
        assert_relative_eq!(MeasBasis::planar(Plane::YZ, 0.3).conjugate().angle(), -0.3);
        assert_relative_eq!(MeasBasis::planar(Plane::XZ, 0.3).conjugate().angle(), 0.3);

        let y = MeasBasis::axis(Axis::Y, Sign::Plus);
        assert_eq!(y.conjugate(), MeasBasis::axis(Axis::Y, Sign::Minus));
        let z = MeasBasis::axis(Axis::Z, Sign::Minus);
        assert_eq!(z.conjugate(), z);
    }

    #[test]
    fn test_vector_xy() {
        let v = MeasBasis::planar(Plane::XY, PI).vector();
        assert_relative_eq!(v[0].re, FRAC_1_SQRT_2);
        assert_relative_eq!(v[1].re, -FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(v[1].im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vector_yz_and_xz() {
        let yz = MeasBasis::planar(Plane::YZ, PI).vector();
        assert_relative_eq!(yz[0].re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(yz[1].im, 1.0, epsilon = 1e-12);

        let xz = MeasBasis::planar(Plane::XZ, FRAC_PI_2).vector();
        assert_relative_eq!(xz[0].re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(xz[1].re, FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_vector_matches_planar() {
        let axis = MeasBasis::axis(Axis::Y, Sign::Plus).vector();
        let planar = MeasBasis::planar(Plane::YZ, FRAC_PI_2).vector();
        for i in 0..2 {
            assert_relative_eq!(axis[i].re, planar[i].re);
            assert_relative_eq!(axis[i].im, planar[i].im);
        }
    }

    #[test]
    fn test_vector_is_normalized() {
        for plane in [Plane::XY, Plane::XZ, Plane::YZ] {
            let v = meas_basis_vector(plane, 1.234);
            let norm: f64 = v.iter().map(|c| c.norm_sqr()).sum();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_default_basis() {
        let b = MeasBasis::default();
        assert_eq!(b.plane(), Plane::XY);
        assert_eq!(b.angle(), 0.0);
    }
}
