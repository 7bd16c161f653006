//! 3D vectors in detector coordinates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D position or direction in detector coordinates (millimeters).
///
/// Event positions and PMT positions are both `Vec3`, so every operation
/// that takes a position is three-dimensional by construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    /// X component [mm].
    pub x: f64,
    /// Y component [mm].
    pub y: f64,
    /// Z component [mm].
    pub z: f64,
}

impl Vec3 {
    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Builds a Cartesian vector from spherical coordinates with angles
    /// in degrees.
    ///
    /// `theta` is the polar angle measured from the +z axis, `phi` the
    /// azimuthal angle in the x-y plane. This is the convention of the
    /// geometry description files.
    #[must_use]
    pub fn from_spherical_deg(r: f64, theta_deg: f64, phi_deg: f64) -> Self {
        let theta = theta_deg.to_radians();
        let phi = phi_deg.to_radians();
        Self {
            x: r * theta.sin() * phi.cos(),
            y: r * theta.sin() * phi.sin(),
            z: r * theta.cos(),
        }
    }

    /// Euclidean norm (distance from the detector center).
    #[inline]
    #[must_use]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Returns true if any component is NaN.
    #[inline]
    #[must_use]
    pub fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}
