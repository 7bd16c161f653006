//! Optical model of the detector media.

use crate::error::{Error, Result};
use hittime_core::Vec3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Radii and refractive indices governing photon travel time.
///
/// The detector is a sphere of inner medium (scintillator) of radius
/// `boundary_radius_mm`, surrounded by a shell of outer medium (water)
/// out to the PMT surface at `pmt_radius_mm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticalModel {
    /// Radius of the inner/outer media boundary [mm].
    pub boundary_radius_mm: f64,
    /// Radius of the PMT surface sphere [mm].
    pub pmt_radius_mm: f64,
    /// Refractive index of the inner medium.
    pub n_inner: f64,
    /// Refractive index of the outer medium.
    pub n_outer: f64,
    /// Speed of light used for the conversion [mm/ns]. The canonical
    /// value 300 is a rounded approximation, kept for compatibility with
    /// the established calibration.
    pub light_speed_mm_per_ns: f64,
}

impl Default for OpticalModel {
    fn default() -> Self {
        Self {
            boundary_radius_mm: 17_700.0,
            pmt_radius_mm: 19_500.0,
            n_inner: 1.5,
            n_outer: 1.33,
            light_speed_mm_per_ns: 300.0,
        }
    }
}

impl OpticalModel {
    /// Loads constants from a JSON file. Missing fields keep their
    /// default values.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or describes an inconsistent model.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    /// Checks the model constants for consistency.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if a radius or the light speed is not
    /// positive, or if the boundary lies outside the PMT surface.
    pub fn validate(&self) -> Result<()> {
        if !(self.boundary_radius_mm > 0.0 && self.pmt_radius_mm > 0.0) {
            return Err(Error::Config(format!(
                "radii must be positive (boundary {}, surface {})",
                self.boundary_radius_mm, self.pmt_radius_mm
            )));
        }
        if self.boundary_radius_mm >= self.pmt_radius_mm {
            return Err(Error::Config(format!(
                "boundary radius {} must lie inside the PMT surface radius {}",
                self.boundary_radius_mm, self.pmt_radius_mm
            )));
        }
        if self.light_speed_mm_per_ns.is_nan() || self.light_speed_mm_per_ns <= 0.0 {
            return Err(Error::Config(format!(
                "light speed must be positive, got {}",
                self.light_speed_mm_per_ns
            )));
        }
        Ok(())
    }

    /// Expected photon travel time from `event_pos` to a PMT at
    /// `pmt_pos`, in nanoseconds.
    ///
    /// Splits the straight-line path at the media boundary using the law
    /// of cosines on the triangle (detector center, PMT, event). When the
    /// event geometry places the chord outside the boundary sphere the
    /// square root has no real solution and the whole path is attributed
    /// to the outer medium up to the boundary-tangent point.
    ///
    /// Degenerate geometry (an event on the PMT itself) yields NaN;
    /// callers that need a total function apply the zero fallback in
    /// [`crate::tof::expected_tof`].
    #[must_use]
    pub fn time_of_flight(&self, pmt_pos: Vec3, event_pos: Vec3) -> f64 {
        let d = event_pos.distance(&pmt_pos);
        let r = event_pos.norm();
        let r_surface = self.pmt_radius_mm;

        let cos_theta = (r_surface * r_surface + d * d - r * r) / (2.0 * r_surface * d);
        let theta = cos_theta.clamp(-1.0, 1.0).acos();

        let under = self.boundary_radius_mm * self.boundary_radius_mm
            - r_surface * r_surface * theta.sin() * theta.sin();
        let d_outer = if under >= 0.0 {
            r_surface * theta.cos() - under.sqrt()
        } else {
            r_surface * theta.cos()
        };
        let d_inner = d - d_outer;

        (d_inner * self.n_inner + d_outer * self.n_outer) / self.light_speed_mm_per_ns
    }
}
