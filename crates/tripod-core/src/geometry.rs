//! Physical dimensions of a rotary delta robot.
//!
//! A [`Geometry`] can only be obtained through [`Geometry::new`], so every
//! solver and calibration run works from dimensions that have already been
//! checked. There is no way to change a single field in place; build a new
//! value instead.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("{field} must be a positive, finite length in millimetres (got {value})")]
    InvalidLength { field: &'static str, value: f64 },
    #[error("steps_per_rev must be greater than zero")]
    ZeroStepsPerRev,
}

/// Link lengths and mounting radii, all in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Geometry {
    /// Shoulder (upper arm) length, `rf`.
    shoulder: f64,
    /// Forearm length, `re`.
    forearm: f64,
    /// Radius of the fixed base, `f`.
    base_radius: f64,
    /// Radius of the moving effector, `e`.
    effector_radius: f64,
    /// Distance from the base plane down to the floor, `btf`.
    base_to_floor: f64,
    /// Motor steps per full shoulder revolution, `s`.
    steps_per_rev: u32,
}

impl Geometry {
    pub fn new(
        shoulder: f64,
        forearm: f64,
        base_radius: f64,
        effector_radius: f64,
        base_to_floor: f64,
        steps_per_rev: u32,
    ) -> Result<Self, GeometryError> {
        check_length("shoulder", shoulder)?;
        check_length("forearm", forearm)?;
        check_length("base_radius", base_radius)?;
        check_length("effector_radius", effector_radius)?;
        check_length("base_to_floor", base_to_floor)?;
        if steps_per_rev == 0 {
            return Err(GeometryError::ZeroStepsPerRev);
        }

        Ok(Self {
            shoulder,
            forearm,
            base_radius,
            effector_radius,
            base_to_floor,
            steps_per_rev,
        })
    }

    pub fn shoulder(&self) -> f64 {
        self.shoulder
    }

    pub fn forearm(&self) -> f64 {
        self.forearm
    }

    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    pub fn effector_radius(&self) -> f64 {
        self.effector_radius
    }

    pub fn base_to_floor(&self) -> f64 {
        self.base_to_floor
    }

    pub fn steps_per_rev(&self) -> u32 {
        self.steps_per_rev
    }

    /// Shoulder rotation produced by one motor step, in degrees.
    pub fn step_angle(&self) -> f64 {
        360.0 / f64::from(self.steps_per_rev)
    }

    /// Sum of every length in the linkage. No reachable point lies further
    /// than this from the base centre on any axis.
    pub fn reach_bound(&self) -> f64 {
        self.effector_radius + self.base_radius + self.forearm + self.shoulder
    }
}

fn check_length(field: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidLength { field, value })
    }
}
