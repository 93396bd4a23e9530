// Kinematics types shared by the solver, calibration and motion sessions

use serde::Serialize;
use std::{fmt, ops::Sub};
use thiserror::Error;

pub mod rotary_delta;

pub(crate) const SQRT_3: f64 = 1.732_050_807_568_877_2;
pub(crate) const SIN_120: f64 = SQRT_3 / 2.0;
pub(crate) const COS_120: f64 = -0.5;
pub(crate) const TAN_60: f64 = SQRT_3;
pub(crate) const SIN_30: f64 = 0.5;
pub(crate) const TAN_30: f64 = 1.0 / SQRT_3;

/// Cartesian tool position in millimetres, origin at the centre of the base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance to `other` projected onto the XY plane.
    pub fn planar_distance(&self, other: &Pose) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Sub for Pose {
    type Output = Pose;

    fn sub(self, rhs: Pose) -> Pose {
        Pose {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

/// Shoulder angles in degrees, measured from the horizontal plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Angles {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Angles {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// The same angle on all three shoulders.
    pub const fn uniform(theta: f64) -> Self {
        Self::new(theta, theta, theta)
    }

    pub fn get(&self, actuator: Actuator) -> f64 {
        match actuator {
            Actuator::A => self.a,
            Actuator::B => self.b,
            Actuator::C => self.c,
        }
    }
}

impl Sub for Angles {
    type Output = Angles;

    fn sub(self, rhs: Angles) -> Angles {
        Angles {
            a: self.a - rhs.a,
            b: self.b - rhs.b,
            c: self.c - rhs.c,
        }
    }
}

/// Inclusive `[min, max]` range for a single axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// One of the three shoulder motors. The towers sit 120° apart, `A` on the
/// negative Y axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Actuator {
    A,
    B,
    C,
}

impl Actuator {
    pub const ALL: [Actuator; 3] = [Actuator::A, Actuator::B, Actuator::C];

    /// Rotate `p` about the vertical axis into this actuator's tower frame,
    /// where the shoulder swings in the local YZ plane.
    pub fn to_local(self, p: Pose) -> Pose {
        match self {
            Actuator::A => p,
            Actuator::B => Pose::new(
                p.x * COS_120 + p.y * SIN_120,
                p.y * COS_120 - p.x * SIN_120,
                p.z,
            ),
            Actuator::C => Pose::new(
                p.x * COS_120 - p.y * SIN_120,
                p.y * COS_120 + p.x * SIN_120,
                p.z,
            ),
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Actuator::A => "A",
            Actuator::B => "B",
            Actuator::C => "C",
        };
        f.write_str(name)
    }
}

/// The requested angles or position cannot be realised by the linkage.
///
/// Every variant means the same thing to a caller that only checks for
/// success; the payload is there for diagnostics.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Unreachable {
    #[error("forearms have no common intersection (discriminant {discriminant})")]
    NoIntersection { discriminant: f64 },
    #[error("arm tips are collinear, tool position is undefined (determinant {determinant})")]
    Collinear { determinant: f64 },
    #[error("actuator {actuator} cannot reach the target (discriminant {discriminant})")]
    Actuator { actuator: Actuator, discriminant: f64 },
}

/// Round `value` to `places` decimal places, halves away from zero.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
