//! Workspace calibration.
//!
//! Drives the solver over a search space to find the safe operating
//! envelope of a robot:
//!
//! 1. Sweep all three shoulders together through a full revolution, one
//!    motor step at a time, to find the vertical extent of the workspace.
//!    The floor clips the bottom of that range.
//! 2. Grow a cube centred on the middle of that range, doubling then
//!    bisecting its half-width, until all eight corners stop being
//!    reachable. Angles seen at accepted corners become the actuator
//!    limits.
//! 3. Measure how far the tool moves in the XY plane for a single motor
//!    step from home.
//!
//! The search assumes reachability is contiguous inside the cube. That
//! holds for the rotary delta family but is not proven in general.

use crate::{
    geometry::{Geometry, GeometryError},
    kinematics::{
        Actuator, Angles, Bound, Pose, Unreachable, round_to, rotary_delta::RotaryDeltaKin,
    },
};
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;

const DEFAULT_CONVERGENCE: f64 = 0.1;
const DEFAULT_MAX_ITERATIONS: usize = 10_000;

const POSITION_PLACES: i32 = 3;
const ANGLE_PLACES: i32 = 2;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum EnvelopeError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("no shoulder angle in a full revolution produces a reachable pose")]
    NoVerticalReach,
    #[error("no reachable cube exists around z = {z_middle}")]
    Empty { z_middle: f64 },
    #[error("cube search did not converge within {iterations} iterations")]
    SearchExhausted { iterations: usize },
    #[error("home pose is unreachable: {0}")]
    HomeUnreachable(Unreachable),
    #[error("pose one step from home is unreachable: {0}")]
    ResolutionUnreachable(Unreachable),
    #[error("step resolution is degenerate ({value} mm)")]
    DegenerateResolution { value: f64 },
}

/// Calibrated operating bounds of a robot. Positions are in millimetres,
/// angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Envelope {
    /// Middle of the reachable volume.
    pub center: Pose,
    /// Tool position with all three arms level.
    pub home: Pose,
    pub x_limit: Bound,
    pub y_limit: Bound,
    pub z_limit: Bound,
    pub a_limit: Bound,
    pub b_limit: Bound,
    pub c_limit: Bound,
    /// Distance travelled in the XY plane by a single motor step.
    pub resolution: f64,
}

impl Envelope {
    pub fn angle_limit(&self, actuator: Actuator) -> Bound {
        match actuator {
            Actuator::A => self.a_limit,
            Actuator::B => self.b_limit,
            Actuator::C => self.c_limit,
        }
    }

    pub fn contains_pose(&self, pose: Pose) -> bool {
        self.x_limit.contains(pose.x) && self.y_limit.contains(pose.y) && self.z_limit.contains(pose.z)
    }

    pub fn contains_angles(&self, angles: Angles) -> bool {
        Actuator::ALL
            .into_iter()
            .all(|actuator| self.angle_limit(actuator).contains(angles.get(actuator)))
    }

    /// The eight corners of the Cartesian limit box.
    pub fn corners(&self) -> [Pose; 8] {
        let (x, y, z) = (self.x_limit, self.y_limit, self.z_limit);
        [
            Pose::new(x.max, y.max, z.max),
            Pose::new(x.max, y.min, z.max),
            Pose::new(x.min, y.min, z.max),
            Pose::new(x.min, y.max, z.max),
            Pose::new(x.max, y.max, z.min),
            Pose::new(x.max, y.min, z.min),
            Pose::new(x.min, y.min, z.min),
            Pose::new(x.min, y.max, z.min),
        ]
    }
}

/// Envelope calibration settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibrator {
    /// The cube search stops once its step falls to this size, in mm.
    pub convergence: f64,
    /// Hard cap on cube search iterations.
    pub max_iterations: usize,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            convergence: DEFAULT_CONVERGENCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Calibrate `geometry` with the default settings.
pub fn calibrate(geometry: Geometry) -> Result<Envelope, EnvelopeError> {
    Calibrator::default().calibrate(&RotaryDeltaKin::new(geometry))
}

struct CubeSearch {
    half_width: f64,
    angle_limits: [Bound; 3],
}

impl Calibrator {
    pub fn new(convergence: f64, max_iterations: usize) -> Self {
        Self {
            convergence,
            max_iterations,
        }
    }

    pub fn calibrate(&self, kin: &RotaryDeltaKin) -> Result<Envelope, EnvelopeError> {
        let started = Instant::now();
        let vertical = vertical_extent(kin)?;
        let z_middle = (vertical.min + vertical.max) * 0.5;
        let half_range = vertical.max - z_middle;
        tracing::debug!(
            "vertical extent [{}, {}], searching around z = {}",
            vertical.min,
            vertical.max,
            z_middle
        );

        let cube = self.cube_search(kin, z_middle, half_range)?;
        let sum = cube.half_width;
        tracing::debug!("reachable cube half-width {}", sum);

        let home = kin
            .forward(Angles::uniform(0.0))
            .map_err(EnvelopeError::HomeUnreachable)?;
        let resolution = step_resolution(kin, home)?;
        tracing::debug!("resolution {} mm per step", resolution);
        tracing::debug!(
            "calibration finished in {} ms",
            started.elapsed().as_millis()
        );

        let [a_limit, b_limit, c_limit] = cube.angle_limits.map(|bound| {
            Bound::new(
                round_to(bound.min, ANGLE_PLACES),
                round_to(bound.max, ANGLE_PLACES),
            )
        });

        Ok(Envelope {
            center: Pose::new(0.0, 0.0, round_to(z_middle, POSITION_PLACES)),
            home: Pose::new(
                round_to(home.x, POSITION_PLACES),
                round_to(home.y, POSITION_PLACES),
                round_to(home.z, POSITION_PLACES),
            ),
            x_limit: symmetric(sum),
            y_limit: symmetric(sum),
            z_limit: Bound::new(
                round_to(z_middle - sum, POSITION_PLACES),
                round_to(z_middle + sum, POSITION_PLACES),
            ),
            a_limit,
            b_limit,
            c_limit,
            resolution,
        })
    }

    fn cube_search(
        &self,
        kin: &RotaryDeltaKin,
        z_middle: f64,
        half_range: f64,
    ) -> Result<CubeSearch, EnvelopeError> {
        let mut dist = half_range * 0.5;
        let mut sum = 0.0;
        let mut angle_limits: Option<[Bound; 3]> = None;

        for iteration in 1.. {
            sum += dist;
            match cube_corner_angles(kin, z_middle, sum) {
                Some(corners) => {
                    let limits = angle_limits.get_or_insert_with(|| {
                        let first = corners[0];
                        Actuator::ALL.map(|actuator| {
                            let v = first.get(actuator);
                            Bound::new(v, v)
                        })
                    });
                    for angles in &corners {
                        for (bound, actuator) in limits.iter_mut().zip(Actuator::ALL) {
                            let v = angles.get(actuator);
                            bound.min = bound.min.min(v);
                            bound.max = bound.max.max(v);
                        }
                    }
                }
                None => {
                    sum -= dist;
                    dist *= 0.5;
                }
            }
            tracing::trace!("iteration {}: half-width {} step {}", iteration, sum, dist);

            if sum >= half_range || dist <= self.convergence {
                break;
            }
            if iteration >= self.max_iterations {
                return Err(EnvelopeError::SearchExhausted {
                    iterations: iteration,
                });
            }
        }

        match angle_limits {
            Some(angle_limits) if sum > 0.0 => Ok(CubeSearch {
                half_width: sum,
                angle_limits,
            }),
            _ => Err(EnvelopeError::Empty { z_middle }),
        }
    }
}

/// Lowest and highest tool height over a full revolution of all three
/// shoulders moving together, clipped at the floor.
fn vertical_extent(kin: &RotaryDeltaKin) -> Result<Bound, EnvelopeError> {
    let geometry = kin.geometry();
    let step = geometry.step_angle();
    let reach = geometry.reach_bound();

    let mut z_min = reach;
    let mut z_max = -reach;
    let mut samples = 0usize;
    for i in 0..geometry.steps_per_rev() {
        let theta = f64::from(i) * step;
        if let Ok(pose) = kin.forward(Angles::uniform(theta)) {
            z_min = z_min.min(pose.z);
            z_max = z_max.max(pose.z);
            samples += 1;
        }
    }
    if samples == 0 {
        return Err(EnvelopeError::NoVerticalReach);
    }

    let floor = -geometry.base_to_floor();
    Ok(Bound::new(z_min.max(floor), z_max.max(floor)))
}

/// Inverse solutions for every corner of the cube of half-width `sum`, or
/// `None` if any corner is out of reach.
fn cube_corner_angles(kin: &RotaryDeltaKin, z_middle: f64, sum: f64) -> Option<[Angles; 8]> {
    let corners = [
        Pose::new(sum, sum, z_middle + sum),
        Pose::new(sum, -sum, z_middle + sum),
        Pose::new(-sum, -sum, z_middle + sum),
        Pose::new(-sum, sum, z_middle + sum),
        Pose::new(sum, sum, z_middle - sum),
        Pose::new(sum, -sum, z_middle - sum),
        Pose::new(-sum, -sum, z_middle - sum),
        Pose::new(-sum, sum, z_middle - sum),
    ];

    let mut angles = [Angles::default(); 8];
    for (slot, corner) in angles.iter_mut().zip(corners) {
        *slot = kin.inverse(corner).ok()?;
    }
    Some(angles)
}

/// XY distance covered when shoulder A turns by one step from home.
fn step_resolution(kin: &RotaryDeltaKin, home: Pose) -> Result<f64, EnvelopeError> {
    let stepped = kin
        .forward(Angles::new(kin.geometry().step_angle(), 0.0, 0.0))
        .map_err(EnvelopeError::ResolutionUnreachable)?;
    let distance = home.planar_distance(&stepped);
    if !distance.is_finite() || distance <= 0.0 {
        return Err(EnvelopeError::DegenerateResolution { value: distance });
    }

    // Very fine steppers would round to zero; keep those unrounded.
    let rounded = round_to(distance, POSITION_PLACES);
    Ok(if rounded > 0.0 { rounded } else { distance })
}

fn symmetric(half_width: f64) -> Bound {
    Bound::new(
        round_to(-half_width, POSITION_PLACES),
        round_to(half_width, POSITION_PLACES),
    )
}
