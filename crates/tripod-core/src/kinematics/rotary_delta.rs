// Rotary delta kinematics

use crate::{
    geometry::Geometry,
    kinematics::{Actuator, Angles, Pose, SIN_30, TAN_30, TAN_60, Unreachable},
};

/// Below this the arm tips are treated as collinear in the XY plane and the
/// forward solve has no unique answer. Units are mm².
const DETERMINANT_EPSILON: f64 = 1e-9;

/// Rotary delta kinematics - three rotary arms
///
/// The solver holds nothing but the geometry, so a single instance can be
/// shared freely between threads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotaryDeltaKin {
    geometry: Geometry,
}

impl RotaryDeltaKin {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Shoulder angles to tool position.
    ///
    /// Each arm tip is the centre of a sphere of forearm radius; the tool is
    /// the lower of the two points where the three spheres meet.
    pub fn forward(&self, angles: Angles) -> Result<Pose, Unreachable> {
        let g = &self.geometry;
        let rf = g.shoulder();
        let t = (g.base_radius() - g.effector_radius()) * TAN_30 / 2.0;

        let (sin_a, cos_a) = angles.a.to_radians().sin_cos();
        let (sin_b, cos_b) = angles.b.to_radians().sin_cos();
        let (sin_c, cos_c) = angles.c.to_radians().sin_cos();

        // Arm tips. Tower A lies on the Y axis, B and C a third of a turn
        // either side of it.
        let y1 = -(t + rf * cos_a);
        let z1 = -rf * sin_a;

        let r2 = t + rf * cos_b;
        let y2 = r2 * SIN_30;
        let x2 = y2 * TAN_60;
        let z2 = -rf * sin_b;

        let r3 = t + rf * cos_c;
        let y3 = r3 * SIN_30;
        let x3 = -y3 * TAN_60;
        let z3 = -rf * sin_c;

        let dnm = (y2 - y1) * x3 - (y3 - y1) * x2;
        if dnm.is_nan() || dnm.abs() < DETERMINANT_EPSILON {
            return Err(Unreachable::Collinear { determinant: dnm });
        }

        // Squared distance of each tip from the origin. Built from the radial
        // reach so equal angles give identical values and the tool lands
        // exactly on the axis.
        let w1 = y1 * y1 + z1 * z1;
        let w2 = r2 * r2 + z2 * z2;
        let w3 = r3 * r3 + z3 * z3;

        // x = (a1*z + b1)/dnm
        let a1 = (z2 - z1) * (y3 - y1) - (z3 - z1) * (y2 - y1);
        let b1 = -((w2 - w1) * (y3 - y1) - (w3 - w1) * (y2 - y1)) / 2.0;

        // y = (a2*z + b2)/dnm
        let a2 = -(z2 - z1) * x3 + (z3 - z1) * x2;
        let b2 = ((w2 - w1) * x3 - (w3 - w1) * x2) / 2.0;

        // a*z^2 + b*z + c = 0
        let re = g.forearm();
        let b2_y1 = b2 - y1 * dnm;
        let a = a1 * a1 + a2 * a2 + dnm * dnm;
        let b = 2.0 * (a1 * b1 + a2 * b2_y1 - z1 * dnm * dnm);
        let c = b2_y1 * b2_y1 + b1 * b1 + dnm * dnm * (z1 * z1 - re * re);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant.is_nan() || discriminant < 0.0 {
            return Err(Unreachable::NoIntersection { discriminant });
        }

        let z = -0.5 * (b + discriminant.sqrt()) / a;
        Ok(Pose {
            x: (a1 * z + b1) / dnm,
            y: (a2 * z + b2) / dnm,
            z,
        })
    }

    /// Tool position to shoulder angles.
    ///
    /// Actuators are solved in order A, B, C and the first one that cannot
    /// reach the target is reported. Use [`Self::solve_actuators`] to see
    /// every actuator's outcome.
    pub fn inverse(&self, pose: Pose) -> Result<Angles, Unreachable> {
        Ok(Angles {
            a: self.solve_actuator(Actuator::A, pose)?,
            b: self.solve_actuator(Actuator::B, pose)?,
            c: self.solve_actuator(Actuator::C, pose)?,
        })
    }

    /// Solve all three actuators independently, without stopping at the
    /// first failure.
    pub fn solve_actuators(&self, pose: Pose) -> ActuatorSolutions {
        ActuatorSolutions {
            a: self.solve_actuator(Actuator::A, pose),
            b: self.solve_actuator(Actuator::B, pose),
            c: self.solve_actuator(Actuator::C, pose),
        }
    }

    /// Shoulder angle of a single actuator for the given tool position.
    pub fn solve_actuator(&self, actuator: Actuator, pose: Pose) -> Result<f64, Unreachable> {
        self.shoulder_angle(actuator.to_local(pose))
            .map_err(|discriminant| Unreachable::Actuator {
                actuator,
                discriminant,
            })
    }

    /// Circle/line intersection in the tower's YZ plane. `local` must already
    /// be rotated into the tower frame. The error carries the discriminant.
    fn shoulder_angle(&self, local: Pose) -> Result<f64, f64> {
        let g = &self.geometry;
        let rf = g.shoulder();
        let re = g.forearm();

        let Pose { x: x0, y: y0, z: z0 } = local;
        let y1 = -0.5 * TAN_30 * g.base_radius();
        // shift from the effector centre to its edge
        let y0 = y0 - 0.5 * TAN_30 * g.effector_radius();

        // z = a + b*y
        let a = (x0 * x0 + y0 * y0 + z0 * z0 + rf * rf - re * re - y1 * y1) / (2.0 * z0);
        let b = (y1 - y0) / z0;

        let discriminant = -(a + b * y1) * (a + b * y1) + rf * (b * b * rf + rf);
        if discriminant.is_nan() || discriminant < 0.0 {
            return Err(discriminant);
        }

        // Elbow-out root. The other root folds the elbow inward, which this
        // linkage cannot physically reach.
        let yj = (y1 - a * b - discriminant.sqrt()) / (b * b + 1.0);
        let zj = a + b * yj;

        let angle = (-zj / (y1 - yj)).atan().to_degrees();
        Ok(if yj > y1 { angle + 180.0 } else { angle })
    }
}

/// Per-actuator outcome of an inverse solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActuatorSolutions {
    pub a: Result<f64, Unreachable>,
    pub b: Result<f64, Unreachable>,
    pub c: Result<f64, Unreachable>,
}

impl ActuatorSolutions {
    pub fn get(&self, actuator: Actuator) -> Result<f64, Unreachable> {
        match actuator {
            Actuator::A => self.a,
            Actuator::B => self.b,
            Actuator::C => self.c,
        }
    }

    /// All three angles, or the first failure in order A, B, C. Agrees with
    /// [`RotaryDeltaKin::inverse`].
    pub fn angles(&self) -> Result<Angles, Unreachable> {
        Ok(Angles::new(self.a?, self.b?, self.c?))
    }

    /// Solved angles with 0° standing in for any actuator that failed.
    pub fn angles_or_zero(&self) -> Angles {
        Angles::new(
            self.a.unwrap_or(0.0),
            self.b.unwrap_or(0.0),
            self.c.unwrap_or(0.0),
        )
    }

    pub fn failures(&self) -> impl Iterator<Item = Unreachable> + '_ {
        Actuator::ALL
            .into_iter()
            .filter_map(|actuator| self.get(actuator).err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> RotaryDeltaKin {
        RotaryDeltaKin::new(Geometry::new(200.0, 530.0, 142.0, 46.0, 700.0, 8192).unwrap())
    }

    fn compact() -> RotaryDeltaKin {
        RotaryDeltaKin::new(Geometry::new(130.0, 400.0, 63.0, 35.0, 500.0, 3200).unwrap())
    }

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn horizontal_arms_put_tool_on_the_axis() {
        let pose = canonical().forward(Angles::uniform(0.0)).unwrap();
        assert_eq!(pose.x, 0.0);
        assert_eq!(pose.y, 0.0);
        assert_close(pose.z, -478.588_419_032_010_4, 1e-6);
    }

    #[test]
    fn forward_matches_reference_values() {
        let pose = canonical().forward(Angles::new(10.0, 20.0, 30.0)).unwrap();
        assert_close(pose.x, 50.427_964_865_018_915, 1e-6);
        assert_close(pose.y, -84.095_093_986_236_7, 1e-6);
        assert_close(pose.z, -543.251_502_650_159_8, 1e-6);

        let pose = compact().forward(Angles::new(5.0, 10.0, 15.0)).unwrap();
        assert_close(pose.x, 19.065_391_036_750_697, 1e-6);
        assert_close(pose.y, -32.685_614_176_714_22, 1e-6);
        assert_close(pose.z, -396.858_397_676_813, 1e-6);
    }

    #[test]
    fn forward_handles_arms_past_vertical() {
        let pose = compact().forward(Angles::uniform(200.0)).unwrap();
        assert_eq!(pose.x, 0.0);
        assert_eq!(pose.y, 0.0);
        assert_close(pose.z, -338.925_444_339_180_84, 1e-6);
    }

    #[test]
    fn inverse_matches_reference_values() {
        let angles = compact().inverse(Pose::new(0.0, 0.0, -300.0)).unwrap();
        assert_close(angles.a, -41.275_682_723_978_9, 1e-6);
        assert_close(angles.b, angles.a, 1e-9);
        assert_close(angles.c, angles.a, 1e-9);
    }

    #[test]
    fn inverse_recovers_forward_angles() {
        let kin = canonical();
        for angles in [
            Angles::new(10.0, 20.0, 30.0),
            Angles::new(-20.0, 5.0, 45.0),
            Angles::uniform(45.0),
            Angles::uniform(-30.0),
        ] {
            let pose = kin.forward(angles).unwrap();
            let back = kin.inverse(pose).unwrap();
            assert_close(back.a, angles.a, 1e-9);
            assert_close(back.b, angles.b, 1e-9);
            assert_close(back.c, angles.c, 1e-9);
        }
    }

    #[test]
    fn target_above_the_base_is_unreachable() {
        let err = compact().inverse(Pose::new(30.0, 30.0, 30.0)).unwrap_err();
        assert!(matches!(
            err,
            Unreachable::Actuator {
                actuator: Actuator::A,
                ..
            }
        ));
    }

    #[test]
    fn target_on_the_base_plane_is_unreachable() {
        // z = 0 divides by zero; the NaN/inf discriminant must not leak out
        // as an angle.
        let solutions = canonical().solve_actuators(Pose::new(0.0, 0.0, 0.0));
        assert_eq!(solutions.failures().count(), 3);
        assert!(canonical().inverse(Pose::new(10.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn inverse_reports_first_failing_actuator() {
        let kin = canonical();
        let pose = Pose::new(0.0, -450.0, -500.0);

        let err = kin.inverse(pose).unwrap_err();
        assert!(matches!(
            err,
            Unreachable::Actuator {
                actuator: Actuator::B,
                ..
            }
        ));

        let solutions = kin.solve_actuators(pose);
        assert_close(solutions.a.unwrap(), 5.537_635_698_783_426, 1e-6);
        assert!(solutions.b.is_err());
        assert!(solutions.c.is_err());
        assert_eq!(solutions.angles(), Err(err));

        let partial = solutions.angles_or_zero();
        assert_close(partial.a, 5.537_635_698_783_426, 1e-6);
        assert_eq!(partial.b, 0.0);
        assert_eq!(partial.c, 0.0);

        let failed: Vec<_> = solutions
            .failures()
            .map(|err| match err {
                Unreachable::Actuator { actuator, .. } => actuator,
                other => panic!("unexpected failure {other:?}"),
            })
            .collect();
        assert_eq!(failed, vec![Actuator::B, Actuator::C]);
    }

    #[test]
    fn far_targets_are_unreachable() {
        assert!(canonical().inverse(Pose::new(1000.0, 0.0, -500.0)).is_err());
        assert!(canonical().inverse(Pose::new(0.0, 0.0, -2000.0)).is_err());
    }

    #[test]
    fn short_forearms_cannot_meet_with_level_arms() {
        let kin =
            RotaryDeltaKin::new(Geometry::new(200.0, 220.0, 142.0, 46.0, 700.0, 360).unwrap());
        let err = kin.forward(Angles::uniform(0.0)).unwrap_err();
        assert!(matches!(err, Unreachable::NoIntersection { discriminant } if discriminant < 0.0));
        assert!(kin.forward(Angles::uniform(20.0)).is_ok());
    }

    #[test]
    fn collinear_arm_tips_are_reported() {
        // With equal radii and vertical shoulders all three tips sit on the
        // central axis.
        let kin = RotaryDeltaKin::new(Geometry::new(100.0, 300.0, 50.0, 50.0, 700.0, 360).unwrap());
        let err = kin.forward(Angles::uniform(90.0)).unwrap_err();
        assert!(matches!(err, Unreachable::Collinear { .. }));
    }

    #[test]
    fn solver_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RotaryDeltaKin>();

        let kin = canonical();
        let expected = kin.forward(Angles::new(1.0, 2.0, 3.0)).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| kin.forward(Angles::new(1.0, 2.0, 3.0)).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
