//! Incremental motion.
//!
//! A [`MotionSession`] remembers where the tool was after the last
//! successful move so callers driving the motors step by step can read the
//! change in position and angles. The solver itself stays stateless; this is
//! the only place pose history lives.

use crate::kinematics::{Angles, Pose, Unreachable, rotary_delta::RotaryDeltaKin};

#[derive(Clone, Debug)]
pub struct MotionSession {
    kin: RotaryDeltaKin,
    pose: Pose,
    angles: Angles,
    delta_pose: Pose,
    delta_angles: Angles,
}

impl MotionSession {
    /// Start a session at home, with all three arms level.
    pub fn new(kin: RotaryDeltaKin) -> Result<Self, Unreachable> {
        let angles = Angles::uniform(0.0);
        let pose = kin.forward(angles)?;
        Ok(Self {
            kin,
            pose,
            angles,
            delta_pose: Pose::default(),
            delta_angles: Angles::default(),
        })
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn angles(&self) -> Angles {
        self.angles
    }

    /// Change in tool position made by the last successful move.
    pub fn delta_pose(&self) -> Pose {
        self.delta_pose
    }

    /// Change in shoulder angles made by the last successful move.
    pub fn delta_angles(&self) -> Angles {
        self.delta_angles
    }

    /// Move to absolute shoulder angles. On failure the session is unchanged.
    pub fn move_to_angles(&mut self, angles: Angles) -> Result<Pose, Unreachable> {
        let pose = self.kin.forward(angles)?;
        self.commit(pose, angles);
        Ok(pose)
    }

    /// Move the tool to an absolute position. On failure the session is
    /// unchanged.
    pub fn move_to_pose(&mut self, pose: Pose) -> Result<Angles, Unreachable> {
        let angles = self.kin.inverse(pose)?;
        self.commit(pose, angles);
        Ok(angles)
    }

    /// Move the tool relative to its current position.
    pub fn move_by(&mut self, offset: Pose) -> Result<Angles, Unreachable> {
        let target = Pose::new(
            self.pose.x + offset.x,
            self.pose.y + offset.y,
            self.pose.z + offset.z,
        );
        self.move_to_pose(target)
    }

    fn commit(&mut self, pose: Pose, angles: Angles) {
        self.delta_pose = pose - self.pose;
        self.delta_angles = angles - self.angles;
        self.pose = pose;
        self.angles = angles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;

    fn session() -> MotionSession {
        let geometry = Geometry::new(200.0, 530.0, 142.0, 46.0, 700.0, 8192).unwrap();
        MotionSession::new(RotaryDeltaKin::new(geometry)).unwrap()
    }

    #[test]
    fn starts_at_home_without_motion() {
        let s = session();
        assert_eq!(s.angles(), Angles::uniform(0.0));
        assert!((s.pose().z - -478.588).abs() < 1e-3);
        assert_eq!(s.delta_pose(), Pose::default());
        assert_eq!(s.delta_angles(), Angles::default());
    }

    #[test]
    fn tracks_angle_deltas() {
        let mut s = session();
        let home = s.pose();
        let pose = s.move_to_angles(Angles::uniform(10.0)).unwrap();
        assert_eq!(s.delta_angles(), Angles::uniform(10.0));
        assert_eq!(s.delta_pose(), pose - home);
        assert!(s.delta_pose().z < 0.0);

        s.move_to_angles(Angles::new(15.0, 10.0, 5.0)).unwrap();
        assert_eq!(s.delta_angles(), Angles::new(5.0, 0.0, -5.0));
    }

    #[test]
    fn relative_moves_accumulate() {
        let mut s = session();
        let start = s.pose();
        s.move_by(Pose::new(10.0, 0.0, 0.0)).unwrap();
        s.move_by(Pose::new(0.0, -5.0, -20.0)).unwrap();

        let end = s.pose();
        assert!((end.x - (start.x + 10.0)).abs() < 1e-9);
        assert!((end.y - (start.y - 5.0)).abs() < 1e-9);
        assert!((end.z - (start.z - 20.0)).abs() < 1e-9);
        assert!((s.delta_pose().z - -20.0).abs() < 1e-9);
    }

    #[test]
    fn failed_move_keeps_previous_state() {
        let mut s = session();
        s.move_to_pose(Pose::new(20.0, 20.0, -500.0)).unwrap();
        let before = (s.pose(), s.angles(), s.delta_pose(), s.delta_angles());

        assert!(s.move_to_pose(Pose::new(1000.0, 0.0, -500.0)).is_err());
        assert_eq!(
            (s.pose(), s.angles(), s.delta_pose(), s.delta_angles()),
            before
        );
    }
}
