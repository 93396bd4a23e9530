//! Robot geometry paired with the envelope calibrated for it.

use crate::{
    envelope::{Calibrator, Envelope, EnvelopeError},
    geometry::Geometry,
    kinematics::{Angles, Pose, Unreachable, rotary_delta::RotaryDeltaKin},
    session::MotionSession,
};

/// A robot's geometry together with the envelope calibrated for it.
///
/// The two always change together: [`DeltaRobot::reconfigure`] either
/// replaces both or leaves both as they were.
#[derive(Clone, Debug)]
pub struct DeltaRobot {
    kin: RotaryDeltaKin,
    envelope: Envelope,
    calibrator: Calibrator,
}

impl DeltaRobot {
    pub fn new(geometry: Geometry) -> Result<Self, EnvelopeError> {
        Self::with_calibrator(geometry, Calibrator::default())
    }

    pub fn with_calibrator(
        geometry: Geometry,
        calibrator: Calibrator,
    ) -> Result<Self, EnvelopeError> {
        let kin = RotaryDeltaKin::new(geometry);
        let envelope = calibrator.calibrate(&kin)?;
        Ok(Self {
            kin,
            envelope,
            calibrator,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        self.kin.geometry()
    }

    pub fn solver(&self) -> &RotaryDeltaKin {
        &self.kin
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn forward(&self, angles: Angles) -> Result<Pose, Unreachable> {
        self.kin.forward(angles)
    }

    pub fn inverse(&self, pose: Pose) -> Result<Angles, Unreachable> {
        self.kin.inverse(pose)
    }

    /// Swap in new geometry and recalibrate.
    pub fn reconfigure(&mut self, geometry: Geometry) -> Result<(), EnvelopeError> {
        *self = Self::with_calibrator(geometry, self.calibrator)?;
        Ok(())
    }

    pub fn session(&self) -> Result<MotionSession, Unreachable> {
        MotionSession::new(self.kin)
    }
}
