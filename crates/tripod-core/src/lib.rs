//! Rotary delta (tripod) kinematics.
//!
//! Converts between shoulder angles and tool position, and calibrates the
//! reachable workspace of a robot from its six physical dimensions. This
//! crate has no I/O and installs no logging subscriber.

pub mod envelope;
pub mod geometry;
pub mod kinematics;
pub mod robot;
pub mod session;

pub use envelope::{Calibrator, Envelope, EnvelopeError, calibrate};
pub use geometry::{Geometry, GeometryError};
pub use kinematics::{
    Actuator, Angles, Bound, Pose, Unreachable,
    rotary_delta::{ActuatorSolutions, RotaryDeltaKin},
};
pub use robot::DeltaRobot;
pub use session::MotionSession;
