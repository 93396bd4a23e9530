use bolero::check;
use std::sync::OnceLock;
use tripod_core::{Actuator, Angles, Envelope, Geometry, Pose, RotaryDeltaKin, calibrate};

fn canonical() -> Geometry {
    Geometry::new(200.0, 530.0, 142.0, 46.0, 700.0, 8192).unwrap()
}

fn canonical_envelope() -> &'static Envelope {
    static ENVELOPE: OnceLock<Envelope> = OnceLock::new();
    ENVELOPE.get_or_init(|| calibrate(canonical()).unwrap())
}

/// Map the full `u16` range onto `[min, max]`.
fn scale(raw: u16, min: f64, max: f64) -> f64 {
    min + (max - min) * f64::from(raw) / f64::from(u16::MAX)
}

#[test]
fn inverse_undoes_forward() {
    let kin = RotaryDeltaKin::new(canonical());
    check!()
        .with_type::<(u16, u16, u16)>()
        .for_each(|&(a, b, c)| {
            let angles = Angles::new(
                scale(a, -40.0, 80.0),
                scale(b, -40.0, 80.0),
                scale(c, -40.0, 80.0),
            );
            let pose = kin.forward(angles).unwrap();
            let back = kin.inverse(pose).unwrap();
            for actuator in Actuator::ALL {
                let delta = (back.get(actuator) - angles.get(actuator)).abs();
                assert!(delta < 1e-6, "{actuator}: {angles:?} -> {back:?}");
            }
        });
}

#[test]
fn rotating_the_arms_rotates_the_tool() {
    let kin = RotaryDeltaKin::new(canonical());
    check!()
        .with_type::<(u16, u16, u16)>()
        .for_each(|&(a, b, c)| {
            let (a, b, c) = (
                scale(a, -40.0, 80.0),
                scale(b, -40.0, 80.0),
                scale(c, -40.0, 80.0),
            );
            let pose = kin.forward(Angles::new(a, b, c)).unwrap();
            // Shifting every angle one tower over turns the tool a third of
            // a revolution about the vertical axis.
            let turned = kin.forward(Angles::new(c, a, b)).unwrap();
            let back = Actuator::B.to_local(turned);
            assert!((back.x - pose.x).abs() < 1e-6);
            assert!((back.y - pose.y).abs() < 1e-6);
            assert!((back.z - pose.z).abs() < 1e-6);
        });
}

#[test]
fn symmetric_arms_stay_on_the_axis() {
    let kin = RotaryDeltaKin::new(canonical());
    check!().with_type::<u16>().for_each(|&theta| {
        let theta = scale(theta, -90.0, 90.0);
        let pose = kin.forward(Angles::uniform(theta)).unwrap();
        assert_eq!(pose.x, 0.0, "{theta}: {pose:?}");
        assert_eq!(pose.y, 0.0, "{theta}: {pose:?}");
        assert!(pose.z < 0.0);
    });
}

#[test]
fn calibrated_box_is_reachable() {
    let kin = RotaryDeltaKin::new(canonical());
    let env = canonical_envelope();
    check!()
        .with_type::<(u16, u16, u16)>()
        .for_each(|&(x, y, z)| {
            let pose = Pose::new(
                scale(x, env.x_limit.min, env.x_limit.max),
                scale(y, env.y_limit.min, env.y_limit.max),
                scale(z, env.z_limit.min, env.z_limit.max),
            );
            assert!(env.contains_pose(pose));
            assert!(kin.inverse(pose).is_ok(), "{pose:?} unreachable");
        });
}

#[test]
fn every_box_corner_is_reachable() {
    let kin = RotaryDeltaKin::new(canonical());
    for corner in canonical_envelope().corners() {
        assert!(kin.inverse(corner).is_ok(), "{corner:?} unreachable");
    }
}

#[test]
fn resolution_is_positive_and_finite() {
    for steps in [200, 400, 1600, 3200, 8192, 51_200] {
        let geometry = Geometry::new(200.0, 530.0, 142.0, 46.0, 700.0, steps).unwrap();
        let env = calibrate(geometry).unwrap();
        assert!(env.resolution.is_finite());
        assert!(env.resolution > 0.0, "{steps}: {}", env.resolution);
    }
}

#[test]
fn reach_only_shrinks_toward_full_extension() {
    // Forearms too short to meet while the shoulders are near level. Once a
    // symmetric angle is reachable, every angle further from level is too.
    let kin = RotaryDeltaKin::new(Geometry::new(200.0, 220.0, 142.0, 46.0, 700.0, 360).unwrap());
    for sign in [1.0, -1.0] {
        let reachable: Vec<bool> = (0..=360)
            .map(|i| {
                let theta = sign * f64::from(i) * 0.25;
                kin.forward(Angles::uniform(theta)).is_ok()
            })
            .collect();
        let first = reachable
            .iter()
            .position(|&ok| ok)
            .expect("some angle is reachable");
        assert!(first > 0, "level arms should be out of reach");
        assert!(
            reachable[first..].iter().all(|&ok| ok),
            "reach is not monotone for sign {sign}"
        );
    }
}
