//! Human-readable and JSON renderings of calibration and solver output.

use serde::Serialize;
use std::fmt::Write as _;
use tripod_core::{Actuator, ActuatorSolutions, Angles, Bound, Envelope, Geometry, Pose};

const RULE: &str = "————————————————————————————————————————";

/// Geometry and envelope together, as emitted by `tripod envelope --json`.
#[derive(Debug, Serialize)]
pub struct EnvelopeReport<'a> {
    pub geometry: &'a Geometry,
    pub envelope: &'a Envelope,
}

/// Per-actuator inverse outcome, as emitted by `tripod inverse --json`.
#[derive(Debug, Serialize)]
pub struct ActuatorReport {
    pub actuator: Actuator,
    pub angle: Option<f64>,
    pub error: Option<String>,
}

pub fn actuator_reports(solutions: &ActuatorSolutions) -> Vec<ActuatorReport> {
    Actuator::ALL
        .into_iter()
        .map(|actuator| match solutions.get(actuator) {
            Ok(angle) => ActuatorReport {
                actuator,
                angle: Some(angle),
                error: None,
            },
            Err(err) => ActuatorReport {
                actuator,
                angle: None,
                error: Some(err.to_string()),
            },
        })
        .collect()
}

/// Geometry table followed by home, centre, resolution and axis limits.
pub fn render_envelope(geometry: &Geometry, envelope: &Envelope) -> String {
    let mut out = String::new();
    render_geometry(&mut out, geometry);
    out.push('\n');

    let _ = writeln!(out, ">>>  {:>12}   =   {}", "Home", format_pose(&envelope.home));
    let _ = writeln!(out, "     {:>12}   =   {}", "Center", format_pose(&envelope.center));
    let _ = writeln!(
        out,
        "     {:>12}   =   ± {} mm",
        "Resolution", envelope.resolution
    );
    out.push('\n');

    let _ = writeln!(out, ">>>  {:>12}   =   {} mm", "X[V,A]", format_bound(&envelope.x_limit));
    let _ = writeln!(out, "     {:>12}   =   {} mm", "Y[V,A]", format_bound(&envelope.y_limit));
    let _ = writeln!(out, "     {:>12}   =   {} mm", "Z[V,A]", format_bound(&envelope.z_limit));
    out.push('\n');

    let _ = writeln!(out, ">>>  {:>12}   =   {} °", "A[V,A]", format_bound(&envelope.a_limit));
    let _ = writeln!(out, "     {:>12}   =   {} °", "B[V,A]", format_bound(&envelope.b_limit));
    let _ = writeln!(out, "     {:>12}   =   {} °", "C[V,A]", format_bound(&envelope.c_limit));
    out
}

pub fn render_geometry(out: &mut String, geometry: &Geometry) {
    let rows: [(&str, &str, String); 6] = [
        ("base to floor", "(btf):", geometry.base_to_floor().to_string()),
        ("base radius", "(f):", geometry.base_radius().to_string()),
        ("shoulder length", "(rf):", geometry.shoulder().to_string()),
        ("arm length", "(re):", geometry.forearm().to_string()),
        ("end effector radius", "(e):", geometry.effector_radius().to_string()),
        ("steps per turn", "(s):", geometry.steps_per_rev().to_string()),
    ];

    let _ = writeln!(out, "————————————— Delta Robot ——————————————");
    for (name, symbol, value) in rows {
        let _ = writeln!(out, "|{name:>20}{symbol:>8}{value:>6}    |");
    }
    let _ = writeln!(out, "{RULE}");
}

pub fn render_pose(pose: &Pose) -> String {
    format!("[x, y, z] = {} mm", format_pose(pose))
}

pub fn render_angles(angles: &Angles) -> String {
    format!(
        "[a, b, c] = [{:.6}, {:.6}, {:.6}] °",
        angles.a, angles.b, angles.c
    )
}

/// One line per actuator, naming each failure.
pub fn render_solutions(solutions: &ActuatorSolutions) -> String {
    let mut out = String::new();
    for report in actuator_reports(solutions) {
        match (report.angle, report.error) {
            (Some(angle), _) => {
                let _ = writeln!(out, "{}: {angle:.6} °", report.actuator);
            }
            (None, Some(err)) => {
                let _ = writeln!(out, "{}: unreachable ({err})", report.actuator);
            }
            (None, None) => {}
        }
    }
    out
}

fn format_pose(pose: &Pose) -> String {
    format!("[{:.3}, {:.3}, {:.3}]", pose.x, pose.y, pose.z)
}

fn format_bound(bound: &Bound) -> String {
    format!("[{:>10}, {:>10}]", bound.min, bound.max)
}
