use super::RobotArgs;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tripod::report::{ActuatorReport, actuator_reports, render_angles, render_solutions};
use tripod_core::{Pose, RotaryDeltaKin};

#[derive(Args)]
pub struct InverseArgs {
    /// Tool X position in mm.
    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    /// Tool Y position in mm.
    #[arg(allow_negative_numbers = true)]
    pub y: f64,

    /// Tool Z position in mm (negative is below the base).
    #[arg(allow_negative_numbers = true)]
    pub z: f64,

    #[command(flatten)]
    pub robot: RobotArgs,

    /// Print every actuator's result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct InverseOutput {
    pose: Pose,
    actuators: Vec<ActuatorReport>,
}

impl InverseArgs {
    pub fn run(&self) -> Result<()> {
        let config = self.robot.load()?;
        let kin = RotaryDeltaKin::new(config.geometry()?);

        let pose = Pose::new(self.x, self.y, self.z);
        let solutions = kin.solve_actuators(pose);

        if self.json {
            let output = InverseOutput {
                pose,
                actuators: actuator_reports(&solutions),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        match solutions.angles() {
            Ok(angles) => {
                if !self.json {
                    println!("{}", render_angles(&angles));
                }
                Ok(())
            }
            Err(err) => {
                if !self.json {
                    print!("{}", render_solutions(&solutions));
                }
                anyhow::bail!("pose {pose:?} is unreachable: {err}")
            }
        }
    }
}
