use super::RobotArgs;
use anyhow::{Context, Result};
use clap::Args;
use tripod::report::render_pose;
use tripod_core::{Angles, RotaryDeltaKin};

#[derive(Args)]
pub struct ForwardArgs {
    /// Shoulder A angle in degrees.
    #[arg(allow_negative_numbers = true)]
    pub a: f64,

    /// Shoulder B angle in degrees.
    #[arg(allow_negative_numbers = true)]
    pub b: f64,

    /// Shoulder C angle in degrees.
    #[arg(allow_negative_numbers = true)]
    pub c: f64,

    #[command(flatten)]
    pub robot: RobotArgs,

    /// Print the pose as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ForwardArgs {
    pub fn run(&self) -> Result<()> {
        let config = self.robot.load()?;
        let kin = RotaryDeltaKin::new(config.geometry()?);

        let angles = Angles::new(self.a, self.b, self.c);
        let pose = kin
            .forward(angles)
            .with_context(|| format!("angles {angles:?} are unreachable"))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&pose)?);
        } else {
            println!("{}", render_pose(&pose));
        }

        Ok(())
    }
}
