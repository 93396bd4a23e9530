use super::RobotArgs;
use anyhow::{Context, Result};
use clap::Args;
use tripod::report::{EnvelopeReport, render_envelope};
use tripod_core::RotaryDeltaKin;

#[derive(Args)]
pub struct EnvelopeArgs {
    #[command(flatten)]
    pub robot: RobotArgs,

    /// Print the envelope as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl EnvelopeArgs {
    pub fn run(&self) -> Result<()> {
        let config = self.robot.load()?;
        let geometry = config.geometry()?;
        let calibrator = config.calibrator()?;

        tracing::info!("Calibrating envelope");
        let envelope = calibrator
            .calibrate(&RotaryDeltaKin::new(geometry))
            .context("calibration failed")?;

        if self.json {
            let report = EnvelopeReport {
                geometry: &geometry,
                envelope: &envelope,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", render_envelope(&geometry, &envelope));
        }

        Ok(())
    }
}
