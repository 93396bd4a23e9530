use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tripod::config::Config;

pub mod envelope;
pub mod forward;
pub mod inverse;

/// Where the robot description comes from. Flags override the file, and
/// both fall back to the built-in defaults.
#[derive(Args, Debug, Default)]
pub struct RobotArgs {
    /// Path to a configuration file (TOML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Shoulder length, rf (mm).
    #[arg(long)]
    pub shoulder: Option<f64>,

    /// Forearm length, re (mm).
    #[arg(long)]
    pub forearm: Option<f64>,

    /// Base radius, f (mm).
    #[arg(long)]
    pub base_radius: Option<f64>,

    /// End effector radius, e (mm).
    #[arg(long)]
    pub effector_radius: Option<f64>,

    /// Base to floor distance, btf (mm).
    #[arg(long)]
    pub base_to_floor: Option<f64>,

    /// Motor steps per shoulder revolution, s.
    #[arg(long)]
    pub steps_per_rev: Option<u32>,
}

impl RobotArgs {
    /// Load the configuration, apply overrides and validate the result.
    pub fn load(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading robot config from {}", path.display());
                Config::from_file(path)?
            }
            None => Config::default(),
        };

        let g = &mut config.geometry;
        if let Some(v) = self.shoulder {
            g.shoulder = v;
        }
        if let Some(v) = self.forearm {
            g.forearm = v;
        }
        if let Some(v) = self.base_radius {
            g.base_radius = v;
        }
        if let Some(v) = self.effector_radius {
            g.effector_radius = v;
        }
        if let Some(v) = self.base_to_floor {
            g.base_to_floor = v;
        }
        if let Some(v) = self.steps_per_rev {
            g.steps_per_rev = v;
        }

        config.validate()?;
        tracing::debug!("Robot geometry: {:?}", config.geometry);
        Ok(config)
    }
}
