use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tripod_core::{Calibrator, Geometry};

/// Robot description loaded from a TOML or JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Physical dimensions of the robot
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Envelope calibration settings
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

/// Physical dimensions, in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Shoulder length (rf)
    #[serde(default = "default_shoulder")]
    pub shoulder: f64,

    /// Forearm length (re)
    #[serde(default = "default_forearm")]
    pub forearm: f64,

    /// Base radius (f)
    #[serde(default = "default_base_radius")]
    pub base_radius: f64,

    /// End effector radius (e)
    #[serde(default = "default_effector_radius")]
    pub effector_radius: f64,

    /// Base to floor distance (btf)
    #[serde(default = "default_base_to_floor")]
    pub base_to_floor: f64,

    /// Motor steps per shoulder revolution (s)
    #[serde(default = "default_steps_per_rev")]
    pub steps_per_rev: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            shoulder: default_shoulder(),
            forearm: default_forearm(),
            base_radius: default_base_radius(),
            effector_radius: default_effector_radius(),
            base_to_floor: default_base_to_floor(),
            steps_per_rev: default_steps_per_rev(),
        }
    }
}

/// Calibration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Cube search stops once its step is this small, in mm
    #[serde(default = "default_convergence")]
    pub convergence: f64,

    /// Upper bound on cube search iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            convergence: default_convergence(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_shoulder() -> f64 {
    200.0
}

fn default_forearm() -> f64 {
    530.0
}

fn default_base_radius() -> f64 {
    142.0
}

fn default_effector_radius() -> f64 {
    46.0
}

fn default_base_to_floor() -> f64 {
    700.0
}

fn default_steps_per_rev() -> u32 {
    8192
}

fn default_convergence() -> f64 {
    Calibrator::default().convergence
}

fn default_max_iterations() -> usize {
    Calibrator::default().max_iterations
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            // Try TOML first, fall back to JSON
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.geometry()?;
        self.calibrator()?;
        Ok(())
    }

    /// Validated robot geometry
    pub fn geometry(&self) -> Result<Geometry> {
        let g = &self.geometry;
        Geometry::new(
            g.shoulder,
            g.forearm,
            g.base_radius,
            g.effector_radius,
            g.base_to_floor,
            g.steps_per_rev,
        )
        .context("invalid [geometry] section")
    }

    /// Validated calibration settings
    pub fn calibrator(&self) -> Result<Calibrator> {
        let c = &self.calibration;
        if !c.convergence.is_finite() || c.convergence <= 0.0 {
            anyhow::bail!(
                "calibration.convergence must be a positive length (got {})",
                c.convergence
            );
        }
        if c.max_iterations == 0 {
            anyhow::bail!("calibration.max_iterations must be greater than zero");
        }
        Ok(Calibrator::new(c.convergence, c.max_iterations))
    }
}
