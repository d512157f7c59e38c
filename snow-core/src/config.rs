//! Simulation parameters and their TOML representation.
//!
//! A config file looks like:
//!
//! ```toml
//! [pile]
//! growRate = 0.05
//! maxHeight = 36.0
//! meltRadius = 56.0
//!
//! [drift]
//! fallSpeed = 0.6
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults below.
//! Unknown keys are rejected so that typos do not silently do nothing.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Parameters of the height-field pile (growth, pointer melt, smoothing).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PileConfig {
    /// Base height added to every column per tick, before jitter.
    pub grow_rate: f32,
    /// Upper bound for every column of the pile and the target.
    pub max_height: f32,
    /// Constant band of snow drawn below the pile surface, in pixels.
    pub base_thickness: f32,
    /// Horizontal reach of the pointer melt, in pixels.
    pub melt_radius: f32,
    /// Fraction of `max_height` removed per tick at the pointer center.
    pub melt_strength: f32,
    /// Falloff exponent; higher values concentrate the melt at the center.
    pub melt_falloff: f32,
    /// Maximum vertical distance between pointer and surface that still melts.
    pub melt_band: f32,
    /// Number of diffusion iterations per tick.
    pub smooth_passes: usize,
    /// Fraction of the remaining distance to the target covered per tick.
    pub ease: f32,
}

impl Default for PileConfig {
    fn default() -> Self {
        Self {
            grow_rate: 0.05,
            max_height: 36.0,
            base_thickness: 10.0,
            melt_radius: 56.0,
            melt_strength: 0.08,
            melt_falloff: 2.6,
            melt_band: 80.0,
            smooth_passes: 2,
            ease: 0.18,
        }
    }
}

impl PileConfig {
    /// Checks that every parameter keeps the simulation well defined.
    ///
    /// `melt_radius` is a divisor in the falloff, and `ease` outside
    /// `(0, 1]` would either freeze the pile or overshoot the target.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("growRate", self.grow_rate)?;
        positive("maxHeight", self.max_height)?;
        non_negative("baseThickness", self.base_thickness)?;
        positive("meltRadius", self.melt_radius)?;
        non_negative("meltStrength", self.melt_strength)?;
        non_negative("meltFalloff", self.melt_falloff)?;
        non_negative("meltBand", self.melt_band)?;
        positive("ease", self.ease)?;
        in_range("ease", self.ease, 0.0, 1.0)?;
        Ok(())
    }
}

/// Parameters of the falling-flake drift mode.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DriftConfig {
    /// Pixels a flake falls per tick.
    pub fall_speed: f32,
    /// Height deposited per unit of flake radius when a flake lands.
    pub acc_rate: f32,
    /// Probability of spawning one new flake per tick.
    pub spawn_chance: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            fall_speed: 0.6,
            acc_rate: 0.15,
            spawn_chance: 0.4,
        }
    }
}

impl DriftConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("fallSpeed", self.fall_speed)?;
        non_negative("accRate", self.acc_rate)?;
        in_range("spawnChance", self.spawn_chance, 0.0, 1.0)?;
        Ok(())
    }
}

/// Full configuration: one section per simulation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pile: PileConfig,
    pub drift: DriftConfig,
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&src)?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pile.validate()?;
        self.drift.validate()
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
