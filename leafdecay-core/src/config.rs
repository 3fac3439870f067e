//! Decay configuration.
//!
//! Loaded once at startup and never mutated afterwards. The key names match
//! the plugin's historical `config.yml` so existing setups keep working.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

use crate::events::RemovalCause;

/// The bundled default configuration, written out when no file exists yet.
pub const DEFAULT_CONFIG: &str = include_str!("../../package-content/leafdecay_config.json5");

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("failed to access config file {}: {source}", path.display())]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying io error.
        #[source]
        source: io::Error,
    },
    /// The config file is not valid JSON5 or has the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json5::Error),
    /// The config parsed but its values are inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How pending decay checks are turned into executions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulePolicy {
    /// Every pending block gets its own delayed check.
    #[default]
    Independent,
    /// Pending blocks wait in a FIFO queue and are checked one per quantum.
    Serialized,
}

/// Process wide decay settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DecayConfig {
    /// If non-empty, only these worlds are processed.
    pub only_in_worlds: FxHashSet<String>,
    /// These worlds are never processed.
    pub exclude_worlds: FxHashSet<String>,
    /// Delay in ticks after a block is broken.
    pub break_delay: i64,
    /// Delay in ticks after a leaf decays, also the serialized drain interval.
    pub decay_delay: i64,
    /// Spawn block particles on decay.
    pub spawn_particles: bool,
    /// Play a sound on decay.
    pub play_sound: bool,
    /// Use [`SchedulePolicy::Serialized`].
    pub one_by_one: bool,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            only_in_worlds: FxHashSet::default(),
            exclude_worlds: FxHashSet::default(),
            break_delay: 5,
            decay_delay: 2,
            spawn_particles: true,
            play_sound: true,
            one_by_one: false,
        }
    }
}

impl DecayConfig {
    /// Loads the config at `path`, creating it from [`DEFAULT_CONFIG`] if missing.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            return Self::from_json5(&text);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Created default config at {}", path.display());

        Self::from_json5(DEFAULT_CONFIG)
    }

    /// Parses and validates a JSON5 document.
    pub fn from_json5(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json5::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the world lists for obvious mistakes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .only_in_worlds
            .iter()
            .chain(&self.exclude_worlds)
            .any(|world| world.trim().is_empty())
        {
            return Err(ConfigError::Invalid("world names must not be empty".to_string()));
        }
        if let Some(world) = self
            .only_in_worlds
            .iter()
            .find(|world| self.exclude_worlds.contains(*world))
        {
            return Err(ConfigError::Invalid(format!(
                "world {world} is both in OnlyInWorlds and ExcludeWorlds"
            )));
        }
        Ok(())
    }

    /// The scheduling policy selected by `OneByOne`.
    #[must_use]
    pub const fn policy(&self) -> SchedulePolicy {
        if self.one_by_one {
            SchedulePolicy::Serialized
        } else {
            SchedulePolicy::Independent
        }
    }

    /// Returns true if removals in `world` should be processed.
    #[must_use]
    pub fn is_world_enabled(&self, world: &str) -> bool {
        if !self.only_in_worlds.is_empty() && !self.only_in_worlds.contains(world) {
            return false;
        }
        !self.exclude_worlds.contains(world)
    }

    /// The delay for checks triggered by a removal with the given cause.
    #[must_use]
    pub const fn delay_for(&self, cause: RemovalCause) -> u64 {
        match cause {
            RemovalCause::Broken => clamp_delay(self.break_delay),
            RemovalCause::Decayed => clamp_delay(self.decay_delay),
        }
    }

    /// Interval between two drain steps in serialized mode.
    #[must_use]
    pub const fn drain_interval(&self) -> u64 {
        clamp_delay(self.decay_delay)
    }
}

/// Non-positive delays still wait one tick so a check never runs inside the
/// tick that scheduled it.
const fn clamp_delay(delay: i64) -> u64 {
    if delay <= 0 { 1 } else { delay as u64 }
}
