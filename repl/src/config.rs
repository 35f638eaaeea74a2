use std::{
    env, fs,
    path::{Path, PathBuf},
};

use memsim_core::AllocationStrategy;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "memsim.toml";

/// Simulator settings. CLI flags are applied on top of these by `main`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Total size of the simulated address space, in units. `None` means ask at startup.
    pub total_memory: Option<usize>,
    /// Initial placement strategy
    pub strategy: AllocationStrategy,
    /// File used to persist interactive command history
    pub history_file: PathBuf,
    pub use_colors: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            total_memory: None,
            strategy: AllocationStrategy::FirstFit,
            history_file: PathBuf::from(".memsim_history"),
            use_colors: true,
        }
    }
}

impl SimulatorConfig {
    /// Resolve the config path, read it and apply environment variable overrides.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = Self::resolve_path(explicit, env::var("MEMSIM_CONFIG").ok());
        let mut cfg = Self::load_from_path(&path)?;
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    /// Config path precedence: `--config`, then MEMSIM_CONFIG, then `memsim.toml`.
    pub fn resolve_path(explicit: Option<&Path>, env_path: Option<String>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| env_path.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load config from a TOML file. Falls back to defaults if the file is not found.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(s) => Ok(toml::from_str(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply MEMSIM_* environment variable overrides.
    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(v) = env::var("MEMSIM_TOTAL_MEMORY") {
            self.total_memory = Some(v.trim().parse()?);
        }

        if let Ok(v) = env::var("MEMSIM_STRATEGY") {
            self.strategy = v.parse()?;
        }

        Ok(())
    }
}
