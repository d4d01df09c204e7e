use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::cli::{ErrSearchMode, MeasureArgs};

pub const MAX_SUPPORTED_GRADE: u8 = 16;

/// Constants every maximizer depends on. The default is the reference
/// configuration used in the published MED experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MedConfig {
    pub max_grade: u8,
    pub depth: usize,
    pub ndcg_depth: usize,
    pub rbp_depth: usize,
    pub err_depth: usize,
    pub persistence: f64,
    pub err_promotions: usize,
    pub err_search: ErrSearchMode,
}

impl Default for MedConfig {
    fn default() -> Self {
        Self {
            max_grade: 2,
            depth: 1000,
            ndcg_depth: 20,
            rbp_depth: 1000,
            err_depth: 30,
            persistence: 0.95,
            err_promotions: 5,
            err_search: ErrSearchMode::Pruned,
        }
    }
}

impl MedConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw =
            fs::read(path).with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Defaults, then the optional config file, then individual overrides.
    pub fn resolve(args: &MeasureArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        if let Some(value) = args.max_grade {
            config.max_grade = value;
        }
        if let Some(value) = args.depth {
            config.depth = value;
        }
        if let Some(value) = args.ndcg_depth {
            config.ndcg_depth = value;
        }
        if let Some(value) = args.rbp_depth {
            config.rbp_depth = value;
        }
        if let Some(value) = args.err_depth {
            config.err_depth = value;
        }
        if let Some(value) = args.persistence {
            config.persistence = value;
        }
        if let Some(value) = args.err_promotions {
            config.err_promotions = value;
        }
        if let Some(value) = args.err_search {
            config.err_search = value;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_grade == 0 || self.max_grade > MAX_SUPPORTED_GRADE {
            bail!(
                "max_grade must be between 1 and {MAX_SUPPORTED_GRADE}, got {}",
                self.max_grade
            );
        }

        for (name, value) in [
            ("depth", self.depth),
            ("ndcg_depth", self.ndcg_depth),
            ("rbp_depth", self.rbp_depth),
            ("err_depth", self.err_depth),
        ] {
            if value == 0 {
                bail!("{name} must be positive");
            }
        }

        if !(self.persistence > 0.0 && self.persistence < 1.0) {
            bail!(
                "persistence must lie strictly between 0 and 1, got {}",
                self.persistence
            );
        }

        Ok(())
    }
}
