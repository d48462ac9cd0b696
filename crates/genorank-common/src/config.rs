//! Analysis configuration.
//!
//! Loaded from YAML, JSON or TOML. Every section has defaults, so an empty
//! document yields a usable configuration.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenorankError, Result};
use crate::gene::PriorityKind;
use crate::inheritance::ModeOfInheritance;

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Gene scoring options
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Regulatory variant reassignment options
    #[serde(default)]
    pub reassignment: ReassignmentConfig,

    /// Execution options
    #[serde(default)]
    pub execution: ExecutionConfig,
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Gene scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Raw,
    RankBased,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub strategy: ScorerKind,

    /// Modes the filter score is computed for; empty means unspecified.
    #[serde(default = "default_modes")]
    pub modes: Vec<ModeOfInheritance>,

    #[serde(default)]
    pub coefficients: CombinationCoefficients,

    /// Score each gene only under the requested modes its inheritance
    /// verdict allows.
    #[serde(default)]
    pub use_inheritance_modes: bool,
}

fn default_modes() -> Vec<ModeOfInheritance> { vec![ModeOfInheritance::AutosomalDominant] }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strategy: ScorerKind::default(),
            modes: default_modes(),
            coefficients: CombinationCoefficients::default(),
            use_inheritance_modes: false,
        }
    }
}

/// `combined = sigmoid(intercept + priority·p + filter·f)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticCoefficients {
    pub intercept: f64,
    pub priority: f64,
    pub filter: f64,
}

impl LogisticCoefficients {
    pub const fn new(intercept: f64, priority: f64, filter: f64) -> Self {
        Self { intercept, priority, filter }
    }

    fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.priority.is_finite() && self.filter.is_finite()
    }
}

/// Fitted logistic blends, one per prioritiser that has one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinationCoefficients {
    #[serde(default = "default_hiphive")]
    pub hiphive: LogisticCoefficients,
    #[serde(default = "default_exomewalker")]
    pub exomewalker: LogisticCoefficients,
    #[serde(default = "default_phenix")]
    pub phenix: LogisticCoefficients,
}

fn default_hiphive() -> LogisticCoefficients { LogisticCoefficients::new(-13.28813, 10.39451, 9.18381) }
fn default_exomewalker() -> LogisticCoefficients { LogisticCoefficients::new(-8.67972, 219.40082, 8.54374) }
fn default_phenix() -> LogisticCoefficients { LogisticCoefficients::new(-11.15659, 13.21835, 4.08667) }

impl Default for CombinationCoefficients {
    fn default() -> Self {
        Self {
            hiphive: default_hiphive(),
            exomewalker: default_exomewalker(),
            phenix: default_phenix(),
        }
    }
}

impl CombinationCoefficients {
    pub fn validate(&self) -> bool {
        self.hiphive.is_finite() && self.exomewalker.is_finite() && self.phenix.is_finite()
    }
}

// ── Reassignment ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Prioritiser whose scores pick the new gene
    #[serde(default = "default_reassignment_kind")]
    pub priority_kind: PriorityKind,
}

fn default_true() -> bool { true }
fn default_reassignment_kind() -> PriorityKind { PriorityKind::HiPhive }

impl Default for ReassignmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority_kind: default_reassignment_kind(),
        }
    }
}

// ── Execution ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Run per-gene passes on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

// ── Helper Methods ─────────────────────────────────────────────────────────────

impl AnalysisConfig {
    /// Load from YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load genorank.toml, or the file named by GENORANK_CONFIG.
    pub fn load() -> Result<Self> {
        let path = std::env::var("GENORANK_CONFIG")
            .unwrap_or_else(|_| "genorank.toml".to_string());
        if !Path::new(&path).exists() {
            return Err(GenorankError::Config(format!("config file {path} not found")));
        }
        tracing::debug!("Loading analysis config from {path}");
        Self::from_toml(&path)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scoring.coefficients.validate() {
            return Err(GenorankError::Config(
                "combination coefficients must be finite".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for mode in &self.scoring.modes {
            if !seen.insert(mode) {
                return Err(GenorankError::Config(format!("mode {mode} listed twice")));
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
