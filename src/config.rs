//! # Difficulty Configuration
//!
//! Declarative per-difficulty settings read by the generator. The registry is
//! YAML with kebab-case keys, one top-level entry per difficulty tag:
//!
//! ```yaml
//! beginner:
//!   durations:
//!     - duration: 24
//!       weight: 0.5
//!     - duration: 12        # no weight: shares the remaining mass
//!   rest-probability: 0.1
//!   run-lengths: { 1: 0.2, 2: 0.3, 4: 0.5 }
//!   switch-probability: 0.5
//!   dynamic-thresholds: [0.9, 0.98]
//!   flam-threshold: 0.0
//!   drag-threshold: 0.0
//!   balancing: { enabled: true, max-clump: 4, min-ratio: 0.5, max-ratio: 0.8 }
//! ```
//!
//! A default registry ships inside the crate (`DifficultyRegistry::builtin`).
//! The generator only reads configuration; nothing here is mutated during a
//! request.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BeatError;
use crate::measure::Duration;

static BUILTIN_REGISTRY: &str = include_str!("../config/difficulties.yaml");

/// Difficulty level of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTag {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyTag {
    pub const ALL: [DifficultyTag; 4] = [
        DifficultyTag::Beginner,
        DifficultyTag::Intermediate,
        DifficultyTag::Advanced,
        DifficultyTag::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTag::Beginner => "beginner",
            DifficultyTag::Intermediate => "intermediate",
            DifficultyTag::Advanced => "advanced",
            DifficultyTag::Expert => "expert",
        }
    }
}

impl fmt::Display for DifficultyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTag {
    type Err = BeatError;

    /// Parse a tag case-insensitively ("Beginner", "EXPERT", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        DifficultyTag::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| BeatError::UnknownDifficulty(s.trim().to_string()))
    }
}

/// One entry of the duration menu
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DurationWeight {
    pub duration: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl DurationWeight {
    pub fn new(duration: Duration, weight: Option<f64>) -> Self {
        Self { duration, weight }
    }
}

/// Hand-balancing policy
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BalancePolicy {
    #[serde(default)]
    pub enabled: bool,
    /// Longest run of consecutive strokes with the same hand.
    #[serde(default)]
    pub max_clump: Option<usize>,
    /// Bounds on the fraction of strokes played by the dominant hand.
    #[serde(default)]
    pub min_ratio: Option<f64>,
    #[serde(default)]
    pub max_ratio: Option<f64>,
}

/// Generation settings for one difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DifficultyConfig {
    pub durations: Vec<DurationWeight>,
    #[serde(default)]
    pub rest_probability: f64,
    /// Run length (in notes) -> weight.
    pub run_lengths: BTreeMap<u32, f64>,
    pub switch_probability: f64,
    /// Only the first two entries are read: normal below the first,
    /// accent below the second, rimshot otherwise.
    pub dynamic_thresholds: Vec<f64>,
    #[serde(default)]
    pub flam_threshold: f64,
    #[serde(default)]
    pub drag_threshold: f64,
    #[serde(default)]
    pub balancing: BalancePolicy,
}

impl DifficultyConfig {
    pub fn normal_threshold(&self) -> f64 {
        self.dynamic_thresholds.first().copied().unwrap_or(1.0)
    }

    pub fn accent_threshold(&self) -> f64 {
        self.dynamic_thresholds.get(1).copied().unwrap_or(1.0)
    }

    /// Run-length distribution as weighted entries, shortest first.
    pub fn run_length_weights(&self) -> Vec<(u32, Option<f64>)> {
        self.run_lengths.iter().map(|(&len, &w)| (len, Some(w))).collect()
    }

    /// Duration menu as weighted entries, in configured order.
    pub fn duration_weights(&self) -> Vec<(Duration, Option<f64>)> {
        self.durations.iter().map(|d| (d.duration, d.weight)).collect()
    }

    /// Check the values the generator depends on.
    pub fn validate(&self) -> Result<(), BeatError> {
        if self.durations.is_empty() {
            return Err(BeatError::ConfigError("durations must not be empty".to_string()));
        }
        if self.run_lengths.is_empty() {
            return Err(BeatError::ConfigError("run-lengths must not be empty".to_string()));
        }
        if self.run_lengths.contains_key(&0) {
            return Err(BeatError::ConfigError("run-lengths keys must be at least 1".to_string()));
        }
        if self.dynamic_thresholds.len() < 2 {
            return Err(BeatError::ConfigError(format!(
                "dynamic-thresholds needs at least 2 values, got {}",
                self.dynamic_thresholds.len()
            )));
        }
        if self.dynamic_thresholds.len() > 2 {
            tracing::debug!(
                extra = self.dynamic_thresholds.len() - 2,
                "dynamic-thresholds beyond the first two are ignored"
            );
        }

        let probabilities = [
            ("rest-probability", self.rest_probability),
            ("switch-probability", self.switch_probability),
            ("flam-threshold", self.flam_threshold),
            ("drag-threshold", self.drag_threshold),
        ];
        for (name, value) in probabilities {
            check_unit(name, value)?;
        }
        for d in &self.durations {
            if let Some(w) = d.weight {
                if w < 0.0 {
                    return Err(BeatError::ConfigError(format!(
                        "weight for duration {} must not be negative",
                        d.duration.ticks()
                    )));
                }
            }
        }

        let policy = &self.balancing;
        if policy.max_clump == Some(0) {
            return Err(BeatError::ConfigError("max-clump must be at least 1".to_string()));
        }
        if let Some(min) = policy.min_ratio {
            check_unit("min-ratio", min)?;
        }
        if let Some(max) = policy.max_ratio {
            check_unit("max-ratio", max)?;
        }
        if let (Some(min), Some(max)) = (policy.min_ratio, policy.max_ratio) {
            if min > max {
                return Err(BeatError::ConfigError(format!(
                    "min-ratio {} is greater than max-ratio {}",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), BeatError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BeatError::ConfigError(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )))
    }
}

/// Difficulty tag -> configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyRegistry {
    configs: BTreeMap<DifficultyTag, DifficultyConfig>,
}

impl DifficultyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry compiled into the crate.
    pub fn builtin() -> Result<Self, BeatError> {
        Self::from_yaml(BUILTIN_REGISTRY)
    }

    /// Parse and validate a YAML registry.
    pub fn from_yaml(source: &str) -> Result<Self, BeatError> {
        let registry: DifficultyRegistry =
            serde_yaml::from_str(source).map_err(|e| BeatError::ConfigError(e.to_string()))?;
        for (tag, config) in &registry.configs {
            config
                .validate()
                .map_err(|e| BeatError::ConfigError(format!("{}: {}", tag, e)))?;
        }
        Ok(registry)
    }

    /// Read a YAML registry from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BeatError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            BeatError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&source)
    }

    pub fn insert(&mut self, tag: DifficultyTag, config: DifficultyConfig) {
        self.configs.insert(tag, config);
    }

    /// Configuration for `tag`, or `UnknownDifficulty`.
    pub fn get(&self, tag: DifficultyTag) -> Result<&DifficultyConfig, BeatError> {
        self.configs
            .get(&tag)
            .ok_or_else(|| BeatError::UnknownDifficulty(tag.to_string()))
    }

    pub fn tags(&self) -> impl Iterator<Item = DifficultyTag> + '_ {
        self.configs.keys().copied()
    }
}
