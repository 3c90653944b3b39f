use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How the risk level relates to the prediction label in generated results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskDraw {
    /// Risk and prediction come from separate draws and may disagree.
    #[default]
    Independent,
    /// Risk reuses the prediction draw: seizure results are always HIGH risk.
    Correlated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub delay_ms: u64,
    pub seed: Option<u64>,
    pub seizure_threshold: f64,
    pub high_risk_threshold: f64,
    pub risk_draw: RiskDraw,
    pub analysis_time_label: String,
    pub segments_analyzed: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            seed: None,
            seizure_threshold: 0.7,
            high_risk_threshold: 0.7,
            risk_draw: RiskDraw::Independent,
            analysis_time_label: "2.3s".into(),
            segments_analyzed: 156,
        }
    }
}

/// Submission-time checks. Both are off by default; selection is never validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub enforce_extensions: bool,
    pub max_file_size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub analysis: AnalysisSettings,
    pub upload: UploadSettings,
}

impl AnalyzerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AnalyzerConfig = toml::from_str(contents).context("parsing analyzer config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("seizure_threshold", self.analysis.seizure_threshold),
            ("high_risk_threshold", self.analysis.high_risk_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("analysis.{name} must be within [0, 1], got {value}");
            }
        }
        if self.upload.max_file_size_bytes == Some(0) {
            bail!("upload.max_file_size_bytes must be positive");
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.analysis.delay_ms)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.analysis.seed = seed;
        }
        self
    }
}
