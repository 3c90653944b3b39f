use serde::{Deserialize, Serialize};
use std::fmt;

pub const SEIZURE_LABEL: &str = "Seizure Activity Detected";
pub const NORMAL_LABEL: &str = "Normal EEG Pattern";

/// Severity attached to a prediction for display styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    /// Styled by the UI but never produced by the mock generator.
    Medium,
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
        }
    }

    /// Lenient parse used for labels coming back from a service; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Some(RiskLevel::High),
            "MEDIUM" => Some(RiskLevel::Medium),
            "LOW" => Some(RiskLevel::Low),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative power per EEG band, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBands {
    pub delta: f64,
    pub theta: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl FrequencyBands {
    pub const NAMES: [&'static str; 5] = ["delta", "theta", "alpha", "beta", "gamma"];

    /// Bands in display order, lowest frequency first.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("delta", self.delta),
            ("theta", self.theta),
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ]
    }
}

/// Result of one analysis run, shaped like the prediction service's JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    pub confidence: u8,
    pub risk_level: RiskLevel,
    pub analysis_time: String,
    pub segments_analyzed: u32,
    pub frequency_bands: FrequencyBands,
}

impl PredictionResult {
    pub fn is_seizure(&self) -> bool {
        self.prediction == SEIZURE_LABEL
    }

    /// Badge text, e.g. `HIGH RISK`.
    pub fn risk_badge(&self) -> String {
        format!("{} RISK", self.risk_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PredictionResult {
        PredictionResult {
            prediction: NORMAL_LABEL.into(),
            confidence: 91,
            risk_level: RiskLevel::Low,
            analysis_time: "2.3s".into(),
            segments_analyzed: 156,
            frequency_bands: FrequencyBands {
                delta: 32.5,
                theta: 12.0,
                alpha: 18.25,
                beta: 9.0,
                gamma: 4.5,
            },
        }
    }

    #[test]
    fn serializes_with_service_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["risk_level"], "LOW");
        assert_eq!(json["analysis_time"], "2.3s");
        assert_eq!(json["segments_analyzed"], 156);
        assert_eq!(json["frequency_bands"]["alpha"], 18.25);
    }

    #[test]
    fn parses_service_response() {
        let body = r#"{
            "prediction": "Seizure Activity Detected",
            "confidence": 97,
            "risk_level": "HIGH",
            "analysis_time": "1.9s",
            "segments_analyzed": 80,
            "frequency_bands": {"delta": 40.1, "theta": 20.0, "alpha": 6.2, "beta": 7.7, "gamma": 3.3}
        }"#;
        let result: PredictionResult = serde_json::from_str(body).unwrap();
        assert!(result.is_seizure());
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.risk_badge(), "HIGH RISK");
    }

    #[test]
    fn risk_parse_is_lenient_but_rejects_unknown() {
        assert_eq!(RiskLevel::parse(" medium "), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::parse("CRITICAL"), None);
        assert_eq!(RiskLevel::parse(""), None);
    }

    #[test]
    fn band_entries_follow_frequency_order() {
        let names: Vec<_> = sample().frequency_bands.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, FrequencyBands::NAMES);
    }
}
