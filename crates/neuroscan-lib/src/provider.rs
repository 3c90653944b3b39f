use crate::config::{AnalysisSettings, AnalyzerConfig, RiskDraw, UploadSettings};
use crate::format::format_file_size;
use crate::prediction::{FrequencyBands, PredictionResult, RiskLevel, NORMAL_LABEL, SEIZURE_LABEL};
use crate::upload::UploadForm;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;
use thiserror::Error;

/// Message shown for any failure without a more specific explanation.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error uploading file. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("{name} is not a supported EEG recording")]
    InvalidFileType { name: String },
    #[error("file is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("network failure: {0}")]
    Network(String),
    #[error("analysis service failed: {0}")]
    Server(String),
    #[error("unexpected analysis failure: {0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// Only transient transport failures are worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalysisError::Network(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InvalidFileType { .. } => {
                "Unsupported file type. Choose an EDF, CSV, TXT, MAT, JSON or XDF recording."
                    .to_string()
            }
            AnalysisError::FileTooLarge { size, limit } => format!(
                "File is too large ({}). The maximum upload size is {}.",
                format_file_size(*size),
                format_file_size(*limit)
            ),
            AnalysisError::Network(_) => {
                "Network error while uploading. Check your connection and try again.".to_string()
            }
            AnalysisError::Server(_) => {
                "The analysis service could not process this recording.".to_string()
            }
            AnalysisError::Unexpected(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Success(PredictionResult),
    Failure(AnalysisError),
}

impl AnalysisOutcome {
    pub fn into_result(self) -> Result<PredictionResult, AnalysisError> {
        match self {
            AnalysisOutcome::Success(result) => Ok(result),
            AnalysisOutcome::Failure(err) => Err(err),
        }
    }
}

/// Fires when the owning session shuts down, so blocking providers can bail out.
///
/// Dropping the paired sender counts as a stop.
pub struct StopSignal {
    stop_rx: Receiver<()>,
}

impl StopSignal {
    pub fn pair() -> (Sender<()>, StopSignal) {
        let (stop_tx, stop_rx) = bounded(1);
        (stop_tx, StopSignal { stop_rx })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(
            self.stop_rx.try_recv(),
            Ok(()) | Err(TryRecvError::Disconnected)
        )
    }

    /// Sleep for up to `timeout`. Returns `true` if stopped before it elapsed.
    pub fn wait(&self, timeout: Duration) -> bool {
        !matches!(
            self.stop_rx.recv_timeout(timeout),
            Err(RecvTimeoutError::Timeout)
        )
    }
}

/// Backend that turns an uploaded recording into a prediction.
///
/// Called from the session's worker thread; implementations may block but
/// should return promptly once `stop` fires.
pub trait AnalysisProvider: Send {
    fn submit(&mut self, form: &UploadForm, stop: &StopSignal) -> AnalysisOutcome;
}

/// Stand-in backend: sleeps for the configured delay, then draws a random result.
pub struct MockAnalysisProvider {
    rng: StdRng,
    delay: Duration,
    analysis: AnalysisSettings,
    upload: UploadSettings,
}

impl MockAnalysisProvider {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let rng = match config.analysis.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            delay: config.delay(),
            analysis: config.analysis.clone(),
            upload: config.upload.clone(),
        }
    }

    /// Seeded provider with no delay.
    pub fn seeded(seed: u64) -> Self {
        let mut config = AnalyzerConfig::default();
        config.analysis.delay_ms = 0;
        config.analysis.seed = Some(seed);
        Self::from_config(&config)
    }

    fn check(&self, form: &UploadForm) -> Result<(), AnalysisError> {
        let file = form.file();
        if self.upload.enforce_extensions && !file.has_accepted_extension() {
            return Err(AnalysisError::InvalidFileType {
                name: file.name.clone(),
            });
        }
        if let Some(limit) = self.upload.max_file_size_bytes {
            if file.size_bytes > limit {
                return Err(AnalysisError::FileTooLarge {
                    size: file.size_bytes,
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Draw one result. Every field comes from its own draw unless risk is correlated.
    pub fn generate(&mut self) -> PredictionResult {
        let seizure_draw: f64 = self.rng.gen();
        let seizure = seizure_draw > self.analysis.seizure_threshold;
        let confidence = self.rng.gen_range(85..=99u8);
        let high_risk = match self.analysis.risk_draw {
            RiskDraw::Independent => self.rng.gen::<f64>() > self.analysis.high_risk_threshold,
            RiskDraw::Correlated => seizure,
        };
        let frequency_bands = FrequencyBands {
            delta: self.rng.gen_range(10.0..50.0),
            theta: self.rng.gen_range(5.0..35.0),
            alpha: self.rng.gen_range(5.0..30.0),
            beta: self.rng.gen_range(5.0..25.0),
            gamma: self.rng.gen_range(2.0..17.0),
        };
        PredictionResult {
            prediction: if seizure { SEIZURE_LABEL } else { NORMAL_LABEL }.to_string(),
            confidence,
            risk_level: if high_risk {
                RiskLevel::High
            } else {
                RiskLevel::Low
            },
            analysis_time: self.analysis.analysis_time_label.clone(),
            segments_analyzed: self.analysis.segments_analyzed,
            frequency_bands,
        }
    }
}

impl AnalysisProvider for MockAnalysisProvider {
    fn submit(&mut self, form: &UploadForm, stop: &StopSignal) -> AnalysisOutcome {
        debug!(
            "mock upload of {} as '{}' ({})",
            form.file().name,
            form.field_name(),
            form.content_type()
        );
        if !self.delay.is_zero() && stop.wait(self.delay) {
            info!("analysis of {} cancelled", form.file().name);
            return AnalysisOutcome::Failure(AnalysisError::Unexpected(
                "analysis cancelled".into(),
            ));
        }
        if let Err(err) = self.check(form) {
            warn!("rejected {}: {}", form.file().name, err);
            return AnalysisOutcome::Failure(err);
        }
        AnalysisOutcome::Success(self.generate())
    }
}
