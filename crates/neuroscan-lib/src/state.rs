use crate::prediction::PredictionResult;
use crate::provider::AnalysisError;
use crate::upload::SelectedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    Analyzing,
    Completed,
    Failed,
}

/// Blocking message shown after a failed analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub retryable: bool,
}

impl From<&AnalysisError> for Alert {
    fn from(err: &AnalysisError) -> Self {
        Self {
            message: err.user_message(),
            retryable: err.is_retryable(),
        }
    }
}

/// Everything the upload panel renders from.
///
/// Transitions consume the current state and return the next one; a
/// transition whose precondition does not hold returns the state untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    selected: Option<SelectedFile>,
    busy: bool,
    result: Option<PredictionResult>,
    alert: Option<Alert>,
}

impl UploadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn can_analyze(&self) -> bool {
        self.selected.is_some() && !self.busy
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Analyzing
        } else if self.result.is_some() {
            Phase::Completed
        } else if self.alert.is_some() {
            Phase::Failed
        } else if self.selected.is_some() {
            Phase::FileSelected
        } else {
            Phase::Idle
        }
    }

    /// A cancelled picker (`None`) leaves the state unchanged.
    #[must_use]
    pub fn on_file_selected(self, file: Option<SelectedFile>) -> Self {
        match file {
            Some(file) => Self {
                selected: Some(file),
                result: None,
                alert: None,
                ..self
            },
            None => self,
        }
    }

    #[must_use]
    pub fn on_analysis_started(self) -> Self {
        if !self.can_analyze() {
            return self;
        }
        Self {
            busy: true,
            alert: None,
            ..self
        }
    }

    #[must_use]
    pub fn on_analysis_completed(self, result: PredictionResult) -> Self {
        Self {
            busy: false,
            result: Some(result),
            alert: None,
            ..self
        }
    }

    #[must_use]
    pub fn on_analysis_failed(self, err: &AnalysisError) -> Self {
        Self {
            busy: false,
            result: None,
            alert: Some(Alert::from(err)),
            ..self
        }
    }

    #[must_use]
    pub fn on_alert_dismissed(self) -> Self {
        Self {
            alert: None,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockAnalysisProvider;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, None, 20480)
    }

    fn completed() -> UploadState {
        let result = MockAnalysisProvider::seeded(11).generate();
        UploadState::new()
            .on_file_selected(Some(file("a.edf")))
            .on_analysis_started()
            .on_analysis_completed(result)
    }

    #[test]
    fn starts_idle() {
        let state = UploadState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.can_analyze());
    }

    #[test]
    fn selecting_clears_previous_result() {
        let state = completed();
        assert_eq!(state.phase(), Phase::Completed);
        let state = state.on_file_selected(Some(file("b.edf")));
        assert!(state.result().is_none());
        assert_eq!(state.selected().map(|f| f.name.as_str()), Some("b.edf"));
        assert_eq!(state.phase(), Phase::FileSelected);
    }

    #[test]
    fn cancelled_selection_is_ignored() {
        let before = completed();
        let after = before.clone().on_file_selected(None);
        assert_eq!(before, after);
    }

    #[test]
    fn start_without_file_is_noop() {
        let state = UploadState::new().on_analysis_started();
        assert!(!state.is_busy());
        assert_eq!(state, UploadState::new());
    }

    #[test]
    fn start_while_busy_is_noop() {
        let busy = UploadState::new()
            .on_file_selected(Some(file("a.edf")))
            .on_analysis_started();
        assert!(busy.is_busy());
        assert!(!busy.can_analyze());
        assert_eq!(busy.clone().on_analysis_started(), busy);
    }

    #[test]
    fn completion_replaces_result() {
        let first = completed();
        let next = MockAnalysisProvider::seeded(12).generate();
        let state = first
            .on_analysis_started()
            .on_analysis_completed(next.clone());
        assert!(!state.is_busy());
        assert_eq!(state.result(), Some(&next));
    }

    #[test]
    fn failure_exits_busy_with_alert() {
        let state = completed()
            .on_analysis_started()
            .on_analysis_failed(&AnalysisError::Unexpected("worker died".into()));
        assert!(!state.is_busy());
        assert!(state.result().is_none());
        assert_eq!(state.phase(), Phase::Failed);
        let alert = state.alert().unwrap();
        assert_eq!(alert.message, "Error uploading file. Please try again.");
        assert!(!alert.retryable);

        let state = state.on_alert_dismissed();
        assert_eq!(state.phase(), Phase::FileSelected);
        assert!(state.can_analyze());
    }

    #[test]
    fn network_failures_offer_retry() {
        let state = UploadState::new()
            .on_file_selected(Some(file("a.edf")))
            .on_analysis_started()
            .on_analysis_failed(&AnalysisError::Network("timeout".into()));
        assert!(state.alert().unwrap().retryable);
    }
}
