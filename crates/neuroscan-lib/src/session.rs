use crate::config::AnalyzerConfig;
use crate::format::format_file_size;
use crate::prediction::PredictionResult;
use crate::provider::{
    AnalysisError, AnalysisOutcome, AnalysisProvider, MockAnalysisProvider, StopSignal,
};
use crate::state::UploadState;
use crate::upload::{SelectedFile, UploadForm};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{error, info};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::JoinHandle;
use std::time::Duration;

enum AnalysisCommand {
    Submit(UploadForm),
    Shutdown,
}

enum AnalysisUpdate {
    Completed(PredictionResult),
    Failed(AnalysisError),
}

/// Owns the upload state and a worker thread that runs the analysis provider.
///
/// The UI thread calls `poll` each frame to fold finished work back into the
/// state. The busy flag guarantees at most one submission is in flight.
pub struct AnalysisSession {
    state: UploadState,
    command_tx: Sender<AnalysisCommand>,
    update_rx: Receiver<AnalysisUpdate>,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl AnalysisSession {
    pub fn new<P: AnalysisProvider + 'static>(provider: P) -> Self {
        let (command_tx, command_rx) = bounded(4);
        let (update_tx, update_rx) = bounded(4);
        let (stop_tx, stop) = StopSignal::pair();
        let worker = std::thread::spawn(move || {
            AnalysisWorker::new(Box::new(provider), command_rx, update_tx, stop).run()
        });
        Self {
            state: UploadState::new(),
            command_tx,
            update_rx,
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(MockAnalysisProvider::from_config(config))
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        if let Some(file) = &file {
            info!(
                "selected {} ({})",
                file.name,
                format_file_size(file.size_bytes)
            );
        }
        self.transition(|state| state.on_file_selected(file));
    }

    /// Queue an analysis of the selected file. Returns `false` when nothing was queued.
    pub fn start_analysis(&mut self) -> bool {
        if !self.state.can_analyze() {
            return false;
        }
        let Some(file) = self.state.selected().cloned() else {
            return false;
        };
        info!("submitting {} for analysis", file.name);
        self.transition(UploadState::on_analysis_started);
        if self
            .command_tx
            .send(AnalysisCommand::Submit(UploadForm::new(file)))
            .is_err()
        {
            self.fail(AnalysisError::Unexpected("analysis worker is not running".into()));
        }
        true
    }

    /// Dismiss the current alert and submit again.
    pub fn retry(&mut self) -> bool {
        self.dismiss_alert();
        self.start_analysis()
    }

    pub fn dismiss_alert(&mut self) {
        self.transition(UploadState::on_alert_dismissed);
    }

    /// Apply any finished work without blocking. Returns whether the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.update_rx.try_recv() {
                Ok(update) => {
                    self.apply(update);
                    changed = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    changed |= self.worker_lost();
                    break;
                }
            }
        }
        changed
    }

    /// Block up to `timeout` for the next piece of finished work.
    pub fn wait_for_update(&mut self, timeout: Duration) -> bool {
        match self.update_rx.recv_timeout(timeout) {
            Ok(update) => {
                self.apply(update);
                self.poll();
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => self.worker_lost(),
        }
    }

    fn apply(&mut self, update: AnalysisUpdate) {
        match update {
            AnalysisUpdate::Completed(result) => {
                info!(
                    "analysis finished: {} ({}% confidence, {} risk)",
                    result.prediction, result.confidence, result.risk_level
                );
                self.transition(|state| state.on_analysis_completed(result));
            }
            AnalysisUpdate::Failed(err) => self.fail(err),
        }
    }

    fn worker_lost(&mut self) -> bool {
        if !self.state.is_busy() {
            return false;
        }
        self.fail(AnalysisError::Unexpected("analysis worker stopped".into()));
        true
    }

    fn fail(&mut self, err: AnalysisError) {
        error!("Error uploading file: {err}");
        self.transition(|state| state.on_analysis_failed(&err));
    }

    fn transition(&mut self, step: impl FnOnce(UploadState) -> UploadState) {
        let current = std::mem::take(&mut self.state);
        self.state = step(current);
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        // disconnecting the stop channel interrupts an in-flight submission
        self.stop_tx.take();
        let _ = self.command_tx.send(AnalysisCommand::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

struct AnalysisWorker {
    provider: Box<dyn AnalysisProvider>,
    command_rx: Receiver<AnalysisCommand>,
    update_tx: Sender<AnalysisUpdate>,
    stop: StopSignal,
}

impl AnalysisWorker {
    fn new(
        provider: Box<dyn AnalysisProvider>,
        command_rx: Receiver<AnalysisCommand>,
        update_tx: Sender<AnalysisUpdate>,
        stop: StopSignal,
    ) -> Self {
        Self {
            provider,
            command_rx,
            update_tx,
            stop,
        }
    }

    fn run(mut self) {
        while let Ok(command) = self.command_rx.recv() {
            match command {
                AnalysisCommand::Submit(_) if self.stop.is_stopped() => break,
                AnalysisCommand::Submit(form) => {
                    let update = self.submit(&form);
                    if self.update_tx.send(update).is_err() {
                        break;
                    }
                }
                AnalysisCommand::Shutdown => break,
            }
        }
    }

    fn submit(&mut self, form: &UploadForm) -> AnalysisUpdate {
        let provider = &mut self.provider;
        let stop = &self.stop;
        match panic::catch_unwind(AssertUnwindSafe(|| provider.submit(form, stop))) {
            Ok(AnalysisOutcome::Success(result)) => AnalysisUpdate::Completed(result),
            Ok(AnalysisOutcome::Failure(err)) => AnalysisUpdate::Failed(err),
            Err(payload) => AnalysisUpdate::Failed(AnalysisError::Unexpected(panic_message(
                payload.as_ref(),
            ))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "analysis provider panicked".to_string()
    }
}
