use neuroscan_lib::{
    file_type_label, format_file_size, AnalysisSession, AnalyzerConfig, Phase, RiskLevel,
    SelectedFile,
};
use std::time::Duration;
use tempfile::tempdir;

const WAIT: Duration = Duration::from_secs(5);

fn instant_session(seed: u64) -> AnalysisSession {
    let config = AnalyzerConfig::from_toml_str(&format!(
        "[analysis]\ndelay_ms = 0\nseed = {seed}\n"
    ))
    .unwrap();
    AnalysisSession::from_config(&config)
}

#[test]
fn file_details_for_edf_without_type() {
    let mut session = instant_session(1);
    session.select_file(Some(SelectedFile::new(
        "patient_042.edf",
        Some(String::new()),
        20480,
    )));
    let file = session.state().selected().unwrap();
    assert_eq!(file.name, "patient_042.edf");
    assert_eq!(file_type_label(file), "EEG Recording");
    assert_eq!(format_file_size(file.size_bytes), "20 KB");
}

#[test]
fn analysis_runs_busy_then_settles_with_one_result() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patient_042.edf");
    std::fs::write(&path, vec![0u8; 20480]).unwrap();

    let mut session = instant_session(2);
    session.select_file(Some(SelectedFile::from_path(&path).unwrap()));
    assert_eq!(session.state().phase(), Phase::FileSelected);

    assert!(session.start_analysis());
    assert!(session.state().is_busy());
    assert!(!session.start_analysis(), "second submission while busy");

    assert!(session.wait_for_update(WAIT));
    let state = session.state();
    assert!(!state.is_busy());
    assert_eq!(state.phase(), Phase::Completed);
    let result = state.result().unwrap();
    assert!((85..=99).contains(&result.confidence));
    assert_ne!(result.risk_level, RiskLevel::Medium);
    assert!(!session.poll(), "exactly one update per submission");
}

#[test]
fn second_run_replaces_first() {
    let mut session = instant_session(3);
    session.select_file(Some(SelectedFile::new("a.edf", None, 10)));
    session.start_analysis();
    assert!(session.wait_for_update(WAIT));
    let first = session.state().result().cloned().unwrap();

    session.start_analysis();
    assert!(session.wait_for_update(WAIT));
    let second = session.state().result().cloned().unwrap();
    assert_ne!(first, second);
    assert_eq!(session.state().result(), Some(&second));
}

#[test]
fn selecting_again_clears_result() {
    let mut session = instant_session(4);
    session.select_file(Some(SelectedFile::new("a.edf", None, 10)));
    session.start_analysis();
    assert!(session.wait_for_update(WAIT));
    assert!(session.state().result().is_some());

    session.select_file(None);
    assert!(session.state().result().is_some(), "cancel keeps state");

    session.select_file(Some(SelectedFile::new("b.csv", Some("text/csv".into()), 99)));
    assert!(session.state().result().is_none());
    assert_eq!(session.state().phase(), Phase::FileSelected);
}

#[test]
fn enforced_extension_check_surfaces_alert() {
    let config = AnalyzerConfig::from_toml_str(
        "[analysis]\ndelay_ms = 0\n[upload]\nenforce_extensions = true\n",
    )
    .unwrap();
    let mut session = AnalysisSession::from_config(&config);
    session.select_file(Some(SelectedFile::new("scan.dcm", None, 10)));
    assert!(session.start_analysis());
    assert!(session.wait_for_update(WAIT));
    assert_eq!(session.state().phase(), Phase::Failed);
    assert!(session
        .state()
        .alert()
        .unwrap()
        .message
        .starts_with("Unsupported file type"));
}

#[test]
fn configured_delay_keeps_session_busy() {
    let config = AnalyzerConfig::from_toml_str("[analysis]\ndelay_ms = 300\nseed = 5\n").unwrap();
    let mut session = AnalysisSession::from_config(&config);
    session.select_file(Some(SelectedFile::new("a.edf", None, 10)));
    session.start_analysis();
    assert!(!session.wait_for_update(Duration::from_millis(50)));
    assert!(session.state().is_busy());
    assert!(session.wait_for_update(WAIT));
    assert!(!session.state().is_busy());
}
