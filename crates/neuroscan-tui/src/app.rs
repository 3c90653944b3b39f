use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use neuroscan_lib::{AnalysisSession, SelectedFile, UploadState};
use std::path::PathBuf;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Focus {
    Panel,
    Path,
}

#[derive(Default)]
pub struct TextField {
    pub value: String,
    pub cursor: usize,
}

impl TextField {
    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                let at = self.byte_index();
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index();
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_index();
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                true
            }
            _ => false,
        }
    }
}

pub struct App {
    pub session: AnalysisSession,
    pub focus: Focus,
    pub path: TextField,
    pub status: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: AnalysisSession) -> Self {
        Self {
            session,
            focus: Focus::Path,
            path: TextField::default(),
            status: "Type the path of an EEG recording and press Enter.".into(),
            should_quit: false,
        }
    }

    pub fn state(&self) -> &UploadState {
        self.session.state()
    }

    pub fn tick(&mut self) {
        let was_busy = self.state().is_busy();
        if self.session.poll() && was_busy && !self.state().is_busy() {
            self.status = if self.state().result().is_some() {
                "Analysis complete.".into()
            } else {
                "Analysis failed.".into()
            };
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.state().alert().is_some() {
            self.on_alert_key(&key);
            return;
        }
        match self.focus {
            Focus::Path => self.on_path_key(&key),
            Focus::Panel => self.on_panel_key(&key),
        }
    }

    fn on_alert_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.state().alert().map(|a| a.retryable).unwrap_or(false)
                    && self.session.retry()
                {
                    self.status = "Retrying analysis...".into();
                }
            }
            KeyCode::Enter | KeyCode::Esc => self.session.dismiss_alert(),
            _ => {}
        }
    }

    fn on_path_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Err(err) = self.select_typed_path() {
                    warn!("file selection failed: {err:#}");
                    self.status = format!("Error: {err:#}");
                }
            }
            KeyCode::Esc | KeyCode::Tab => self.focus = Focus::Panel,
            _ => {
                self.path.handle_key(key);
            }
        }
    }

    fn on_panel_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('o') | KeyCode::Tab => self.focus = Focus::Path,
            KeyCode::Char('a') | KeyCode::Enter => self.run_analysis(),
            _ => {}
        }
    }

    /// An empty path behaves like a cancelled picker.
    fn select_typed_path(&mut self) -> Result<()> {
        let typed = self.path.value.trim();
        if typed.is_empty() {
            self.session.select_file(None);
            return Ok(());
        }
        let path = PathBuf::from(typed);
        if !path.exists() {
            return Err(anyhow!("{} does not exist", path.display()));
        }
        let file = SelectedFile::from_path(&path)?;
        self.status = format!("Selected {}. Press a to analyze.", file.name);
        self.session.select_file(Some(file));
        self.focus = Focus::Panel;
        Ok(())
    }

    fn run_analysis(&mut self) {
        if self.session.start_analysis() {
            self.status = "Analyzing EEG Data...".into();
        } else if self.state().selected().is_none() {
            self.status = "Select a recording first (press o).".into();
        }
    }
}
