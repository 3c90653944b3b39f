use crate::theme::{self, card, color_from_u32, tone_bg, tone_fg};
use eframe::egui::{self, Align2, RichText};
use egui_plot::{Bar, BarChart, Plot};
use log::warn;
use neuroscan_lib::{
    band_fill, file_type_label, format_band_percent, format_file_size, risk_style,
    AnalysisSession, PredictionResult, SelectedFile, UploadState, ACCEPTED_EXTENSIONS,
};
use rfd::FileDialog;
use std::path::Path;

const DISCLAIMER: &str = "This tool provides analytical support for healthcare professionals. \
All results should be interpreted by qualified medical personnel. \
Not for diagnostic use without clinical correlation.";

/// File picker, file details, analyze button and results for one recording.
pub struct UploadPanel {
    session: AnalysisSession,
    picker_error: Option<String>,
}

impl UploadPanel {
    pub fn new(session: AnalysisSession) -> Self {
        Self {
            session,
            picker_error: None,
        }
    }

    pub fn state(&self) -> &UploadState {
        self.session.state()
    }

    pub fn poll(&mut self) {
        self.session.poll();
    }

    fn browse(&mut self) {
        let picked = FileDialog::new()
            .add_filter("EEG Recording", &ACCEPTED_EXTENSIONS)
            .pick_file();
        match picked {
            Some(path) => self.select_path(&path),
            // cancelled picker leaves the current selection alone
            None => self.session.select_file(None),
        }
    }

    fn select_path(&mut self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => {
                self.picker_error = None;
                self.session.select_file(Some(file));
            }
            Err(err) => {
                warn!("could not open {}: {err:#}", path.display());
                self.picker_error = Some(format!("{err:#}"));
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("EEG File Analysis").strong());
        ui.label(
            RichText::new("Upload patient EEG recordings for seizure detection analysis")
                .color(color_from_u32(theme::MUTED_TEXT)),
        );
        ui.add_space(16.0);

        self.show_picker(ui);

        if let Some(file) = self.session.state().selected() {
            ui.add_space(12.0);
            show_file_details(ui, file);
        }

        ui.add_space(12.0);
        self.show_analyze_button(ui);

        if let Some(result) = self.session.state().result() {
            ui.add_space(16.0);
            show_result(ui, result);
        }

        ui.add_space(16.0);
        show_disclaimer(ui);
    }

    fn show_picker(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("SELECT EEG RECORDING").strong().small());
        let brand_soft = color_from_u32(theme::BRAND_SOFT);
        card(brand_soft, color_from_u32(theme::BRAND)).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("📄").size(28.0));
                ui.label(RichText::new("Choose EEG File").strong().size(16.0));
                ui.label(
                    RichText::new("Supported formats: EDF, CSV, MAT, JSON, XDF")
                        .color(color_from_u32(theme::MUTED_TEXT)),
                );
                if ui.button("Browse Files").clicked() {
                    self.browse();
                }
            });
        });
        if let Some(err) = &self.picker_error {
            ui.colored_label(egui::Color32::LIGHT_RED, err);
        }
    }

    fn show_analyze_button(&mut self, ui: &mut egui::Ui) {
        let state = self.session.state();
        let busy = state.is_busy();
        let label = if busy {
            "⏳ Analyzing EEG Data..."
        } else {
            "〰 Analyze for Seizure Activity"
        };
        let button = egui::Button::new(RichText::new(label).strong().size(16.0))
            .min_size(egui::vec2(ui.available_width(), 44.0));
        let clicked = ui
            .horizontal(|ui| {
                let response = ui.add_enabled(state.can_analyze(), button);
                if busy {
                    ui.spinner();
                }
                response.clicked()
            })
            .inner;
        if clicked {
            self.session.start_analysis();
        }
    }

    /// Modal-style alert for a failed analysis.
    pub fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.session.state().alert().cloned() else {
            return;
        };
        let mut dismiss = false;
        let mut retry = false;
        egui::Window::new("Analysis failed")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&alert.message);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if alert.retryable && ui.button("Retry").clicked() {
                        retry = true;
                    }
                    if ui.button("OK").clicked() {
                        dismiss = true;
                    }
                });
            });
        if retry {
            self.session.retry();
        } else if dismiss {
            self.session.dismiss_alert();
        }
    }
}

fn show_file_details(ui: &mut egui::Ui, file: &SelectedFile) {
    ui.label(RichText::new("📄 File Details").strong().size(15.0));
    egui::Grid::new("file_details")
        .num_columns(3)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            for caption in ["File Name", "File Type", "File Size"] {
                ui.label(RichText::new(caption).color(color_from_u32(theme::MUTED_TEXT)));
            }
            ui.end_row();
            ui.add(egui::Label::new(RichText::new(&file.name).strong()).truncate());
            ui.label(RichText::new(file_type_label(file)).strong());
            ui.label(RichText::new(format_file_size(file.size_bytes)).strong());
            ui.end_row();
        });
}

fn show_result(ui: &mut egui::Ui, result: &PredictionResult) {
    let style = risk_style(Some(result.risk_level));
    let fg = tone_fg(style.tone);
    card(tone_bg(style.tone), fg).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(theme::risk_icon(style));
            ui.label(RichText::new("Analysis Results").strong().size(18.0).color(fg));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(result.risk_badge()).strong().color(fg));
            });
        });
        ui.add_space(8.0);
        ui.columns(2, |cols| {
            stat(&mut cols[0], "Prediction", &result.prediction);
            stat(&mut cols[0], "Confidence Level", &format!("{}%", result.confidence));
            stat(&mut cols[0], "Analysis Time", &result.analysis_time);
            show_bands(&mut cols[1], result);
        });
        ui.separator();
        ui.label(
            RichText::new(format!(
                "Note: {} EEG segments analyzed. This analysis is for clinical support and \
                 should be reviewed by a qualified neurologist.",
                result.segments_analyzed
            ))
            .small(),
        );
    });
}

fn stat(ui: &mut egui::Ui, caption: &str, value: &str) {
    ui.label(RichText::new(caption).color(color_from_u32(theme::MUTED_TEXT)));
    ui.label(RichText::new(value).strong().size(16.0));
    ui.add_space(6.0);
}

fn show_bands(ui: &mut egui::Ui, result: &PredictionResult) {
    ui.label(RichText::new("EEG Frequency Bands").color(color_from_u32(theme::MUTED_TEXT)));
    let entries = result.frequency_bands.entries();
    for (band, value) in entries {
        ui.horizontal(|ui| {
            ui.add_sized([48.0, 16.0], egui::Label::new(capitalize(band)));
            ui.add(
                egui::ProgressBar::new(band_fill(value) as f32)
                    .desired_width(96.0)
                    .fill(color_from_u32(theme::BRAND)),
            );
            ui.label(RichText::new(format_band_percent(value)).small().strong());
        });
    }
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(idx, (band, value))| {
            Bar::new(idx as f64, *value)
                .name(*band)
                .width(0.6)
                .fill(color_from_u32(theme::BRAND))
        })
        .collect();
    Plot::new("frequency_bands")
        .height(110.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show_x(false)
        .include_y(0.0)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

fn show_disclaimer(ui: &mut egui::Ui) {
    let text = color_from_u32(theme::DISCLAIMER_TEXT);
    card(color_from_u32(theme::DISCLAIMER_FILL), text).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new("🛡 Medical Disclaimer").strong().color(text));
        ui.label(RichText::new(DISCLAIMER).small().color(text));
    });
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_band_names() {
        assert_eq!(capitalize("delta"), "Delta");
        assert_eq!(capitalize(""), "");
    }
}
