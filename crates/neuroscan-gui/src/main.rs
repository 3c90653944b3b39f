use anyhow::Result;
use clap::Parser;
use eframe::{egui, egui::ViewportBuilder};
use env_logger::Env;
use log::info;
use neuroscan_lib::{AnalysisSession, AnalyzerConfig};
use std::path::PathBuf;
use std::time::Duration;

mod panel;
mod theme;

use panel::UploadPanel;
use theme::color_from_u32;

#[derive(Parser)]
#[command(author, version, about = "NeuroScan EEG upload and analysis dashboard")]
struct Cli {
    /// Analyzer configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logging verbosity (e.g., debug, info, warn)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seed for reproducible mock results
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let config = AnalyzerConfig::load_or_default(args.config.as_deref())?.with_seed(args.seed);
    info!(
        "starting NeuroScan (delay {} ms, risk draw {:?})",
        config.analysis.delay_ms, config.analysis.risk_draw
    );
    let app = NeuroScanApp::new(AnalysisSession::from_config(&config));

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([960.0, 780.0]),
        ..Default::default()
    };
    eframe::run_native(
        "NeuroScan Analyzer",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("window failed: {err}"))
}

/// Page frame: header plus the upload panel.
struct NeuroScanApp {
    panel: UploadPanel,
}

impl NeuroScanApp {
    fn new(session: AnalysisSession) -> Self {
        Self {
            panel: UploadPanel::new(session),
        }
    }
}

impl eframe::App for NeuroScanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.panel.poll();
        if self.panel.state().is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("🧠")
                        .size(28.0)
                        .color(color_from_u32(theme::BRAND)),
                );
                ui.vertical(|ui| {
                    ui.heading(egui::RichText::new("NeuroScan Analyzer").strong());
                    ui.label("Advanced EEG Seizure Prediction System");
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label("🛡 HIPAA Compliant");
                });
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_max_width(820.0);
                self.panel.show(ui);
            });
        });

        self.panel.show_alert(ctx);
    }
}
