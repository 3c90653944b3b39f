use crate::app::{App, Focus, TextField};
use neuroscan_lib::{
    band_fill, file_type_label, format_band_percent, format_file_size, risk_style, Alert,
    PredictionResult, SelectedFile, Tone, ACCEPTED_EXTENSIONS,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

const BAND_BAR_WIDTH: u16 = 24;

pub fn draw(f: &mut Frame, app: &App) {
    let state = app.state();
    let details_height = if state.selected().is_some() { 4 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(details_height),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_header(f, layout[0]);
    draw_picker(f, layout[1], &app.path, app.focus == Focus::Path);
    if let Some(file) = state.selected() {
        draw_file_details(f, layout[2], file);
    }
    draw_action(f, layout[3], state.is_busy(), state.can_analyze());
    match state.result() {
        Some(result) => draw_result(f, layout[4], result),
        None => {
            let hint = Paragraph::new("Results appear here once an analysis completes.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title("Analysis Results"));
            f.render_widget(hint, layout[4]);
        }
    }
    draw_disclaimer(f, layout[5]);
    draw_status(f, layout[6], app);

    if let Some(alert) = state.alert() {
        draw_alert(f, alert);
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "NeuroScan Analyzer",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Advanced EEG Seizure Prediction System"),
        Span::styled("  [HIPAA Compliant]", Style::default().fg(Color::DarkGray)),
    ]);
    let header = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_picker(f: &mut Frame, area: Rect, field: &TextField, focused: bool) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let accepted = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(" ");
    let lines = vec![
        Line::from(Span::styled(field.value.as_str(), style)),
        Line::from(Span::styled(
            format!("Supported formats: {accepted}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let picker = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title("Select EEG Recording"),
    );
    f.render_widget(picker, area);
    if focused {
        let cursor_x = area.x + 1 + field.cursor as u16;
        let cursor_y = area.y + 1;
        f.set_cursor(cursor_x.min(area.right().saturating_sub(2)), cursor_y);
    }
}

fn draw_file_details(f: &mut Frame, area: Rect, file: &SelectedFile) {
    let label = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::from(vec![
            Span::styled("File Name  ", label),
            Span::styled(file.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("File Type  ", label),
            Span::raw(file_type_label(file)),
            Span::styled("   File Size  ", label),
            Span::raw(format_file_size(file.size_bytes)),
        ]),
    ];
    let details = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("File Details"));
    f.render_widget(details, area);
}

fn draw_action(f: &mut Frame, area: Rect, busy: bool, enabled: bool) {
    let (text, style) = if busy {
        (
            "⏳ Analyzing EEG Data...",
            Style::default().fg(Color::Yellow),
        )
    } else if enabled {
        (
            "〰 Analyze for Seizure Activity  [a]",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "〰 Analyze for Seizure Activity",
            Style::default().fg(Color::DarkGray),
        )
    };
    let action = Paragraph::new(Span::styled(text, style))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(action, area);
}

fn tone_color(tone: Tone) -> Color {
    let rgb = tone.foreground();
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

fn draw_result(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let style = risk_style(Some(result.risk_level));
    let accent = Style::default().fg(tone_color(style.tone));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(accent)
        .title(Span::styled(
            format!(
                "{} Analysis Results · {}",
                style.icon.glyph(),
                result.risk_badge()
            ),
            accent.add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(columns[0]);

    let label = Style::default().fg(Color::DarkGray);
    let stats = vec![
        Line::from(Span::styled("Prediction", label)),
        Line::from(Span::styled(
            result.prediction.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Confidence Level", label)),
        Line::from(format!("{}%", result.confidence)),
        Line::from(Span::styled("Analysis Time", label)),
        Line::from(result.analysis_time.as_str()),
    ];
    f.render_widget(Paragraph::new(stats), rows[0]);
    let note = Paragraph::new(format!(
        "Note: {} EEG segments analyzed. Review by a qualified neurologist.",
        result.segments_analyzed
    ))
    .style(Style::default().add_modifier(Modifier::DIM))
    .wrap(Wrap { trim: true });
    f.render_widget(note, rows[1]);

    draw_bands(f, columns[1], result);
}

fn draw_bands(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let entries = result.frequency_bands.entries();
    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(entries.iter().map(|_| Constraint::Length(1)));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    f.render_widget(
        Paragraph::new(Span::styled(
            "EEG Frequency Bands",
            Style::default().fg(Color::DarkGray),
        )),
        rows[0],
    );
    for (idx, (band, value)) in entries.iter().enumerate() {
        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(BAND_BAR_WIDTH),
                Constraint::Min(0),
            ])
            .split(rows[idx + 1]);
        f.render_widget(Paragraph::new(*band), row[0]);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
            .ratio(band_fill(*value))
            .label("");
        f.render_widget(gauge, row[1]);
        f.render_widget(Paragraph::new(format!(" {}", format_band_percent(*value))), row[2]);
    }
}

fn draw_disclaimer(f: &mut Frame, area: Rect) {
    let text = "This tool provides analytical support for healthcare professionals. \
All results should be interpreted by qualified medical personnel. \
Not for diagnostic use without clinical correlation.";
    let disclaimer = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Medical Disclaimer"),
        );
    f.render_widget(disclaimer, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let keys = match app.focus {
        Focus::Path => "Enter select · Tab/Esc panel · Ctrl-C quit",
        Focus::Panel => "a analyze · o pick file · q quit",
    };
    let status = Paragraph::new(app.status.as_str())
        .block(Block::default().borders(Borders::ALL).title(keys))
        .wrap(Wrap { trim: true });
    f.render_widget(status, area);
}

fn draw_alert(f: &mut Frame, alert: &Alert) {
    let area = centered_rect(50, 7, f.size());
    let mut lines = vec![Line::from(alert.message.as_str()), Line::from("")];
    lines.push(Line::from(Span::styled(
        if alert.retryable {
            "r retry · Enter dismiss"
        } else {
            "Enter dismiss"
        },
        Style::default().fg(Color::DarkGray),
    )));
    let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title("Analysis failed"),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Rect of `percent_x` width and `height` rows centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x.min(100) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 80, 24);
        let popup = centered_rect(50, 7, area);
        assert_eq!(popup, Rect::new(20, 8, 40, 7));
        let tiny = centered_rect(50, 7, Rect::new(0, 0, 10, 3));
        assert_eq!(tiny.height, 3);
        assert!(tiny.right() <= 10);
    }

    #[test]
    fn tone_colors_unpack_rgb() {
        assert_eq!(tone_color(Tone::Red), Color::Rgb(0xDC, 0x26, 0x26));
    }
}
