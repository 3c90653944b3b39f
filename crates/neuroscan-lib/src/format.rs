//! Pure display helpers shared by the GUI and TUI front ends.

use crate::prediction::RiskLevel;
use crate::upload::SelectedFile;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const UNIT_STEP: u64 = 1024;

/// Label shown when the picker reports no MIME type.
pub const FALLBACK_FILE_TYPE: &str = "EEG Recording";

/// Human-readable size using 1024-based units, e.g. `1.5 KB`.
///
/// Values are rounded to two decimals with trailing zeros dropped. Sizes past
/// the gigabyte range stay expressed in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    // integer floor(log1024(bytes)); avoids float error at exact powers
    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes / scale >= UNIT_STEP {
        scale *= UNIT_STEP;
        unit += 1;
    }
    let value = bytes as f64 / scale as f64;
    format!("{} {}", trim_decimals(value), SIZE_UNITS[unit])
}

fn trim_decimals(value: f64) -> String {
    // ties round up (1.125 -> 1.13); `{:.2}` alone would round them to even
    let rounded = (value * 100.0).round() / 100.0;
    let fixed = format!("{:.2}", rounded);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn file_type_label(file: &SelectedFile) -> &str {
    file.mime_type().unwrap_or(FALLBACK_FILE_TYPE)
}

/// Color family for a risk panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Yellow,
    Green,
    Gray,
}

impl Tone {
    /// Text/border color as 0xRRGGBB.
    pub fn foreground(&self) -> u32 {
        match self {
            Tone::Red => 0xDC2626,
            Tone::Yellow => 0xCA8A04,
            Tone::Green => 0x16A34A,
            Tone::Gray => 0x4B5563,
        }
    }

    /// Panel fill as 0xRRGGBB.
    pub fn background(&self) -> u32 {
        match self {
            Tone::Red => 0xFEF2F2,
            Tone::Yellow => 0xFEFCE8,
            Tone::Green => 0xF0FDF4,
            Tone::Gray => 0xF9FAFB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskIcon {
    AlertTriangle,
    Activity,
    CheckCircle,
    Shield,
}

impl RiskIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            RiskIcon::AlertTriangle => "⚠",
            RiskIcon::Activity => "〰",
            RiskIcon::CheckCircle => "✔",
            RiskIcon::Shield => "🛡",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskStyle {
    pub tone: Tone,
    pub icon: RiskIcon,
}

pub fn risk_style(risk: Option<RiskLevel>) -> RiskStyle {
    match risk {
        Some(RiskLevel::High) => RiskStyle {
            tone: Tone::Red,
            icon: RiskIcon::AlertTriangle,
        },
        Some(RiskLevel::Medium) => RiskStyle {
            tone: Tone::Yellow,
            icon: RiskIcon::Activity,
        },
        Some(RiskLevel::Low) => RiskStyle {
            tone: Tone::Green,
            icon: RiskIcon::CheckCircle,
        },
        None => RiskStyle {
            tone: Tone::Gray,
            icon: RiskIcon::Shield,
        },
    }
}

/// Style for a raw label as returned by a service.
pub fn risk_style_for_label(label: &str) -> RiskStyle {
    risk_style(RiskLevel::parse(label))
}

/// Bar fill fraction for a band percentage, capped at a full bar.
pub fn band_fill(percent: f64) -> f64 {
    if percent.is_finite() {
        (percent.min(100.0) / 100.0).max(0.0)
    } else {
        0.0
    }
}

pub fn format_band_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bytes_is_literal() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn formats_binary_units() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1152), "1.13 KB");
        assert_eq!(format_file_size(3200), "3.13 KB");
        assert_eq!(format_file_size(1160), "1.13 KB");
        assert_eq!(format_file_size(1_184_768), "1.13 MB");
        assert_eq!(format_file_size(20480), "20 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(5_347_737), "5.1 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 1234 / 1024 = 1.2050...
        assert_eq!(format_file_size(1234), "1.21 KB");
    }

    #[test]
    fn clamps_to_gigabytes() {
        assert_eq!(format_file_size(2 * 1024 * 1_073_741_824), "2048 GB");
    }

    #[test]
    fn always_ends_with_a_known_unit() {
        let mut bytes = 1u64;
        while bytes < u64::MAX / 3 {
            let text = format_file_size(bytes);
            assert!(
                SIZE_UNITS.iter().any(|unit| text.ends_with(unit)),
                "{text} has no unit"
            );
            bytes = bytes * 3 + 1;
        }
    }

    #[test]
    fn missing_type_falls_back_to_recording_label() {
        let file = SelectedFile::new("patient_042.edf", Some(String::new()), 20480);
        assert_eq!(file_type_label(&file), "EEG Recording");
        let csv = SelectedFile::new("a.csv", Some("text/csv".into()), 1);
        assert_eq!(file_type_label(&csv), "text/csv");
    }

    #[test]
    fn risk_styles_cover_every_level() {
        assert_eq!(risk_style(Some(RiskLevel::High)).tone, Tone::Red);
        assert_eq!(risk_style(Some(RiskLevel::High)).icon, RiskIcon::AlertTriangle);
        assert_eq!(risk_style(Some(RiskLevel::Medium)).tone, Tone::Yellow);
        assert_eq!(risk_style(Some(RiskLevel::Low)).icon, RiskIcon::CheckCircle);
        assert_eq!(
            risk_style(None),
            RiskStyle {
                tone: Tone::Gray,
                icon: RiskIcon::Shield
            }
        );
    }

    #[test]
    fn unknown_labels_get_neutral_style() {
        assert_eq!(risk_style_for_label("SEVERE").tone, Tone::Gray);
        assert_eq!(risk_style_for_label("low").tone, Tone::Green);
    }

    #[test]
    fn band_fill_is_capped() {
        assert_eq!(band_fill(150.0), 1.0);
        assert_eq!(band_fill(25.0), 0.25);
        assert_eq!(band_fill(-3.0), 0.0);
        assert_eq!(format_band_percent(12.345), "12.3%");
    }
}
