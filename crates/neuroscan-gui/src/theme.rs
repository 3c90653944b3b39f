use eframe::egui::{self, Color32, RichText};
use neuroscan_lib::{RiskStyle, Tone};

pub const BRAND: u32 = 0x2563EB;
pub const BRAND_SOFT: u32 = 0xEFF6FF;
pub const MUTED_TEXT: u32 = 0x6B7280;
pub const DISCLAIMER_FILL: u32 = 0xFFFBEB;
pub const DISCLAIMER_TEXT: u32 = 0x92400E;

pub fn color_from_u32(color: u32) -> Color32 {
    let r = ((color >> 16) & 0xFF) as u8;
    let g = ((color >> 8) & 0xFF) as u8;
    let b = (color & 0xFF) as u8;
    Color32::from_rgb(r, g, b)
}

pub fn tone_fg(tone: Tone) -> Color32 {
    color_from_u32(tone.foreground())
}

pub fn tone_bg(tone: Tone) -> Color32 {
    color_from_u32(tone.background())
}

/// Icon glyph in the risk color, sized for a section heading.
pub fn risk_icon(style: RiskStyle) -> RichText {
    RichText::new(style.icon.glyph())
        .color(tone_fg(style.tone))
        .size(18.0)
}

/// Filled, outlined frame used for the results and disclaimer blocks.
pub fn card(fill: Color32, stroke: Color32) -> egui::Frame {
    egui::Frame::none()
        .fill(fill)
        .stroke(egui::Stroke::new(1.5, stroke))
        .rounding(12.0)
        .inner_margin(egui::Margin::same(14.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_rgb() {
        assert_eq!(color_from_u32(0x2563EB), Color32::from_rgb(0x25, 0x63, 0xEB));
    }

    #[test]
    fn tones_map_to_distinct_colors() {
        let colors: Vec<_> = [Tone::Red, Tone::Yellow, Tone::Green, Tone::Gray]
            .into_iter()
            .map(tone_fg)
            .collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
