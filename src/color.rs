use eframe::egui::{self, Color32};
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Page theme
// ---------------------------------------------------------------------------

pub const BACKGROUND: Color32 = Color32::from_rgb(0x1A, 0x1A, 0x1C);
pub const CARD: Color32 = Color32::from_rgb(0x22, 0x22, 0x25);
pub const CLAY: Color32 = Color32::from_rgb(0xE0, 0x7A, 0x5F);
pub const ASH: Color32 = Color32::from_rgb(0x8D, 0x99, 0xAE);
pub const CHARCOAL: Color32 = Color32::from_rgb(0x2D, 0x2D, 0x30);
pub const SAGE: Color32 = Color32::from_rgb(0x81, 0xB2, 0x9A);
pub const BONE: Color32 = Color32::from_rgb(0xF4, 0xF1, 0xDE);
pub const SLATE: Color32 = Color32::from_rgb(0x4A, 0x4A, 0x4F);

/// Dark visuals with the page palette applied.
pub fn visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = CARD;
    visuals.extreme_bg_color = BACKGROUND;
    visuals.override_text_color = Some(BONE);
    visuals.hyperlink_color = CLAY;
    visuals.selection.bg_fill = CLAY;
    visuals
}

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.45, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

/// Colours for `n` categories: the four theme colours first, generated hues
/// after that.
pub fn category_colors(n: usize) -> Vec<Color32> {
    let mut colors: Vec<Color32> = [CLAY, ASH, CHARCOAL, SAGE].into_iter().take(n).collect();
    if n > colors.len() {
        colors.extend(generate_palette(n - colors.len()));
    }
    colors
}

/// Fixed colours for the usual survey answers, falling back to `fallback`.
pub fn answer_color(label: &str, fallback: Color32) -> Color32 {
    match label {
        "Yes" => CLAY,
        "No" => ASH,
        "Maybe" => CHARCOAL,
        "Not sure" => SLATE,
        _ => fallback,
    }
}

// ---------------------------------------------------------------------------
// Heatmap scale
// ---------------------------------------------------------------------------

/// Map a percentage in `[0, 100]` onto the charcoal → clay scale.
pub fn heat_color(percent: f64) -> Color32 {
    let t = (percent / 100.0).clamp(0.0, 1.0) as f32;
    let low: LinSrgb = from_color32(CHARCOAL).into_color();
    let high: LinSrgb = from_color32(CLAY).into_color();
    let mixed: Srgb = low.mix(high, t).into_color();
    to_color32(mixed)
}

/// Readable label colour on top of a heat cell.
pub fn heat_text_color(percent: f64) -> Color32 {
    if percent > 50.0 {
        Color32::BLACK
    } else {
        BONE
    }
}

fn from_color32(c: Color32) -> Srgb {
    Srgb::new(
        c.r() as f32 / 255.0,
        c.g() as f32 / 255.0,
        c.b() as f32 / 255.0,
    )
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_colours_come_first() {
        assert_eq!(category_colors(2), vec![CLAY, ASH]);
        assert_eq!(category_colors(6).len(), 6);
        assert!(category_colors(0).is_empty());
    }

    #[test]
    fn heat_scale_endpoints() {
        assert_eq!(heat_color(0.0), CHARCOAL);
        let top = heat_color(100.0);
        assert!((top.r() as i32 - CLAY.r() as i32).abs() <= 1);
        assert_eq!(heat_color(250.0), heat_color(100.0));
    }
}
