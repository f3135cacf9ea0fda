use crate::primitives::{FontWeight, TextStyle};

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Advance width of `ch` in em units, approximating a DejaVu/Helvetica-like
/// sans-serif face.
fn advance_em(ch: char) -> f64 {
    match ch {
        ' ' => 0.32,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.38,
        'm' | 'w' | 'M' | 'W' => 0.88,
        '%' | '&' | '@' => 0.85,
        '0'..='9' => 0.64,
        c if c.is_ascii_uppercase() => 0.70,
        c if c.is_ascii_lowercase() => 0.60,
        '*' => 0.50,
        _ => 0.62,
    }
}

/// Estimate text extent in points.
///
/// The SVG names a font family rather than embedding one, so layout uses
/// per-character advance estimates; rasterisation picks the real face.
pub fn measure_text(text: &str, size_pt: f64, weight: FontWeight) -> TextMetrics {
    let em: f64 = text.chars().map(advance_em).sum();
    let bold = if weight == FontWeight::Bold { 1.06 } else { 1.0 };
    TextMetrics { width: em * size_pt * bold, height: 1.17 * size_pt, ascent: 0.93 * size_pt }
}

/// Measure text with a [`TextStyle`].
pub fn measure_styled(text: &str, style: &TextStyle) -> TextMetrics {
    measure_text(text, style.size, style.weight)
}
