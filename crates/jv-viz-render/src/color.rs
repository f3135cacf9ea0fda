use serde::{Deserialize, de};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse an artifact colour.
    pub fn from_artifact(s: &str) -> crate::Result<Self> {
        Self::parse_hex(s).ok_or_else(|| crate::RenderError::Color(s.to_string()))
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s).ok_or_else(|| de::Error::custom(format!("invalid colour '{s}'")))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::parse_hex("#D81B60").unwrap();
        assert_eq!((c.r, c.g, c.b), (0xD8, 0x1B, 0x60));
        assert!((c.a - 1.0).abs() < 1e-9);
        assert_eq!(Color::parse_hex("25D2FF"), Some(Color::rgb(0x25, 0xD2, 0xFF)));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_eq!(Color::parse_hex("#FFF"), None);
        assert_eq!(Color::parse_hex("#GG0000"), None);
        assert_eq!(Color::parse_hex("#ééé"), None);
        assert!(Color::from_artifact("red").is_err());
    }

    #[test]
    fn svg_fill() {
        assert_eq!(Color::rgb(51, 143, 32).to_svg_fill(), "#338f20");
        assert_eq!(Color::rgb(0, 0, 0).with_alpha(0.5).to_svg_fill(), "rgba(0,0,0,0.500)");
    }
}
