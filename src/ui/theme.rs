use crate::data::settings::Settings;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Ansi256,
    NoColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub text: (u8, u8, u8),
    pub subtext: (u8, u8, u8),
    pub base: (u8, u8, u8),
    pub surface: (u8, u8, u8),
    pub accent: (u8, u8, u8),
    pub error: (u8, u8, u8),
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            text: (0xff, 0xff, 0xff),
            subtext: (0x88, 0x88, 0x88),
            base: (0x00, 0x00, 0x00),
            surface: (0x1c, 0x1c, 0x1e),
            accent: (0x00, 0x7a, 0xff),
            error: (0xff, 0x45, 0x3a),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub palette: ThemePalette,
    pub capability: ColorCapability,
}

impl Theme {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut palette = ThemePalette::default();
        match parse_hex(&settings.accent) {
            Some(rgb) => palette.accent = rgb,
            None => log::warn!("ignoring invalid accent colour {:?}", settings.accent),
        }
        Self {
            palette,
            capability: detect_color_capability(),
        }
    }

    pub fn color_text(&self) -> Color {
        map_color(self.capability, self.palette.text)
    }
    pub fn color_subtext(&self) -> Color {
        map_color(self.capability, self.palette.subtext)
    }
    pub fn color_base(&self) -> Color {
        map_color(self.capability, self.palette.base)
    }
    pub fn color_surface(&self) -> Color {
        map_color(self.capability, self.palette.surface)
    }
    pub fn color_accent(&self) -> Color {
        map_color(self.capability, self.palette.accent)
    }
    pub fn color_error(&self) -> Color {
        map_color(self.capability, self.palette.error)
    }
}

pub fn detect_color_capability() -> ColorCapability {
    let colorterm = std::env::var("COLORTERM").unwrap_or_default().to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorCapability::TrueColor;
    }

    let term = std::env::var("TERM").unwrap_or_default().to_lowercase();
    if term.contains("256color") {
        return ColorCapability::Ansi256;
    }

    ColorCapability::NoColor
}

pub fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let s = s.trim().trim_start_matches('#');
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some((r, g, b))
}

fn map_color(cap: ColorCapability, t: (u8, u8, u8)) -> Color {
    match cap {
        ColorCapability::TrueColor => Color::Rgb(t.0, t.1, t.2),
        ColorCapability::Ansi256 => Color::Indexed(rgb_to_ansi256(t.0, t.1, t.2)),
        ColorCapability::NoColor => Color::Reset,
    }
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    // 6x6x6 color cube, 16..231
    let r6 = (r as u16 * 5 / 255) as u8;
    let g6 = (g as u16 * 5 / 255) as u8;
    let b6 = (b as u16 * 5 / 255) as u8;
    16 + 36 * r6 + 6 * g6 + b6
}
