use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_dim: Color,
    pub accent: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub selection_bg: Color,
    pub column_header_bg: Color,
    pub heat_colors: [Color; 4],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            status_ok: Color::Green,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_dim: Color::DarkGray,
            accent: Color::Green,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            selection_bg: Color::Rgb(55, 65, 81),
            column_header_bg: Color::Green,
            heat_colors: [
                Color::Gray,
                Color::Rgb(16, 185, 129),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    /// Colour for a percentage cell: idle, normal, busy, hot.
    pub fn heat(&self, percent: f64) -> Color {
        let index = match percent {
            p if p >= 75.0 => 3,
            p if p >= 25.0 => 2,
            p if p >= 0.05 => 1,
            _ => 0,
        };
        self.heat_colors[index]
    }
}
