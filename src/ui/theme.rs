use ratatui::style::Color;

/// Line colors handed out to cores in ascending core-id order.
const CORE_PALETTE: [Color; 8] = [
    Color::Rgb(239, 68, 68),
    Color::Rgb(251, 146, 60),
    Color::Rgb(250, 204, 21),
    Color::Rgb(16, 185, 129),
    Color::Rgb(45, 212, 191),
    Color::Rgb(96, 165, 250),
    Color::Rgb(167, 139, 250),
    Color::Rgb(244, 114, 182),
];

#[derive(Debug, Clone)]
pub struct Theme {
    pub core_palette: [Color; 8],
    pub memory_line: Color,
    pub overlay_border: Color,
    pub text_secondary: Color,
    pub axis: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            core_palette: CORE_PALETTE,
            memory_line: Color::Rgb(96, 165, 250),
            overlay_border: Color::DarkGray,
            text_secondary: Color::Gray,
            axis: Color::DarkGray,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
        }
    }

    /// Palette wraps around on machines with more cores than colors.
    pub fn core_color(&self, index: usize) -> Color {
        self.core_palette[index % self.core_palette.len()]
    }
}
