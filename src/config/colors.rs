use ratatui::style::{Color, Style};

/// Parse a color string and return the corresponding ratatui Color
///
/// Supports the standard terminal colors (black, red, green, yellow, blue,
/// magenta, cyan, white), grey/gray, and "dark"/"light" variants.
/// Unknown names fall back to white.
pub fn parse_color(color_str: &str) -> Color {
    let color_lower = color_str.trim().to_lowercase();
    match color_lower.as_str() {
        "black" => Color::Black,
        "red" | "dark red" => Color::Red,
        "green" | "dark green" => Color::Green,
        "yellow" | "dark yellow" => Color::Yellow,
        "blue" | "dark blue" => Color::Blue,
        "magenta" | "dark magenta" => Color::Magenta,
        "cyan" | "dark cyan" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Gray,
        "dark grey" | "dark gray" => Color::DarkGray,
        "light red" => Color::LightRed,
        "light green" => Color::LightGreen,
        "light yellow" => Color::LightYellow,
        "light blue" => Color::LightBlue,
        "light magenta" => Color::LightMagenta,
        "light cyan" => Color::LightCyan,
        _ => Color::White, // fallback
    }
}

/// Parse a style string that may include foreground and background colors
/// Supports formats like:
/// - "green" - just foreground
/// - "black on white" - foreground on background
pub fn parse_style(style_str: &str) -> Style {
    if let Some(idx) = style_str.find(" on ") {
        let (fg, bg) = style_str.split_at(idx);
        let bg = &bg[4..]; // Skip " on "
        Style::default().fg(parse_color(fg)).bg(parse_color(bg))
    } else {
        Style::default().fg(parse_color(style_str))
    }
}

/// Helper struct to hold parsed color scheme
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub accent: Color,
    pub muted: Color,
    pub selected: Style,
    pub status_bar: Style,
}

impl ColorScheme {
    /// Parse a Colors configuration into a ColorScheme with actual Color types
    pub fn from_config(colors: &crate::config::Colors) -> Self {
        Self {
            success: parse_color(&colors.success),
            error: parse_color(&colors.error),
            warning: parse_color(&colors.warning),
            accent: parse_color(&colors.accent),
            muted: parse_color(&colors.muted),
            selected: parse_style(&colors.selected),
            status_bar: parse_style(&colors.status_bar),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::from_config(&crate::config::Colors::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_colors() {
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color("green"), Color::Green);
        assert_eq!(parse_color("blue"), Color::Blue);
    }

    #[test]
    fn test_parse_grey_variants() {
        assert_eq!(parse_color("grey"), Color::Gray);
        assert_eq!(parse_color("dark gray"), Color::DarkGray);
        assert_eq!(parse_color("light cyan"), Color::LightCyan);
    }

    #[test]
    fn test_parse_style_compound() {
        let style = parse_style("black on white");
        assert_eq!(style.fg, Some(Color::Black));
        assert_eq!(style.bg, Some(Color::White));

        let style = parse_style("green");
        assert_eq!(style.bg, None);
    }

    #[test]
    fn test_case_insensitive_and_fallback() {
        assert_eq!(parse_color("RED"), Color::Red);
        assert_eq!(parse_color("chartreuse"), Color::White);
    }

    #[test]
    fn test_default_scheme() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.error, Color::Red);
        assert_eq!(scheme.status_bar.bg, Some(Color::DarkGray));
    }
}
