use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub type_name: Color,   // Cyan for entity names
    pub kind: Color,        // Yellow for event kinds
    pub location: Color,    // Muted yellow for points of instantiation
    pub disabled: Color,    // Dim red for filtered-out events
    pub result: Color,      // Pink for the evaluation result
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    type_name: Color::Rgb(148, 226, 213),
    kind: Color::Rgb(249, 226, 175),
    location: Color::Rgb(180, 165, 120),
    disabled: Color::Rgb(150, 90, 110),
    result: Color::Rgb(245, 194, 231),
};
