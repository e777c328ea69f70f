//! Terminal styling for rank output and help text
//!
//! Each logical role maps to an optional `colored::Color`. Colour is applied
//! only when the caller passes `enabled = true`, so `--no-color` and
//! redirected output need no global state.
//!
//! ```
//! use reporank::core::styles::StyleRole;
//! assert_eq!(StyleRole::Header.paint("Rank", false), "Rank");
//! assert!(StyleRole::GradeTop.paint("A+", true).starts_with("\x1b["));
//! ```

use clap::builder::styling::{AnsiColor as ClapAnsi, Color as ClapColor, Style, Styles};
use colored::Color;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleRole {
    Header,
    Literal,
    Error,
    /// Repository identifiers
    Key,
    /// Plain numbers and messages (uncoloured)
    Value,
    Dim,
    GradeTop,
    GradeGood,
    GradeFair,
    GradePoor,
}

impl StyleRole {
    pub fn color(self) -> Option<Color> {
        match self {
            StyleRole::Header => Some(Color::Yellow),
            StyleRole::Literal => Some(Color::Cyan),
            StyleRole::Error => Some(Color::BrightRed),
            StyleRole::Key => Some(Color::BrightGreen),
            StyleRole::Value => None,
            StyleRole::Dim => Some(Color::BrightBlack),
            StyleRole::GradeTop => Some(Color::BrightGreen),
            StyleRole::GradeGood => Some(Color::Green),
            StyleRole::GradeFair => Some(Color::Yellow),
            StyleRole::GradePoor => Some(Color::Red),
        }
    }

    /// SGR parameter for the role's foreground colour
    pub fn ansi_code(self) -> Option<String> {
        self.color().map(sgr_code)
    }

    pub fn paint(self, text: &str, enabled: bool) -> String {
        match self.ansi_code() {
            Some(code) if enabled => format!("\x1b[{}m{}\x1b[0m", code, text),
            _ => text.to_string(),
        }
    }

    /// prettytable `style_spec` for the role (`Fg`, `Fr`, ...)
    pub fn to_prettytable_spec(self) -> Option<String> {
        let spec = basic_palette(self.color()?)?.2;
        Some(format!("F{}", spec))
    }
}

// (SGR code, clap colour, prettytable letter) for the 16 basic colours
fn basic_palette(color: Color) -> Option<(u8, ClapAnsi, char)> {
    Some(match color {
        Color::Black => (30, ClapAnsi::Black, 'k'),
        Color::Red => (31, ClapAnsi::Red, 'r'),
        Color::Green => (32, ClapAnsi::Green, 'g'),
        Color::Yellow => (33, ClapAnsi::Yellow, 'y'),
        Color::Blue => (34, ClapAnsi::Blue, 'b'),
        Color::Magenta => (35, ClapAnsi::Magenta, 'm'),
        Color::Cyan => (36, ClapAnsi::Cyan, 'c'),
        Color::White => (37, ClapAnsi::White, 'w'),
        Color::BrightBlack => (90, ClapAnsi::BrightBlack, 'K'),
        Color::BrightRed => (91, ClapAnsi::BrightRed, 'R'),
        Color::BrightGreen => (92, ClapAnsi::BrightGreen, 'G'),
        Color::BrightYellow => (93, ClapAnsi::BrightYellow, 'Y'),
        Color::BrightBlue => (94, ClapAnsi::BrightBlue, 'B'),
        Color::BrightMagenta => (95, ClapAnsi::BrightMagenta, 'M'),
        Color::BrightCyan => (96, ClapAnsi::BrightCyan, 'C'),
        Color::BrightWhite => (97, ClapAnsi::BrightWhite, 'W'),
        _ => return None,
    })
}

fn sgr_code(color: Color) -> String {
    match (color, basic_palette(color)) {
        (_, Some((code, _, _))) => code.to_string(),
        (Color::TrueColor { r, g, b }, None) => format!("38;2;{};{};{}", r, g, b),
        _ => "39".to_string(),
    }
}

/// clap help styles built from the same roles; clap itself decides
/// whether the terminal gets them
pub fn help_styles() -> Styles {
    let style = |role: StyleRole, bold: bool| {
        let fg = role
            .color()
            .and_then(basic_palette)
            .map(|(_, ansi, _)| ClapColor::Ansi(ansi));
        let style = Style::new().fg_color(fg);
        if bold {
            style.bold()
        } else {
            style
        }
    };

    Styles::styled()
        .header(style(StyleRole::Header, true))
        .usage(style(StyleRole::Header, true))
        .literal(style(StyleRole::Literal, false))
        .placeholder(style(StyleRole::Key, false))
        .error(style(StyleRole::Error, true))
        .invalid(style(StyleRole::GradePoor, false))
        .valid(style(StyleRole::GradeGood, false))
}
