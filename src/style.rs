/// Named colour styles, with their terminal and document renderings.
///
/// Several names map onto one style: `error` is `red`, `run` is `light_purple`,
/// `warning` is `yellow`, and `notice`/`muted` are `dark_gray`. Anything
/// unrecognised falls back to `dark_gray`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    Black,
    Blue,
    LightBlue,
    Green,
    LightGreen,
    Cyan,
    LightCyan,
    Red,
    LightRed,
    Purple,
    LightPurple,
    Brown,
    Yellow,
    LightGray,
    White,
    #[default]
    DarkGray,
}

impl Style {
    /// Comments above a command.
    pub const MUTED: Style = Style::DarkGray;
    /// The command lines themselves.
    pub const RUN: Style = Style::LightPurple;
    pub const ERROR: Style = Style::Red;
    pub const WARNING: Style = Style::Yellow;
    pub const NOTICE: Style = Style::DarkGray;

    /// Look a style up by name, case-insensitively, accepting `-` for `_`.
    pub fn named(name: &str) -> Style {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "black" => Style::Black,
            "blue" => Style::Blue,
            "light_blue" => Style::LightBlue,
            "green" => Style::Green,
            "light_green" => Style::LightGreen,
            "cyan" => Style::Cyan,
            "light_cyan" => Style::LightCyan,
            "red" | "error" => Style::Red,
            "light_red" => Style::LightRed,
            "purple" => Style::Purple,
            "run" | "light_purple" => Style::LightPurple,
            "brown" => Style::Brown,
            "yellow" | "warning" => Style::Yellow,
            "light_gray" => Style::LightGray,
            "white" => Style::White,
            _ => Style::DarkGray,
        }
    }

    /// SGR parameters for `ESC [ <code> m`.
    pub fn terminal_code(self) -> &'static str {
        match self {
            Style::Black => "0;30",
            Style::Blue => "0;34",
            Style::LightBlue => "1;34",
            Style::Green => "0;32",
            Style::LightGreen => "1;32",
            Style::Cyan => "0;36",
            Style::LightCyan => "1;36",
            Style::Red => "0;31",
            Style::LightRed => "1;31",
            Style::Purple => "0;35",
            Style::LightPurple => "1;35",
            Style::Brown => "0;33",
            Style::Yellow => "1;33",
            Style::LightGray => "0;37",
            Style::White => "1;37",
            Style::DarkGray => "1;30",
        }
    }

    /// CSS colour used in document output.
    pub fn display_colour(self) -> &'static str {
        match self {
            Style::Black => "black",
            Style::Blue => "blue",
            Style::LightBlue => "lightblue",
            Style::Green => "green",
            Style::LightGreen => "lightgreen",
            Style::Cyan => "cyan",
            Style::LightCyan => "lightcyan",
            Style::Red => "red",
            Style::LightRed => "pink",
            Style::Purple => "purple",
            Style::LightPurple => "violet",
            Style::Brown => "brown",
            Style::Yellow => "yellow",
            Style::LightGray => "#999",
            Style::White => "white",
            Style::DarkGray => "#555",
        }
    }

    /// Error styles are printed even when output is not verbose.
    pub fn is_error(self) -> bool {
        self == Style::Red
    }
}

impl From<&str> for Style {
    fn from(name: &str) -> Self {
        Style::named(name)
    }
}
