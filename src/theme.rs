use colored::{Color, ColoredString, Colorize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorScheme {
    pub foreground: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

impl ColorScheme {
    const fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            bold: false,
            underline: false,
        }
    }

    const fn strong(foreground: Option<Color>) -> Self {
        Self {
            foreground,
            bold: true,
            underline: false,
        }
    }

    pub fn apply(&self, text: &str) -> ColoredString {
        let mut styled: ColoredString = text.into();

        if let Some(color) = self.foreground {
            styled = styled.color(color);
        }
        if self.bold {
            styled = styled.bold();
        }
        if self.underline {
            styled = styled.underline();
        }

        styled
    }
}

/// Styles used by the terminal panel.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: ColorScheme,
    pub hash: ColorScheme,
    pub author: ColorScheme,
    pub checked: ColorScheme,
    pub command: ColorScheme,
    pub message: ColorScheme,
    pub warning: ColorScheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: ColorScheme::strong(Some(Color::Blue)),
            hash: ColorScheme::fg(Color::Yellow),
            author: ColorScheme::fg(Color::Cyan),
            checked: ColorScheme::strong(Some(Color::Green)),
            command: ColorScheme::fg(Color::Green),
            message: ColorScheme::fg(Color::Magenta),
            warning: ColorScheme::strong(Some(Color::Red)),
        }
    }
}

impl Theme {
    /// Picks the colored or plain theme and tells `colored` whether to emit escapes at all.
    pub fn for_output(color_output: bool) -> Self {
        colored::control::set_override(color_output);
        if color_output {
            Self::default()
        } else {
            Self::monochrome()
        }
    }

    pub fn monochrome() -> Self {
        let plain = ColorScheme::default();
        let strong = ColorScheme::strong(None);
        Self {
            header: ColorScheme {
                underline: true,
                ..strong
            },
            hash: plain,
            author: plain,
            checked: strong,
            command: plain,
            message: plain,
            warning: strong,
        }
    }
}
