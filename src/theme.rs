//! Theme: Colors used to paint terminal output.
//!
//! The remote process speaks in vt100 colors (default, indexed, or true
//! color). A [`Theme`] resolves those into concrete [`Rgb`] values so a
//! painter never has to know which palette the user picked.

use crate::error::ConfigError;

/// A 24-bit true color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

/// A named color theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name as written in config files.
    pub name: &'static str,
    /// Default foreground.
    pub foreground: Rgb,
    /// Default background.
    pub background: Rgb,
    /// Cursor color.
    pub cursor: Rgb,
    /// The 16 ANSI colors (normal then bright).
    pub ansi: [Rgb; 16],
}

impl Theme {
    /// Dark theme (default).
    pub const DARK: Self = Self {
        name: "dark",
        foreground: Rgb::from_u32(0xD4D4D4),
        background: Rgb::from_u32(0x1E1E1E),
        cursor: Rgb::from_u32(0xAEAFAD),
        ansi: [
            Rgb::from_u32(0x000000),
            Rgb::from_u32(0xCD3131),
            Rgb::from_u32(0x0DBC79),
            Rgb::from_u32(0xE5E510),
            Rgb::from_u32(0x2472C8),
            Rgb::from_u32(0xBC3FBC),
            Rgb::from_u32(0x11A8CD),
            Rgb::from_u32(0xE5E5E5),
            Rgb::from_u32(0x666666),
            Rgb::from_u32(0xF14C4C),
            Rgb::from_u32(0x23D18B),
            Rgb::from_u32(0xF5F543),
            Rgb::from_u32(0x3B8EEA),
            Rgb::from_u32(0xD670D6),
            Rgb::from_u32(0x29B8DB),
            Rgb::from_u32(0xFFFFFF),
        ],
    };

    /// Light theme.
    pub const LIGHT: Self = Self {
        name: "light",
        foreground: Rgb::from_u32(0x333333),
        background: Rgb::from_u32(0xFFFFFF),
        cursor: Rgb::from_u32(0x000000),
        ansi: [
            Rgb::from_u32(0x000000),
            Rgb::from_u32(0xCD3131),
            Rgb::from_u32(0x00BC00),
            Rgb::from_u32(0x949800),
            Rgb::from_u32(0x0451A5),
            Rgb::from_u32(0xBC05BC),
            Rgb::from_u32(0x0598BC),
            Rgb::from_u32(0x555555),
            Rgb::from_u32(0x666666),
            Rgb::from_u32(0xCD3131),
            Rgb::from_u32(0x14CE14),
            Rgb::from_u32(0xB5BA00),
            Rgb::from_u32(0x0451A5),
            Rgb::from_u32(0xBC05BC),
            Rgb::from_u32(0x0598BC),
            Rgb::from_u32(0xA5A5A5),
        ],
    };

    /// Look up a built-in theme by name.
    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::DARK),
            "light" => Ok(Self::LIGHT),
            _ => Err(ConfigError::UnknownTheme(name.to_string())),
        }
    }

    /// Resolve a vt100 foreground color.
    pub const fn fg(&self, color: vt100::Color) -> Rgb {
        self.resolve(color, self.foreground)
    }

    /// Resolve a vt100 background color.
    pub const fn bg(&self, color: vt100::Color) -> Rgb {
        self.resolve(color, self.background)
    }

    const fn resolve(&self, color: vt100::Color, default: Rgb) -> Rgb {
        match color {
            vt100::Color::Default => default,
            vt100::Color::Rgb(r, g, b) => Rgb::new(r, g, b),
            vt100::Color::Idx(i) => self.indexed(i),
        }
    }

    /// Convert a 256-color palette index to RGB.
    ///
    /// The first 16 entries come from the theme; the 6x6x6 cube and the
    /// grayscale ramp are fixed.
    pub const fn indexed(&self, idx: u8) -> Rgb {
        match idx {
            0..=15 => self.ansi[idx as usize],
            16..=231 => {
                let i = idx - 16;
                let r = (i / 36) % 6;
                let g = (i / 6) % 6;
                let b = i % 6;
                Rgb::new(cube(r), cube(g), cube(b))
            }
            232..=255 => {
                let v = (idx - 232) * 10 + 8;
                Rgb::new(v, v, v)
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DARK
    }
}

const fn cube(level: u8) -> u8 {
    if level == 0 {
        0
    } else {
        level * 40 + 55
    }
}
