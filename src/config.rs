//! Viewport configuration.
//!
//! Every field is optional in the TOML file; missing fields take the
//! defaults below. A running viewport is reconfigured in place through
//! [`ViewportConfig::diff`] and [`Viewport::apply_config`](crate::Viewport::apply_config).

use crate::error::ConfigError;
use crate::layout::CellMetrics;
use crate::theme::Theme;
use bitflags::bitflags;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Font settings for the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    /// Font family name.
    pub family: String,
    /// Font size in device-independent pixels.
    pub size: f32,
}

impl FontConfig {
    /// Cell metrics implied by this font.
    pub fn metrics(&self) -> CellMetrics {
        CellMetrics::for_font_size(self.size)
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            size: 14.0,
        }
    }
}

/// Configuration for a [`Viewport`](crate::Viewport).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Font family name.
    pub font_family: String,
    /// Font size in device-independent pixels.
    pub font_size: f32,
    /// Built-in theme name (`"dark"` or `"light"`).
    pub theme: String,
    /// Whether touch drags scroll with inertia.
    pub kinetic_scroll: bool,
    /// Rows of scrollback kept by the rendering surface.
    ///
    /// [`VtSurface`](crate::surface::VtSurface) scrolls back at most one
    /// screen of it.
    pub scrollback: usize,
    /// Treat mouse drags as touch input (terminal hosts have no touch events).
    pub mouse_as_touch: bool,
    /// Cap on chunks retained by a host chunk log; oldest chunks rotate out.
    pub max_chunks: Option<usize>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            font_size: 14.0,
            theme: "dark".to_string(),
            kinetic_scroll: true,
            scrollback: 5000,
            mouse_as_touch: true,
            max_chunks: None,
        }
    }
}

bitflags! {
    /// Which groups of settings differ between two configs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConfigChange: u8 {
        /// Font family or size changed.
        const FONT = 0b0001;
        /// Theme changed.
        const THEME = 0b0010;
        /// Kinetic scrolling was toggled.
        const KINETIC = 0b0100;
        /// Scrollback length changed.
        const SCROLLBACK = 0b1000;
    }
}

impl ConfigChange {
    /// Whether this change invalidates the current grid fit.
    pub const fn needs_refit(self) -> bool {
        self.intersects(Self::FONT.union(Self::THEME))
    }
}

impl ViewportConfig {
    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Parse a config from TOML text.
    ///
    /// The theme name is validated here so a bad name fails at load time
    /// rather than when the surface is built.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.resolve_theme()?;
        Ok(config)
    }

    /// Font settings.
    pub fn font(&self) -> FontConfig {
        FontConfig {
            family: self.font_family.clone(),
            size: self.font_size,
        }
    }

    /// Resolve the configured theme name.
    pub fn resolve_theme(&self) -> Result<Theme, ConfigError> {
        Theme::by_name(&self.theme)
    }

    /// Compare against a newer config.
    #[allow(clippy::float_cmp)]
    pub fn diff(&self, next: &Self) -> ConfigChange {
        let mut change = ConfigChange::empty();
        if self.font_family != next.font_family || self.font_size != next.font_size {
            change |= ConfigChange::FONT;
        }
        if !self.theme.eq_ignore_ascii_case(&next.theme) {
            change |= ConfigChange::THEME;
        }
        if self.kinetic_scroll != next.kinetic_scroll {
            change |= ConfigChange::KINETIC;
        }
        if self.scrollback != next.scrollback {
            change |= ConfigChange::SCROLLBACK;
        }
        change
    }
}
