//! Background color attribute for step bars.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{GanttError, Result};

/// A CSS-style hex color (`#rgb` or `#rrggbb`), stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor(String);

impl BackgroundColor {
    /// Builds a color from the low 24 bits of `rgb`.
    pub fn from_rgb(rgb: u32) -> Self {
        Self(format!("#{:06x}", rgb & 0x00ff_ffff))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BackgroundColor {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').ok_or_else(|| {
            GanttError::invalid_input("background_color").with_reason(format!("'{trimmed}' must start with '#'"))
        })?;

        if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GanttError::invalid_input("background_color")
                .with_reason(format!("'{trimmed}' is not a #rgb or #rrggbb color")));
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = GanttError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BackgroundColor> for String {
    fn from(value: BackgroundColor) -> Self {
        value.0
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
