use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store palette, passed alongside blocks to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Default for StoreColors {
    fn default() -> Self {
        Self {
            primary: "#111827".to_string(),
            secondary: "#6b7280".to_string(),
            accent: "#f59e0b".to_string(),
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
        }
    }
}

impl StoreColors {
    /// `(name, value)` pairs in a fixed order
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
            ("background", &self.background),
            ("text", &self.text),
        ]
    }
}

/// Store-wide theme / animation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeTag {
    Minimal,
    #[default]
    Modern,
    Bold,
    Elegant,
    Playful,
}

impl ThemeTag {
    pub const ALL: [ThemeTag; 5] = [
        ThemeTag::Minimal,
        ThemeTag::Modern,
        ThemeTag::Bold,
        ThemeTag::Elegant,
        ThemeTag::Playful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeTag::Minimal => "minimal",
            ThemeTag::Modern => "modern",
            ThemeTag::Bold => "bold",
            ThemeTag::Elegant => "elegant",
            ThemeTag::Playful => "playful",
        }
    }
}

impl fmt::Display for ThemeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeTag {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LayoutError::UnknownTheme(s.to_string()))
    }
}
