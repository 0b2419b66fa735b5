use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Two-valued display preference. Defaults to dark.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Parse user or stored input, trimming whitespace. Unknown values
    /// yield `None` so callers can decide how to normalize.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}
