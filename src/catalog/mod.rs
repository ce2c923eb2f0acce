//! Static reference data for the eight recognized art styles.

mod styles;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::IkaraError;
use styles::STYLES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StyleName {
    Warli,
    Pichwai,
    Kalighat,
    Mandana,
    Kangra,
    Gond,
    #[serde(rename = "Kerala Mural")]
    KeralaMural,
    Madhubani,
}

impl StyleName {
    /// Catalog order.
    pub const ALL: [StyleName; 8] = [
        StyleName::Warli,
        StyleName::Pichwai,
        StyleName::Kalighat,
        StyleName::Mandana,
        StyleName::Kangra,
        StyleName::Gond,
        StyleName::KeralaMural,
        StyleName::Madhubani,
    ];

    /// Order in which raw model text is scanned for a style name.
    pub const SCAN_ORDER: [StyleName; 8] = [
        StyleName::Madhubani,
        StyleName::KeralaMural,
        StyleName::Gond,
        StyleName::Kangra,
        StyleName::Mandana,
        StyleName::Kalighat,
        StyleName::Pichwai,
        StyleName::Warli,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleName::Warli => "Warli",
            StyleName::Pichwai => "Pichwai",
            StyleName::Kalighat => "Kalighat",
            StyleName::Mandana => "Mandana",
            StyleName::Kangra => "Kangra",
            StyleName::Gond => "Gond",
            StyleName::KeralaMural => "Kerala Mural",
            StyleName::Madhubani => "Madhubani",
        }
    }

    pub fn record(&self) -> &'static StyleRecord {
        // STYLES is declared in the same order as ALL.
        &STYLES[*self as usize]
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleName {
    type Err = IkaraError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        StyleName::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| IkaraError::UnknownStyle(value.to_string()))
    }
}

/// A prediction label: one of the known styles, or the `Unknown` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    Style(StyleName),
    Unknown,
}

impl Label {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Style(style) => style.as_str(),
            Label::Unknown => Self::UNKNOWN,
        }
    }

    pub fn style(&self) -> Option<StyleName> {
        match self {
            Label::Style(style) => Some(*style),
            Label::Unknown => None,
        }
    }
}

impl From<StyleName> for Label {
    fn from(style: StyleName) -> Self {
        Label::Style(style)
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::from(value.as_str())
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        value
            .parse::<StyleName>()
            .map(Label::Style)
            .unwrap_or(Label::Unknown)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one art style.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    pub name: StyleName,
    pub origin: &'static str,
    pub description: &'static str,
    pub characteristics: &'static [&'static str],
    pub colors: &'static [&'static str],
    pub history: &'static str,
    pub materials: &'static [&'static str],
    pub significance: &'static str,
}

pub fn all() -> &'static [StyleRecord] {
    &STYLES
}

/// Case-insensitive lookup by display name.
pub fn lookup(name: &str) -> Result<&'static StyleRecord, IkaraError> {
    name.parse::<StyleName>().map(|style| style.record())
}
