//! Airport lookup result model

use serde::Serialize;

/// An airport suggestion for flight search inputs
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Airport {
    pub code: String,
    pub name: String,
    /// Always `AIRPORT` for directory entries; `CITY` may come from remote lookups
    #[serde(rename = "type")]
    pub kind: String,
    pub city: String,
    pub country: String,
    /// `{name} ({code})`
    pub display_name: String,
}

impl Airport {
    #[must_use]
    pub fn new(code: &str, name: &str, kind: &str, city: &str, country: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            display_name: format!("{name} ({code})"),
        }
    }
}
