//! Destination guide models

use serde::Serialize;

/// Overview text for a destination
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct DestinationGuide {
    pub destination: String,
    pub title: String,
    pub summary: String,
    pub url: Option<String>,
}

/// A named section of practical advice
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct TipSection {
    pub heading: String,
    pub text: String,
}

/// Practical travel advice for a destination
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct TravelTips {
    pub destination: String,
    pub title: String,
    pub tips: Vec<TipSection>,
}
