//! Wikivoyage guides, travel tips and title search
//!
//! Uses the MediaWiki action API. No credentials are needed.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use super::http::{build_client, send_json};
use super::{DestinationSource, Provider, ProviderError, ProviderId, ProviderResult};
use crate::TravelHubError;
use crate::config::WikivoyageConfig;
use crate::models::{Destination, DestinationGuide, DestinationQuery, TipSection, TravelTips};
use crate::normalize::{LONG_DESCRIPTION_CHARS, truncate_chars};

const PROVIDER: ProviderId = ProviderId::Wikivoyage;

/// Article sections worth surfacing as tips, in display order
pub const TIP_SECTIONS: &[&str] = &[
    "Understand",
    "Get in",
    "Get around",
    "Stay safe",
    "Stay healthy",
    "Respect",
    "Connect",
];

static SECTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^==\s*([^=].*?)\s*==$").expect("heading pattern is valid"));

/// Wikivoyage API client
pub struct WikivoyageClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawQueryResponse {
    query: Option<RawQuery>,
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    #[serde(default)]
    pages: Vec<RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    title: Option<String>,
    extract: Option<String>,
    fullurl: Option<String>,
    #[serde(default)]
    missing: bool,
}

impl WikivoyageClient {
    /// Create a new client
    pub fn new(config: &WikivoyageConfig) -> Result<Self, TravelHubError> {
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            base_url: config.base_url.clone(),
        })
    }

    async fn page(&self, params: &[(&str, &str)]) -> ProviderResult<Option<RawPage>> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("redirects", "1"),
            ])
            .query(params);
        let response: RawQueryResponse = send_json(PROVIDER, request).await?;

        Ok(response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .filter(|page| !page.missing))
    }

    /// Lead section of the destination's article, `None` when there is no article
    #[instrument(skip(self))]
    pub async fn guide(&self, destination: &str) -> ProviderResult<Option<DestinationGuide>> {
        let page = self
            .page(&[
                ("prop", "extracts|info"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("titles", destination.trim()),
            ])
            .await?;

        Ok(page.and_then(|page| {
            let summary = page.extract.filter(|e| !e.trim().is_empty())?;
            Some(DestinationGuide {
                destination: destination.trim().to_string(),
                title: page.title.unwrap_or_else(|| destination.trim().to_string()),
                summary: summary.trim().to_string(),
                url: page.fullurl,
            })
        }))
    }

    /// Practical sections of the destination's article, `None` when none exist
    #[instrument(skip(self))]
    pub async fn tips(&self, destination: &str) -> ProviderResult<Option<TravelTips>> {
        let page = self
            .page(&[
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("exsectionformat", "wiki"),
                ("titles", destination.trim()),
            ])
            .await?;

        Ok(page.and_then(|page| {
            let tips = tip_sections(page.extract.as_deref().unwrap_or_default());
            if tips.is_empty() {
                return None;
            }
            Some(TravelTips {
                destination: destination.trim().to_string(),
                title: page.title.unwrap_or_else(|| destination.trim().to_string()),
                tips,
            })
        }))
    }
}

/// Split a plain-text extract on level-two headings and keep the tip sections
fn tip_sections(extract: &str) -> Vec<TipSection> {
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    for line in extract.lines() {
        let line = line.trim();
        if let Some(heading) = SECTION_HEADING.captures(line).and_then(|c| c.get(1)) {
            sections.push((heading.as_str().to_string(), Vec::new()));
        } else if line.starts_with("==") {
            continue;
        } else if let Some((_, body)) = sections.last_mut()
            && !line.is_empty()
        {
            body.push(line);
        }
    }

    TIP_SECTIONS
        .iter()
        .filter_map(|wanted| {
            let (heading, body) = sections
                .iter()
                .find(|(heading, _)| heading.eq_ignore_ascii_case(wanted))?;
            let text = body.join(" ");
            (!text.is_empty()).then(|| TipSection {
                heading: heading.clone(),
                text: truncate_chars(&text, LONG_DESCRIPTION_CHARS),
            })
        })
        .collect()
}

impl Provider for WikivoyageClient {
    fn id(&self) -> ProviderId {
        PROVIDER
    }
}

#[async_trait]
impl DestinationSource for WikivoyageClient {
    #[instrument(skip(self, query), fields(query = %query.query))]
    async fn search_destinations(
        &self,
        query: &DestinationQuery,
    ) -> ProviderResult<Vec<Destination>> {
        let limit = query.limit.to_string();
        let request = self.client.get(&self.base_url).query(&[
            ("action", "opensearch"),
            ("search", query.query.trim()),
            ("limit", limit.as_str()),
            ("namespace", "0"),
            ("format", "json"),
        ]);
        let response: Value = send_json(PROVIDER, request).await?;
        let destinations = parse_opensearch(&response)?;
        debug!("Wikivoyage returned {} titles", destinations.len());
        Ok(destinations)
    }
}

/// `[query, [titles], [descriptions], [urls]]`
fn parse_opensearch(response: &Value) -> ProviderResult<Vec<Destination>> {
    let column = |index: usize| -> Vec<&str> {
        response
            .get(index)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(|v| v.as_str().unwrap_or_default()).collect())
            .unwrap_or_default()
    };
    if !response.is_array() {
        return Err(ProviderError::parse(PROVIDER, "opensearch answer is not an array"));
    }

    let titles = column(1);
    let descriptions = column(2);
    let urls = column(3);
    Ok(titles
        .iter()
        .enumerate()
        .filter(|(_, title)| !title.is_empty())
        .map(|(i, title)| Destination {
            name: (*title).to_string(),
            country: String::new(),
            lat: None,
            lon: None,
            kind: "destination".to_string(),
            description: descriptions.get(i).copied().unwrap_or_default().to_string(),
            url: urls
                .get(i)
                .filter(|u| !u.is_empty())
                .map(|u| (*u).to_string()),
        })
        .collect())
}
