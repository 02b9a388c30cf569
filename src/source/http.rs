//! Fare search over HTTP

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use super::{FareSource, FetchError};
use crate::fares::{Direction, RawObservationBatch};
use crate::monitor::MonitorConfig;

const OUTBOUND_SECTION: &str = r#"id="faresOutbound""#;
const RETURN_SECTION: &str = r#"id="faresReturn""#;

fn price_element() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<([A-Za-z][A-Za-z0-9]*)\b[^>]*\bclass="[^"]*\bproduct_price\b[^"]*"[^>]*>"#)
            .expect("price element pattern is a valid regex")
    })
}

fn markup_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)\b[^>]*?(/?)>").expect("tag pattern is a valid regex")
    })
}

/// Source that runs the round-trip fare search and scrapes the result page
#[derive(Debug, Clone)]
pub struct HttpFareSource {
    client: reqwest::Client,
}

impl HttpFareSource {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("farewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    fn search_params(config: &MonitorConfig) -> Vec<(&'static str, String)> {
        vec![
            ("twoWayTrip", "true".to_string()),
            ("originAirport", config.origin.clone()),
            ("destinationAirport", config.destination.clone()),
            ("returnAirport", "RoundTrip".to_string()),
            ("outboundDateString", config.outbound_date.format("%m/%d/%Y").to_string()),
            ("outboundTimeOfDay", "ANYTIME".to_string()),
            ("returnDateString", config.return_date.format("%m/%d/%Y").to_string()),
            ("returnTimeOfDay", "ANYTIME".to_string()),
            ("adultPassengerCount", config.passengers.to_string()),
            ("seniorPassengerCount", "0".to_string()),
            ("fareType", "DOLLARS".to_string()),
        ]
    }
}

#[async_trait]
impl FareSource for HttpFareSource {
    async fn fetch(&self, config: &MonitorConfig) -> Result<RawObservationBatch, FetchError> {
        let response = self
            .client
            .get(&config.source_url)
            .query(&Self::search_params(config))
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        let batch = parse_fare_markup(&body);
        tracing::debug!(
            outbound = batch.fragments(Direction::Outbound).len(),
            inbound = batch.fragments(Direction::Return).len(),
            "Collected fare fragments"
        );
        Ok(batch)
    }
}

/// Split a result page into its outbound and return sections and collect
/// the text of every `product_price` element in each.
pub fn parse_fare_markup(html: &str) -> RawObservationBatch {
    let mut batch = RawObservationBatch::new();

    let outbound_at = html.find(OUTBOUND_SECTION);
    let return_at = html.find(RETURN_SECTION);

    if let Some(start) = outbound_at {
        let end = return_at
            .filter(|&r| r > start)
            .map(|r| section_open(html, r))
            .unwrap_or(html.len());
        collect_prices(&html[start..end], Direction::Outbound, &mut batch);
    }
    if let Some(start) = return_at {
        let end = outbound_at
            .filter(|&o| o > start)
            .map(|o| section_open(html, o))
            .unwrap_or(html.len());
        collect_prices(&html[start..end], Direction::Return, &mut batch);
    }

    batch
}

/// Start of the tag carrying a section marker
fn section_open(html: &str, marker_at: usize) -> usize {
    html[..marker_at].rfind('<').unwrap_or(marker_at)
}

fn collect_prices(section: &str, direction: Direction, batch: &mut RawObservationBatch) {
    for open in price_element().captures_iter(section) {
        let (Some(whole), Some(name)) = (open.get(0), open.get(1)) else {
            continue;
        };
        let Some(end) = closing_tag(section, whole.end(), name.as_str()) else {
            tracing::debug!(tag = name.as_str(), "Unclosed price element, skipping");
            continue;
        };

        let text = markup_tag().replace_all(&section[whole.end()..end], " ");
        let fragment = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !fragment.is_empty() {
            batch.push(direction, fragment);
        }
    }
}

/// Offset of the tag closing an element named `name` whose content starts at `from`.
///
/// Tag names compare case-insensitively and nested elements of the same
/// name are balanced.
fn closing_tag(section: &str, from: usize, name: &str) -> Option<usize> {
    let mut depth = 1usize;
    for tag in markup_tag().captures_iter(&section[from..]) {
        if !tag[2].eq_ignore_ascii_case(name) {
            continue;
        }
        let is_close = !tag[1].is_empty();
        let self_closing = !tag[3].is_empty();
        if is_close {
            depth -= 1;
            if depth == 0 {
                return tag.get(0).map(|m| from + m.start());
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    None
}
