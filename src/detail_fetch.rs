use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{MarketCodes, QuoteConfig};
use crate::error::DetailFetchError;
use crate::quote_types::{MatchGoalQuotes, MatchMarkets, PlayerQuote};

const SCORER_SUFFIX: &str = " SEGNA O SUO SOSTITUTO INCL. T.S.";
const ASSIST_SUFFIX: &str = " ASSIST O SUO SOSTITUTO INCL. T.S.";

// Prices are integers scaled by 100; a market without one counts as 1.0.
const DEFAULT_RAW_PRICE: f64 = 100.0;
const DEFAULT_TEAM_SCORES_QUOTE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketKind {
    Scorer,
    Assist,
    HomeTeamScores,
    AwayTeamScores,
}

impl MarketKind {
    pub fn from_code(code: &str, codes: &MarketCodes) -> Option<Self> {
        if code == codes.scorer {
            Some(Self::Scorer)
        } else if code == codes.assist {
            Some(Self::Assist)
        } else if code == codes.home_scores {
            Some(Self::HomeTeamScores)
        } else if code == codes.away_scores {
            Some(Self::AwayTeamScores)
        } else {
            None
        }
    }

    /// Third dash-separated segment of a market key, e.g. `12345-67890-28231-1`.
    pub fn from_key(key: &str, codes: &MarketCodes) -> Option<Self> {
        let code = key.split('-').nth(2)?;
        Self::from_code(code, codes)
    }
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(rename = "infoAggiuntivaMap", default)]
    info_map: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct MarketEntry {
    #[serde(rename = "descrizione", default)]
    description: Option<String>,
    #[serde(rename = "esitoList", default)]
    outcomes: Vec<MarketOutcome>,
}

#[derive(Debug, Deserialize)]
struct MarketOutcome {
    #[serde(rename = "quota", default)]
    price: Option<f64>,
}

impl MarketEntry {
    fn quote(&self) -> f64 {
        let raw = self
            .outcomes
            .first()
            .and_then(|o| o.price)
            .unwrap_or(DEFAULT_RAW_PRICE);
        raw / 100.0
    }
}

pub fn fetch_match_details(
    client: &Client,
    cfg: &QuoteConfig,
    match_id: &str,
    session_token: &str,
) -> Result<MatchMarkets, DetailFetchError> {
    let url = cfg.detail_url(session_token, match_id);
    let resp = client
        .get(&url)
        .send()
        .map_err(|source| DetailFetchError::Transport {
            match_id: match_id.to_string(),
            source,
        })?;
    let status = resp.status();
    if !status.is_success() {
        return Err(DetailFetchError::Status {
            match_id: match_id.to_string(),
            status,
        });
    }
    let body = resp.text().map_err(|source| DetailFetchError::Transport {
        match_id: match_id.to_string(),
        source,
    })?;

    parse_match_details_json(&body, match_id, &cfg.market_codes).map_err(|source| {
        DetailFetchError::Decode {
            match_id: match_id.to_string(),
            source,
        }
    })
}

pub fn parse_match_details_json(
    raw: &str,
    match_id: &str,
    codes: &MarketCodes,
) -> Result<MatchMarkets, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MatchMarkets::default());
    }

    let resp: DetailResponse = serde_json::from_str(trimmed)?;
    let entries = resp.info_map.unwrap_or_default();

    let mut markets = MatchMarkets::default();
    let mut home_scores: Option<f64> = None;
    let mut away_scores: Option<f64> = None;

    for (key, value) in entries {
        let Some(kind) = MarketKind::from_key(&key, codes) else {
            continue;
        };
        let entry = match MarketEntry::deserialize(value) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(match_id, key = %key, "skipping unreadable market: {err}");
                continue;
            }
        };
        let quote = entry.quote();
        let description = entry.description.as_deref().unwrap_or("N/A");

        match kind {
            MarketKind::Scorer => markets
                .scorers
                .push(PlayerQuote::new(strip_suffix(description, SCORER_SUFFIX), quote)),
            MarketKind::Assist => markets
                .assists
                .push(PlayerQuote::new(strip_suffix(description, ASSIST_SUFFIX), quote)),
            MarketKind::HomeTeamScores => home_scores = Some(quote),
            MarketKind::AwayTeamScores => away_scores = Some(quote),
        }
    }

    if home_scores.is_some() || away_scores.is_some() {
        markets.goal_quotes = Some(MatchGoalQuotes {
            match_id: match_id.to_string(),
            home_team_scores_quote: home_scores.unwrap_or(DEFAULT_TEAM_SCORES_QUOTE),
            away_team_scores_quote: away_scores.unwrap_or(DEFAULT_TEAM_SCORES_QUOTE),
        });
    }

    Ok(markets)
}

fn strip_suffix(description: &str, suffix: &str) -> String {
    description.replace(suffix, "")
}
