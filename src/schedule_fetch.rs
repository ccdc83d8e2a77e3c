use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::QuoteConfig;
use crate::error::FetchError;
use crate::http_client::body_snippet;
use crate::quote_types::Match;

const TEAM_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub matches: Vec<Match>,
    /// Correlation code every detail request needs.
    pub session_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(rename = "scommessaMap", default)]
    scommessa_map: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct ScheduleEntry {
    #[serde(rename = "codicePalinsesto", default)]
    session_code: Option<Value>,
    #[serde(rename = "descrizioneAvvenimento", default)]
    description: Option<String>,
    #[serde(rename = "codiceAvvenimento", default)]
    event_code: Option<Value>,
}

pub fn fetch_schedule(client: &Client, cfg: &QuoteConfig) -> Result<Schedule, FetchError> {
    info!("fetching upcoming matches");
    let resp = client
        .get(&cfg.events_url)
        .send()
        .map_err(FetchError::Transport)?;
    let status = resp.status();
    let body = resp.text().map_err(FetchError::Transport)?;
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            snippet: body_snippet(&body),
        });
    }

    let schedule = parse_schedule_json(&body).map_err(FetchError::Decode)?;
    info!(
        matches = schedule.matches.len(),
        session_token = schedule.session_token.as_deref().unwrap_or("none"),
        "schedule loaded"
    );
    Ok(schedule)
}

pub fn parse_schedule_json(raw: &str) -> Result<Schedule, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Schedule::default());
    }

    let resp: ScheduleResponse = serde_json::from_str(trimmed)?;
    let entries = resp.scommessa_map.unwrap_or_default();
    if entries.is_empty() {
        warn!("schedule response has no scommessaMap entries");
        return Ok(Schedule::default());
    }

    let mut schedule = Schedule::default();
    for (key, value) in entries {
        let entry = match ScheduleEntry::deserialize(value) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(key = %key, "skipping unreadable schedule entry: {err}");
                continue;
            }
        };

        if schedule.session_token.is_none() {
            schedule.session_token = entry.session_code.as_ref().and_then(code_text);
        }

        let Some(description) = entry.description else {
            continue;
        };
        let Some((home, away)) = split_teams(&description) else {
            continue;
        };
        let Some(id) = entry.event_code.as_ref().and_then(code_text) else {
            continue;
        };
        schedule.matches.push(Match {
            id,
            home_team: home.to_string(),
            away_team: away.to_string(),
            description,
        });
    }

    Ok(schedule)
}

/// `"Home - Away"` into its two sides; anything else is rejected.
pub fn split_teams(description: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = description.split(TEAM_SEPARATOR).map(str::trim).collect();
    match parts.as_slice() {
        [home, away] if !home.is_empty() && !away.is_empty() => Some((*home, *away)),
        _ => None,
    }
}

// Codes arrive as numbers or strings; zero and blank count as absent.
fn code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        _ => None,
    }
}
