use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::name_match::SIMILARITY_THRESHOLD;

const BASE_URL: &str = "https://betting.sisal.it/api/lettura-palinsesto-sport/palinsesto/prematch";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_EXPORT_FILE: &str = "quote_giornata.csv";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_WORKERS: usize = 10;

pub const SCORER_MARKET_CODE: &str = "28231";
pub const ASSIST_MARKET_CODE: &str = "28547";
pub const HOME_SCORES_MARKET_CODE: &str = "165";
pub const AWAY_SCORES_MARKET_CODE: &str = "166";

/// Bet-type codes found in the third dash segment of a market key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketCodes {
    pub scorer: String,
    pub assist: String,
    pub home_scores: String,
    pub away_scores: String,
}

impl Default for MarketCodes {
    fn default() -> Self {
        Self {
            scorer: SCORER_MARKET_CODE.to_string(),
            assist: ASSIST_MARKET_CODE.to_string(),
            home_scores: HOME_SCORES_MARKET_CODE.to_string(),
            away_scores: AWAY_SCORES_MARKET_CODE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub events_url: String,
    /// Detail endpoint with `{session}` and `{match_id}` placeholders.
    pub detail_url_template: String,
    pub user_agent: String,
    pub http_timeout: Duration,
    pub max_workers: usize,
    pub similarity_threshold: u32,
    pub market_codes: MarketCodes,
    pub export_path: Option<PathBuf>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            events_url: format!("{BASE_URL}/schedaManifestazione/0/1-209?offerId=0"),
            detail_url_template: format!(
                "{BASE_URL}/v1/eventDetail/{{session}}-{{match_id}}?offerId=0&metaTplEnabled=true"
            ),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_workers: DEFAULT_MAX_WORKERS,
            similarity_threshold: SIMILARITY_THRESHOLD,
            market_codes: MarketCodes::default(),
            export_path: Some(PathBuf::from(DEFAULT_EXPORT_FILE)),
        }
    }
}

impl QuoteConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let events_url = env_string("QUOTE_EVENTS_URL").unwrap_or(defaults.events_url);
        let detail_url_template =
            env_string("QUOTE_DETAIL_URL_TEMPLATE").unwrap_or(defaults.detail_url_template);
        let user_agent = env_string("QUOTE_USER_AGENT").unwrap_or(defaults.user_agent);
        let timeout_secs = env::var("QUOTE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
            .clamp(1, 120);
        let max_workers = env::var("FETCH_PARALLELISM")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_WORKERS)
            .clamp(1, 32);
        let similarity_threshold = env::var("QUOTE_SIMILARITY_THRESHOLD")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(SIMILARITY_THRESHOLD)
            .min(100);
        let export_path = if env_bool("QUOTE_EXPORT", true) {
            env_string("QUOTE_EXPORT_PATH")
                .map(PathBuf::from)
                .or(defaults.export_path)
        } else {
            None
        };

        Self {
            events_url,
            detail_url_template,
            user_agent,
            http_timeout: Duration::from_secs(timeout_secs),
            max_workers,
            similarity_threshold,
            market_codes: defaults.market_codes,
            export_path,
        }
    }

    pub fn detail_url(&self, session_token: &str, match_id: &str) -> String {
        self.detail_url_template
            .replace("{session}", session_token)
            .replace("{match_id}", match_id)
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
