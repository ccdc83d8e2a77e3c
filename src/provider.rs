use reqwest::blocking::Client;

use crate::config::QuoteConfig;
use crate::detail_fetch::fetch_match_details;
use crate::error::{DetailFetchError, FetchError};
use crate::http_client::http_client;
use crate::quote_types::MatchMarkets;
use crate::schedule_fetch::{Schedule, fetch_schedule};

/// Source of schedules and per-match markets. Shared by reference across
/// the fetch pool, so implementations must be `Sync`.
pub trait OddsProvider: Sync {
    fn fetch_schedule(&self) -> Result<Schedule, FetchError>;

    fn fetch_match_details(
        &self,
        match_id: &str,
        session_token: &str,
    ) -> Result<MatchMarkets, DetailFetchError>;
}

/// HTTP provider. Immutable after construction; clones share one client.
#[derive(Debug, Clone)]
pub struct BookmakerClient {
    http: Client,
    cfg: QuoteConfig,
}

impl BookmakerClient {
    pub fn new(cfg: QuoteConfig) -> Result<Self, FetchError> {
        let http = http_client(&cfg)?;
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.cfg
    }
}

impl OddsProvider for BookmakerClient {
    fn fetch_schedule(&self) -> Result<Schedule, FetchError> {
        fetch_schedule(&self.http, &self.cfg)
    }

    fn fetch_match_details(
        &self,
        match_id: &str,
        session_token: &str,
    ) -> Result<MatchMarkets, DetailFetchError> {
        fetch_match_details(&self.http, &self.cfg, match_id, session_token)
    }
}
