use reqwest::StatusCode;
use thiserror::Error;

/// Schedule or session retrieval failed. Fatal for a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http client build failed")]
    Client(#[source] reqwest::Error),
    #[error("schedule request failed")]
    Transport(#[source] reqwest::Error),
    #[error("schedule http {status}: {snippet}")]
    Status { status: StatusCode, snippet: String },
    #[error("invalid schedule json")]
    Decode(#[source] serde_json::Error),
    #[error("schedule contains no matches")]
    NoMatches,
    #[error("schedule carries no session token")]
    MissingSessionToken,
}

/// One match's detail request failed. The aggregator absorbs it.
#[derive(Debug, Error)]
pub enum DetailFetchError {
    #[error("match {match_id}: request failed")]
    Transport {
        match_id: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("match {match_id}: http {status}")]
    Status { match_id: String, status: StatusCode },
    #[error("match {match_id}: invalid detail json")]
    Decode {
        match_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DetailFetchError {
    pub fn match_id(&self) -> &str {
        match self {
            Self::Transport { match_id, .. }
            | Self::Status { match_id, .. }
            | Self::Decode { match_id, .. } => match_id,
        }
    }
}
