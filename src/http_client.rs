use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::QuoteConfig;
use crate::error::FetchError;

/// Builds the one client shared by every fetch in a run. `Client` is
/// reference counted internally, so clones share the connection pool.
pub fn http_client(cfg: &QuoteConfig) -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    if let Ok(agent) = HeaderValue::from_str(&cfg.user_agent) {
        headers.insert(USER_AGENT, agent);
    }
    Client::builder()
        .timeout(cfg.http_timeout)
        .default_headers(headers)
        .build()
        .map_err(FetchError::Client)
}

pub(crate) fn body_snippet(body: &str) -> String {
    body.trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(220)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_flattens_and_truncates() {
        let long = format!("line one\nline two\r\n{}", "x".repeat(400));
        let snippet = body_snippet(&long);
        assert!(snippet.starts_with("line one line two"));
        assert!(!snippet.contains('\n'));
        assert_eq!(snippet.chars().count(), 220);
    }
}
