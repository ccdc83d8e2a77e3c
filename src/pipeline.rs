use tracing::{error, info};

use crate::aggregate::aggregate;
use crate::config::QuoteConfig;
use crate::error::FetchError;
use crate::provider::OddsProvider;
use crate::quote_export::save_all_quotes;
use crate::quote_types::ProcessedData;
use crate::roster::{Roster, RosterQuotes, bind_roster};

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub processed: ProcessedData,
    pub roster_quotes: RosterQuotes,
}

/// Scrape the league once and bind the result to `roster`.
///
/// Only schedule-level problems are returned as errors; per-match failures
/// and unmatched names end up as missing values in the output.
pub fn run_for_roster<P>(
    provider: &P,
    cfg: &QuoteConfig,
    roster: &Roster,
) -> Result<RunOutput, FetchError>
where
    P: OddsProvider + ?Sized,
{
    let schedule = provider.fetch_schedule().inspect_err(|err| {
        error!("scrape aborted: {err}");
    })?;
    if schedule.matches.is_empty() {
        error!("scrape aborted: no matches in schedule");
        return Err(FetchError::NoMatches);
    }
    let Some(session_token) = schedule.session_token else {
        error!("scrape aborted: schedule has no session token");
        return Err(FetchError::MissingSessionToken);
    };

    let processed = aggregate(provider, &schedule.matches, &session_token, cfg.max_workers);
    info!(
        scorers = processed.scorers.len(),
        assists = processed.assists.len(),
        fixtures = processed.team_goal_stats.len(),
        "quotes aggregated"
    );

    if let Some(path) = cfg.export_path.as_deref() {
        save_all_quotes(path, &processed);
    }

    let roster_quotes = bind_roster(roster, &processed, cfg.similarity_threshold);
    Ok(RunOutput {
        processed,
        roster_quotes,
    })
}
