use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::provider::OddsProvider;
use crate::quote_types::{
    Match, MatchGoalQuotes, MatchMarkets, PlayerQuote, ProcessedData, TeamGoalStats,
    probability_from_quote,
};

/// One finished detail task, tagged with its match's position in the schedule.
#[derive(Debug, Clone)]
pub struct MatchContribution {
    pub index: usize,
    pub match_id: String,
    pub markets: MatchMarkets,
}

pub fn aggregate<P>(
    provider: &P,
    matches: &[Match],
    session_token: &str,
    max_workers: usize,
) -> ProcessedData
where
    P: OddsProvider + ?Sized,
{
    info!(
        matches = matches.len(),
        max_workers, "fetching match details in parallel"
    );
    let total = matches.len();
    let done = AtomicUsize::new(0);

    let contributions: Vec<MatchContribution> = with_fetch_pool(max_workers, || {
        matches
            .par_iter()
            .enumerate()
            .map(|(index, fixture)| {
                let markets = match provider.fetch_match_details(&fixture.id, session_token) {
                    Ok(markets) => markets,
                    Err(err) => {
                        let match_id = err.match_id().to_string();
                        let err = anyhow::Error::new(err);
                        warn!(match_id = %match_id, "detail fetch failed: {err:#}");
                        MatchMarkets::default()
                    }
                };
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                info!("processed match {n}/{total}: {}", fixture.description);
                MatchContribution {
                    index,
                    match_id: fixture.id.clone(),
                    markets,
                }
            })
            .collect()
    });

    info!("merging collected quotes");
    merge_contributions(matches, contributions)
}

/// Deterministic merge: contributions are replayed in schedule order, so the
/// order tasks finished in never shows up in the result.
pub fn merge_contributions(
    matches: &[Match],
    mut contributions: Vec<MatchContribution>,
) -> ProcessedData {
    contributions.sort_by_key(|c| c.index);

    let mut scorers: BTreeMap<String, f64> = BTreeMap::new();
    let mut assists: BTreeMap<String, f64> = BTreeMap::new();
    let mut goal_quotes: HashMap<String, MatchGoalQuotes> = HashMap::new();

    for contribution in contributions {
        let MatchMarkets {
            scorers: match_scorers,
            assists: match_assists,
            goal_quotes: match_goals,
        } = contribution.markets;
        for quote in match_scorers {
            scorers.insert(quote.player_name, quote.quote);
        }
        for quote in match_assists {
            assists.insert(quote.player_name, quote.quote);
        }
        if let Some(goals) = match_goals {
            goal_quotes.insert(goals.match_id.clone(), goals);
        }
    }

    let team_goal_stats = matches
        .iter()
        .filter_map(|fixture| {
            let quotes = goal_quotes.get(&fixture.id)?;
            Some(TeamGoalStats {
                match_id: fixture.id.clone(),
                home_team: fixture.home_team.clone(),
                away_team: fixture.away_team.clone(),
                prob_home_concedes: probability_from_quote(quotes.away_team_scores_quote),
                prob_away_concedes: probability_from_quote(quotes.home_team_scores_quote),
            })
        })
        .collect();

    ProcessedData {
        scorers: into_quotes(scorers),
        assists: into_quotes(assists),
        team_goal_stats,
    }
}

fn into_quotes(map: BTreeMap<String, f64>) -> Vec<PlayerQuote> {
    map.into_iter()
        .map(|(player_name, quote)| PlayerQuote { player_name, quote })
        .collect()
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(action),
        Err(err) => {
            warn!("fetch pool build failed, using global pool: {err}");
            action()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use reqwest::StatusCode;

    use super::*;
    use crate::error::{DetailFetchError, FetchError};
    use crate::schedule_fetch::Schedule;

    fn fixture(id: &str, home: &str, away: &str) -> Match {
        Match {
            id: id.to_string(),
            description: format!("{home} - {away}"),
            home_team: home.to_string(),
            away_team: away.to_string(),
        }
    }

    fn goals(match_id: &str, home: f64, away: f64) -> Option<MatchGoalQuotes> {
        Some(MatchGoalQuotes {
            match_id: match_id.to_string(),
            home_team_scores_quote: home,
            away_team_scores_quote: away,
        })
    }

    struct StubProvider {
        markets: HashMap<String, MatchMarkets>,
    }

    impl OddsProvider for StubProvider {
        fn fetch_schedule(&self) -> Result<Schedule, FetchError> {
            Ok(Schedule::default())
        }

        fn fetch_match_details(
            &self,
            match_id: &str,
            _session_token: &str,
        ) -> Result<MatchMarkets, DetailFetchError> {
            self.markets
                .get(match_id)
                .cloned()
                .ok_or_else(|| DetailFetchError::Status {
                    match_id: match_id.to_string(),
                    status: StatusCode::BAD_GATEWAY,
                })
        }
    }

    #[test]
    fn duplicate_names_keep_last_quote() {
        let matches = vec![fixture("1", "Roma", "Milan"), fixture("2", "Inter", "Lazio")];
        let contributions = vec![
            MatchContribution {
                index: 0,
                match_id: "1".to_string(),
                markets: MatchMarkets {
                    scorers: vec![PlayerQuote::new("Dybala", 3.0), PlayerQuote::new("Abraham", 2.5)],
                    ..MatchMarkets::default()
                },
            },
            MatchContribution {
                index: 1,
                match_id: "2".to_string(),
                markets: MatchMarkets {
                    scorers: vec![PlayerQuote::new("Dybala", 3.5)],
                    ..MatchMarkets::default()
                },
            },
        ];
        let data = merge_contributions(&matches, contributions);
        assert_eq!(
            data.scorers,
            vec![PlayerQuote::new("Abraham", 2.5), PlayerQuote::new("Dybala", 3.5)]
        );
    }

    #[test]
    fn completion_order_does_not_change_output() {
        let matches = vec![
            fixture("1", "Roma", "Milan"),
            fixture("2", "Inter", "Lazio"),
            fixture("3", "Napoli", "Genoa"),
        ];
        let build = |order: &[usize]| -> Vec<MatchContribution> {
            order
                .iter()
                .map(|&index| MatchContribution {
                    index,
                    match_id: matches[index].id.clone(),
                    markets: MatchMarkets {
                        scorers: vec![
                            PlayerQuote::new("Shared", 2.0 + index as f64),
                            PlayerQuote::new(format!("Only{index}"), 4.0),
                        ],
                        assists: vec![PlayerQuote::new("Helper", 5.0 + index as f64)],
                        goal_quotes: goals(&matches[index].id, 1.2, 1.4),
                    },
                })
                .collect()
        };

        let forward = merge_contributions(&matches, build(&[0, 1, 2]));
        let shuffled = merge_contributions(&matches, build(&[2, 0, 1]));
        let reversed = merge_contributions(&matches, build(&[2, 1, 0]));
        assert_eq!(forward, shuffled);
        assert_eq!(forward, reversed);
        let shared = forward
            .scorers
            .iter()
            .find(|p| p.player_name == "Shared")
            .expect("shared scorer kept");
        assert_eq!(shared.quote, 4.0);
    }

    #[test]
    fn concede_probability_uses_opponent_quote() {
        let matches = vec![fixture("1", "Roma", "Milan"), fixture("2", "Inter", "Lazio")];
        let contributions = vec![
            MatchContribution {
                index: 0,
                match_id: "1".to_string(),
                markets: MatchMarkets {
                    goal_quotes: goals("1", 1.25, 2.0),
                    ..MatchMarkets::default()
                },
            },
            MatchContribution {
                index: 1,
                match_id: "2".to_string(),
                markets: MatchMarkets::default(),
            },
        ];
        let data = merge_contributions(&matches, contributions);
        assert_eq!(data.team_goal_stats.len(), 1);
        let stats = &data.team_goal_stats[0];
        assert_eq!(stats.home_team, "Roma");
        assert!((stats.prob_home_concedes - 50.0).abs() < 1e-9);
        assert!((stats.prob_away_concedes - 80.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_team_quote_gives_zero() {
        let matches = vec![fixture("1", "Roma", "Milan")];
        let contributions = vec![MatchContribution {
            index: 0,
            match_id: "1".to_string(),
            markets: MatchMarkets {
                goal_quotes: goals("1", 0.0, -1.0),
                ..MatchMarkets::default()
            },
        }];
        let data = merge_contributions(&matches, contributions);
        assert_eq!(data.team_goal_stats[0].prob_home_concedes, 0.0);
        assert_eq!(data.team_goal_stats[0].prob_away_concedes, 0.0);
    }

    #[test]
    fn failed_match_does_not_drop_the_others() {
        let matches = vec![
            fixture("1", "Roma", "Milan"),
            fixture("2", "Inter", "Lazio"),
            fixture("3", "Napoli", "Genoa"),
        ];
        let mut markets = HashMap::new();
        markets.insert(
            "1".to_string(),
            MatchMarkets {
                scorers: vec![PlayerQuote::new("Dybala", 3.0)],
                goal_quotes: goals("1", 1.3, 1.6),
                ..MatchMarkets::default()
            },
        );
        markets.insert(
            "3".to_string(),
            MatchMarkets {
                assists: vec![PlayerQuote::new("Politano", 4.5)],
                goal_quotes: goals("3", 1.1, 1.9),
                ..MatchMarkets::default()
            },
        );
        let provider = StubProvider { markets };

        let data = aggregate(&provider, &matches, "token", 2);
        assert_eq!(data.scorers, vec![PlayerQuote::new("Dybala", 3.0)]);
        assert_eq!(data.assists, vec![PlayerQuote::new("Politano", 4.5)]);
        let ids: Vec<&str> = data
            .team_goal_stats
            .iter()
            .map(|s| s.match_id.as_str())
            .collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn single_worker_still_visits_every_match() {
        let matches: Vec<Match> = (0..12)
            .map(|i| fixture(&i.to_string(), &format!("Home{i}"), &format!("Away{i}")))
            .collect();
        let markets = matches
            .iter()
            .map(|m| {
                (
                    m.id.clone(),
                    MatchMarkets {
                        scorers: vec![PlayerQuote::new(format!("Player {}", m.id), 3.0)],
                        ..MatchMarkets::default()
                    },
                )
            })
            .collect();
        let provider = StubProvider { markets };

        let data = aggregate(&provider, &matches, "token", 1);
        assert_eq!(data.scorers.len(), 12);
        let names: Vec<&str> = data.scorer_names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn no_matches_gives_empty_data() {
        let provider = StubProvider {
            markets: HashMap::new(),
        };
        let data = aggregate(&provider, &[], "token", 10);
        assert!(data.is_empty());
    }
}
