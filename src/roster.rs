use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::name_match::find_best_match_with_threshold;
use crate::quote_types::{ProcessedData, TeamGoalStats, probability_from_quote};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "Por", alias = "P")]
    Goalkeeper,
    #[serde(alias = "Dif", alias = "D")]
    Defender,
    #[serde(alias = "Cen", alias = "C")]
    Midfielder,
    #[serde(alias = "Att", alias = "A")]
    Forward,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Goalkeeper,
        Role::Defender,
        Role::Midfielder,
        Role::Forward,
    ];

    pub fn is_outfield(self) -> bool {
        !matches!(self, Role::Goalkeeper)
    }
}

/// One roster slot, read from a `[name, team]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct RosterPlayer {
    pub name: String,
    pub team: String,
}

impl RosterPlayer {
    pub fn new(name: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
        }
    }
}

impl From<(String, String)> for RosterPlayer {
    fn from((name, team): (String, String)) -> Self {
        Self { name, team }
    }
}

impl From<RosterPlayer> for (String, String) {
    fn from(player: RosterPlayer) -> Self {
        (player.name, player.team)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: BTreeMap<Role, Vec<RosterPlayer>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(mut self, role: Role, players: Vec<RosterPlayer>) -> Self {
        self.players.entry(role).or_default().extend(players);
        self
    }

    pub fn players(&self, role: Role) -> &[RosterPlayer] {
        self.players.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.players.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleQuotes {
    Goalkeeper {
        prob_concedes: Option<f64>,
    },
    Outfield {
        prob_goal: Option<f64>,
        prob_assist: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterQuoteEntry {
    pub name: String,
    pub team: String,
    pub quotes: RoleQuotes,
}

impl RosterQuoteEntry {
    pub fn prob_concedes(&self) -> Option<f64> {
        match self.quotes {
            RoleQuotes::Goalkeeper { prob_concedes } => prob_concedes,
            RoleQuotes::Outfield { .. } => None,
        }
    }

    pub fn prob_goal(&self) -> Option<f64> {
        match self.quotes {
            RoleQuotes::Outfield { prob_goal, .. } => prob_goal,
            RoleQuotes::Goalkeeper { .. } => None,
        }
    }

    pub fn prob_assist(&self) -> Option<f64> {
        match self.quotes {
            RoleQuotes::Outfield { prob_assist, .. } => prob_assist,
            RoleQuotes::Goalkeeper { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterQuotes {
    by_role: BTreeMap<Role, Vec<RosterQuoteEntry>>,
}

impl RosterQuotes {
    pub fn entries(&self, role: Role) -> &[RosterQuoteEntry] {
        self.by_role.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, role: Role, entries: Vec<RosterQuoteEntry>) {
        self.by_role.insert(role, entries);
    }
}

pub fn bind_roster(roster: &Roster, data: &ProcessedData, threshold: u32) -> RosterQuotes {
    let scorer_names = data.scorer_names();
    let assist_names = data.assist_names();
    let scorer_quotes: HashMap<&str, f64> = data
        .scorers
        .iter()
        .map(|p| (p.player_name.as_str(), p.quote))
        .collect();
    let assist_quotes: HashMap<&str, f64> = data
        .assists
        .iter()
        .map(|p| (p.player_name.as_str(), p.quote))
        .collect();

    let mut bound = RosterQuotes::default();
    for role in Role::ALL {
        let entries = roster
            .players(role)
            .iter()
            .map(|player| {
                let quotes = if role.is_outfield() {
                    RoleQuotes::Outfield {
                        prob_goal: matched_probability(
                            &player.name,
                            &scorer_names,
                            &scorer_quotes,
                            threshold,
                        ),
                        prob_assist: matched_probability(
                            &player.name,
                            &assist_names,
                            &assist_quotes,
                            threshold,
                        ),
                    }
                } else {
                    RoleQuotes::Goalkeeper {
                        prob_concedes: concede_probability(&player.team, &data.team_goal_stats),
                    }
                };
                RosterQuoteEntry {
                    name: player.name.clone(),
                    team: player.team.clone(),
                    quotes,
                }
            })
            .collect();
        bound.insert(role, entries);
    }
    bound
}

/// First fixture whose home, then away, side contains `team`
/// (case-insensitive). No ranking between several hits, and the team name
/// is used verbatim: an empty name hits the first fixture.
pub fn concede_probability(team: &str, stats: &[TeamGoalStats]) -> Option<f64> {
    let needle = team.to_lowercase();
    stats.iter().find_map(|s| {
        if s.home_team.to_lowercase().contains(&needle) {
            Some(s.prob_home_concedes)
        } else if s.away_team.to_lowercase().contains(&needle) {
            Some(s.prob_away_concedes)
        } else {
            None
        }
    })
}

fn matched_probability(
    name: &str,
    candidates: &[&str],
    quotes: &HashMap<&str, f64>,
    threshold: u32,
) -> Option<f64> {
    let hit = find_best_match_with_threshold(name, candidates, threshold)?;
    debug!(player = name, matched = %hit.name, score = hit.score, "name matched");
    let quote = quotes.get(hit.name.as_str()).copied().unwrap_or(0.0);
    Some(probability_from_quote(quote))
}
