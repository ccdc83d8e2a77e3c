use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub description: String,
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerQuote {
    pub player_name: String,
    pub quote: f64,
}

impl PlayerQuote {
    pub fn new(player_name: impl Into<String>, quote: f64) -> Self {
        Self {
            player_name: player_name.into(),
            quote,
        }
    }

    pub fn probability(&self) -> f64 {
        probability_from_quote(self.quote)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchGoalQuotes {
    pub match_id: String,
    pub home_team_scores_quote: f64,
    pub away_team_scores_quote: f64,
}

/// Everything one match detail payload contributed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchMarkets {
    pub scorers: Vec<PlayerQuote>,
    pub assists: Vec<PlayerQuote>,
    pub goal_quotes: Option<MatchGoalQuotes>,
}

impl MatchMarkets {
    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty() && self.assists.is_empty() && self.goal_quotes.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGoalStats {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    // Percent chance each side concedes at least one goal, derived from the
    // opponent's "team scores" quote.
    pub prob_home_concedes: f64,
    pub prob_away_concedes: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedData {
    pub scorers: Vec<PlayerQuote>,
    pub assists: Vec<PlayerQuote>,
    pub team_goal_stats: Vec<TeamGoalStats>,
}

impl ProcessedData {
    pub fn scorer_names(&self) -> Vec<&str> {
        self.scorers.iter().map(|p| p.player_name.as_str()).collect()
    }

    pub fn assist_names(&self) -> Vec<&str> {
        self.assists.iter().map(|p| p.player_name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty() && self.assists.is_empty() && self.team_goal_stats.is_empty()
    }
}

/// Implied probability in percent. Non-positive quotes map to 0.
pub fn probability_from_quote(quote: f64) -> f64 {
    if quote > 0.0 { 100.0 / quote } else { 0.0 }
}
