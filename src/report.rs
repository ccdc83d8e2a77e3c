use std::fmt::Write;

use crate::roster::{Role, RosterQuoteEntry, RosterQuotes};

pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_roster_quotes(quotes: &RosterQuotes) -> String {
    let mut out = String::from("📊 *Roster probabilities*\n\n");

    out.push_str("🧤 *GOALKEEPERS* (concede %)\n```\n");
    let mut keepers: Vec<&RosterQuoteEntry> = quotes.entries(Role::Goalkeeper).iter().collect();
    keepers.sort_by(|a, b| concede_rank(a).total_cmp(&concede_rank(b)));
    for entry in keepers {
        let _ = writeln!(
            out,
            "{:<15} {:>7}",
            entry.name,
            format_prob(entry.prob_concedes())
        );
    }
    out.push_str("```\n");

    for (title, role) in [
        ("🛡️ *DEFENDERS*", Role::Defender),
        ("🧠 *MIDFIELDERS*", Role::Midfielder),
        ("⚽ *FORWARDS*", Role::Forward),
    ] {
        let _ = writeln!(out, "{title} (goal % / assist %)");
        out.push_str("```\n");
        let mut players: Vec<&RosterQuoteEntry> = quotes.entries(role).iter().collect();
        players.sort_by(|a, b| involvement_rank(b).total_cmp(&involvement_rank(a)));
        for entry in players {
            let _ = writeln!(
                out,
                "{:<15} {:>7} / {:>7}",
                entry.name,
                format_prob(entry.prob_goal()),
                format_prob(entry.prob_assist())
            );
        }
        out.push_str("```\n");
    }

    out
}

pub fn format_prob(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => NOT_AVAILABLE.to_string(),
    }
}

// Unknown concede chance ranks after every known one.
fn concede_rank(entry: &RosterQuoteEntry) -> f64 {
    entry.prob_concedes().unwrap_or(f64::INFINITY)
}

fn involvement_rank(entry: &RosterQuoteEntry) -> f64 {
    entry.prob_goal().unwrap_or(0.0) + entry.prob_assist().unwrap_or(0.0)
}
