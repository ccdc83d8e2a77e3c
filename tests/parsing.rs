use std::fs;
use std::path::PathBuf;

use roster_odds::config::MarketCodes;
use roster_odds::detail_fetch::parse_match_details_json;
use roster_odds::quote_types::PlayerQuote;
use roster_odds::schedule_fetch::parse_schedule_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_schedule_fixture() {
    let raw = read_fixture("schedule.json");
    let schedule = parse_schedule_json(&raw).expect("fixture should parse");
    assert_eq!(schedule.session_token.as_deref(), Some("31007"));
    assert_eq!(schedule.matches.len(), 3);
    assert_eq!(schedule.matches[0].id, "24811");
    assert_eq!(schedule.matches[0].home_team, "Roma");
    assert_eq!(schedule.matches[0].away_team, "Milan");
    assert_eq!(schedule.matches[2].away_team, "Hellas Verona");
    assert_eq!(schedule.matches[2].description, "Napoli - Hellas Verona");
}

#[test]
fn parses_match_detail_fixture() {
    let raw = read_fixture("match_detail.json");
    let markets =
        parse_match_details_json(&raw, "24812", &MarketCodes::default()).expect("fixture should parse");

    assert_eq!(
        markets.scorers,
        vec![
            PlayerQuote::new("MARTINEZ L.", 2.0),
            PlayerQuote::new("THURAM M.", 2.5),
            PlayerQuote::new("CASTELLANOS T.", 3.2),
        ]
    );
    assert_eq!(
        markets.assists,
        vec![
            PlayerQuote::new("BARELLA N.", 4.0),
            PlayerQuote::new("DIMARCO F.", 3.5),
        ]
    );
    let goals = markets.goal_quotes.expect("team markets present");
    assert_eq!(goals.match_id, "24812");
    assert!((goals.home_team_scores_quote - 1.15).abs() < 1e-9);
    assert!((goals.away_team_scores_quote - 1.6).abs() < 1e-9);
}

#[test]
fn custom_market_codes_change_what_is_read() {
    let raw = read_fixture("match_detail.json");
    let codes = MarketCodes {
        scorer: "28547".to_string(),
        assist: "28231".to_string(),
        ..MarketCodes::default()
    };
    let markets = parse_match_details_json(&raw, "24812", &codes).expect("fixture should parse");
    // Suffixes no longer line up, so descriptions come through untouched.
    assert_eq!(markets.scorers.len(), 2);
    assert!(markets.scorers[0].player_name.ends_with("ASSIST O SUO SOSTITUTO INCL. T.S."));
    assert_eq!(markets.assists.len(), 3);
}

#[test]
fn detail_null_is_empty() {
    let markets =
        parse_match_details_json("null", "1", &MarketCodes::default()).expect("null should parse");
    assert!(markets.is_empty());
}

#[test]
fn schedule_null_is_empty() {
    let schedule = parse_schedule_json("null").expect("null should parse");
    assert!(schedule.matches.is_empty());
    assert!(schedule.session_token.is_none());
}
