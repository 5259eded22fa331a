//! Integration tests for the tournament data model helpers.

use dart_tournament_live::{
    can_start_knockout, has_unresolved_ties, GameMatch, ScorePair, Side, Stage, Standings,
    StandingsItem, Tournament, TournamentFormat, TournamentStatus,
};

fn finished_poule(id: i64, poule: u32) -> GameMatch {
    let mut game = GameMatch::new(id, 1, Some(poule)).with_players("Anna", "Bert");
    game.score_p1 = 3;
    game.score_p2 = 1;
    game.is_completed = true;
    game
}

fn tie_in_poule_1() -> Standings {
    let mut standings = Standings::new();
    standings.insert(
        1,
        vec![StandingsItem {
            id: 1,
            name: "Anna".to_string(),
            needs_shootout: true,
            ..StandingsItem::default()
        }],
    );
    standings
}

#[test]
fn score_adjust_floors_at_zero() {
    let mut scores = ScorePair::new(1, 0);
    scores.adjust(Side::P1, -1);
    scores.adjust(Side::P1, -1);
    scores.adjust(Side::P2, 2);
    assert_eq!(scores, ScorePair::new(0, 2));
    assert_eq!(scores.get(Side::P2), 2);
}

#[test]
fn stage_and_labels_follow_poule_number() {
    let poule = GameMatch::new(1, 2, Some(3));
    let bracket = GameMatch::new(2, 4, None);
    assert_eq!(poule.stage(), Stage::Poule(3));
    assert_eq!(bracket.stage(), Stage::Knockout);
    assert_eq!(poule.round_label(), "Poule 3");
    assert_eq!(bracket.round_label(), "KO R4");
    assert_eq!(bracket.player1_display(), "Bye");
}

#[test]
fn knockout_can_start_when_all_poules_are_done() {
    let matches = vec![finished_poule(1, 1), finished_poule(2, 2)];
    assert!(can_start_knockout(
        TournamentFormat::Hybrid,
        &matches,
        &Standings::new()
    ));
}

#[test]
fn knockout_waits_for_open_matches_and_ties() {
    let mut open = vec![finished_poule(1, 1), finished_poule(2, 1)];
    open[1].is_completed = false;
    assert!(!can_start_knockout(TournamentFormat::Hybrid, &open, &Standings::new()));

    let done = vec![finished_poule(1, 1)];
    assert!(has_unresolved_ties(&tie_in_poule_1()));
    assert!(!can_start_knockout(TournamentFormat::Hybrid, &done, &tie_in_poule_1()));
}

#[test]
fn knockout_only_for_hybrid_without_bracket() {
    let done = vec![finished_poule(1, 1)];
    assert!(!can_start_knockout(TournamentFormat::RoundRobin, &done, &Standings::new()));
    assert!(!can_start_knockout(TournamentFormat::Hybrid, &[], &Standings::new()));

    let mut with_bracket = done.clone();
    with_bracket.push(GameMatch::new(9, 1, None));
    assert!(!can_start_knockout(
        TournamentFormat::Hybrid,
        &with_bracket,
        &Standings::new()
    ));
}

#[test]
fn unknown_status_and_format_still_decode() {
    let tournament: Tournament = serde_json::from_value(serde_json::json!({
        "id": 7,
        "name": "Club Night",
        "status": "archived",
        "format": "swiss",
        "matches": []
    }))
    .unwrap();
    assert_eq!(tournament.status, TournamentStatus::Unknown);
    assert_eq!(tournament.format, TournamentFormat::Unknown);
    assert!(!can_start_knockout(tournament.format, &[], &Standings::new()));
}
