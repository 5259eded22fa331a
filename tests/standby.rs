//! Integration tests for the tablet standby poll.

mod common;

use std::time::Duration;

use common::{board_status, settle, ScriptedStatus};
use dart_tournament_live::{
    GatewayError, ScorerMatchInfo, ScorerSession, ScorerStandby, ScorerState, Session,
    StandbyAction,
};
use tokio::time::sleep;

const BOARD: ScorerSession = ScorerSession {
    tournament_id: 7,
    board_number: 2,
};

fn paired_session() -> Session {
    let session = Session::in_memory();
    session.pair(BOARD).unwrap();
    session
}

fn played(id: i64) -> ScorerMatchInfo {
    ScorerMatchInfo {
        id,
        player1_name: "Anna".to_string(),
        player2_name: "Bert".to_string(),
        score_p1: 3,
        score_p2: 1,
        referee_name: None,
        round_str: "Poule 1".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn refuses_to_start_without_pairing() {
    let source = ScriptedStatus::new(vec![board_status(ScorerState::Waiting, None)]);
    let session = Session::in_memory();
    let result = ScorerStandby::mount(source.clone(), &session, Duration::from_secs(10));
    assert!(matches!(result, Err(GatewayError::NotPaired)));
    assert_eq!(source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn offers_the_match_once_the_board_is_active() {
    let source = ScriptedStatus::new(vec![
        board_status(ScorerState::Waiting, None),
        board_status(ScorerState::ActiveMatch, Some(31)),
    ]);
    let session = paired_session();
    let standby = ScorerStandby::mount(source.clone(), &session, Duration::from_secs(10)).unwrap();
    assert_eq!(standby.scorer(), BOARD);
    assert_eq!(standby.next_action(), StandbyAction::Wait);

    settle().await;
    assert_eq!(source.calls(), 1);
    assert_eq!(standby.next_action(), StandbyAction::Wait);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(standby.next_action(), StandbyAction::StartMatch(31));
}

#[tokio::test(start_paused = true)]
async fn unknown_state_means_wait() {
    let source = ScriptedStatus::new(vec![board_status(ScorerState::Unknown, Some(4))]);
    let standby = ScorerStandby::mount(source, &paired_session(), Duration::from_secs(10)).unwrap();
    settle().await;
    assert_eq!(standby.next_action(), StandbyAction::Wait);
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_match_can_be_corrected() {
    let mut status = board_status(ScorerState::Waiting, None);
    status.last_matches = vec![played(30), played(29)];
    let source = ScriptedStatus::new(vec![status]);
    let standby = ScorerStandby::mount(source, &paired_session(), Duration::from_secs(10)).unwrap();
    assert_eq!(standby.correction_candidate(), None);

    standby.refresh_now().await.unwrap();
    assert_eq!(standby.correction_candidate(), Some(30));
}

#[tokio::test(start_paused = true)]
async fn unpair_stops_polling_and_forgets_the_board() {
    let source = ScriptedStatus::new(vec![board_status(ScorerState::Waiting, None)]);
    let session = paired_session();
    session.set_scorer_token("tablet-token").unwrap();
    let standby = ScorerStandby::mount(source.clone(), &session, Duration::from_secs(10)).unwrap();
    settle().await;

    standby.unpair(&session).unwrap();
    assert_eq!(session.scorer(), None);
    assert_eq!(session.scorer_token(), None);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn unmount_discards_later_updates() {
    let source = ScriptedStatus::new(vec![board_status(ScorerState::ActiveMatch, Some(8))]);
    let mut standby =
        ScorerStandby::mount(source.clone(), &paired_session(), Duration::from_secs(10)).unwrap();
    standby.unmount();

    standby.refresh_now().await.unwrap();
    assert_eq!(standby.status(), None);
    sleep(Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 1);
}
