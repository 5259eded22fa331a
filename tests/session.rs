//! Integration tests for the persisted session and the runtime configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use dart_tournament_live::gateway::SessionData;
use dart_tournament_live::{
    LiveViewConfig, ScorerSession, Session, SessionError, ViewKind, ViewerConfig, SAVE_FLASH,
};
use uuid::Uuid;

fn temp_session_path() -> PathBuf {
    std::env::temp_dir().join(format!("dart-session-{}.json", Uuid::new_v4()))
}

#[test]
fn missing_file_starts_logged_out() {
    let path = temp_session_path();
    let session = Session::load(&path).unwrap();
    assert_eq!(session.token(), None);
    assert_eq!(session.scorer(), None);
    assert_eq!(session.path(), Some(path.as_path()));
    assert!(!path.exists());
}

#[test]
fn login_and_pairing_survive_a_restart() {
    let path = temp_session_path();
    let board = ScorerSession {
        tournament_id: 7,
        board_number: 3,
    };
    {
        let session = Session::load(&path).unwrap();
        session.login("secret").unwrap();
        session.pair(board).unwrap();
        session.set_scorer_token("tablet-token").unwrap();
    }

    let reloaded = Session::load(&path).unwrap();
    assert_eq!(reloaded.token().as_deref(), Some("secret"));
    assert_eq!(reloaded.scorer(), Some(board));
    assert_eq!(reloaded.scorer_token().as_deref(), Some("tablet-token"));

    reloaded.logout().unwrap();
    assert_eq!(Session::load(&path).unwrap().token(), None);
    assert_eq!(Session::load(&path).unwrap().scorer(), Some(board));

    reloaded.clear().unwrap();
    assert!(!path.exists());
    assert_eq!(reloaded.snapshot(), SessionData::default());
}

#[test]
fn corrupt_file_is_reported() {
    let path = temp_session_path();
    fs::write(&path, "not json").unwrap();

    let result = Session::load(&path);
    assert!(matches!(result, Err(SessionError::Format { .. })));

    fs::remove_file(&path).unwrap();
}

#[test]
fn in_memory_session_never_touches_disk() {
    let session = Session::in_memory();
    session.login("secret").unwrap();
    session.clear().unwrap();
    assert_eq!(session.path(), None);
    assert_eq!(session.token(), None);
}

#[test]
fn default_config_uses_the_documented_periods() {
    let config = ViewerConfig::default();
    assert_eq!(config.public_poll, Duration::from_secs(15));
    assert_eq!(config.scoreboard_poll, Duration::from_secs(5));
    assert_eq!(config.status_poll, Duration::from_secs(10));
    assert_eq!(config.auto_advance, Duration::from_secs(10));

    assert_eq!(config.live_view(ViewKind::Public), LiveViewConfig::public());
    assert_eq!(config.live_view(ViewKind::Scoreboard), LiveViewConfig::scoreboard());
    assert_eq!(LiveViewConfig::default().save_flash, SAVE_FLASH);
}

#[test]
fn view_kind_parses_case_insensitively() {
    assert_eq!("Scoreboard".parse::<ViewKind>(), Ok(ViewKind::Scoreboard));
    assert_eq!(" public ".parse::<ViewKind>(), Ok(ViewKind::Public));
    assert!("kiosk".parse::<ViewKind>().is_err());
}
