//! Layered configuration feeding the builder, and the demo bootstrap.

mod common;

use arena_runtime::demo::{demo_password, DEMO_USERS};
use arena_runtime::{Arena, ConfigLoader};
use arena_types::TournamentState;
use common::{HighCard, GAME};
use std::fs;
use tempfile::TempDir;

fn project(toml: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join(".arena")).unwrap();
    fs::write(dir.path().join(".arena/config.toml"), toml).unwrap();
    dir
}

fn load(dir: &TempDir) -> arena_runtime::ArenaConfig {
    ConfigLoader::new()
        .skip_global_config()
        .skip_env_vars()
        .with_project_root(dir.path())
        .load()
        .unwrap()
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn project_config_configures_the_arena() {
    let dir = project(
        r#"
[operator]
login = "root"
password = "hunter2"

[server]
endpoint = "arena.test:1099"
code_base = ["https://arena.test/views/"]

[peers]
max_attempts = 2
"#,
    );
    let config = load(&dir);
    assert_eq!(config.peers.max_attempts, Some(2));
    assert_eq!(config.session.ttl_secs, None);

    let arena = common::arena_with(config);
    assert_eq!(arena.operator().login(), "root");
    assert!(arena.login("root", "hunter2").is_ok());
    assert!(arena.login("admin", "adminpass").is_err());
    assert_eq!(arena.endpoint(), "arena.test:1099");
    assert_eq!(arena.code_base(), ["https://arena.test/views/".to_string()]);
}

#[test]
fn missing_project_config_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load(&dir);
    assert_eq!(config, arena_runtime::ArenaConfig::default());
}

#[test]
fn malformed_project_config_is_an_error() {
    let dir = project("[operator\nlogin = ");
    let result = ConfigLoader::new()
        .skip_global_config()
        .skip_env_vars()
        .with_project_root(dir.path())
        .load();
    let err = result.unwrap_err();
    assert!(err.to_string().contains("config.toml"), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn registry_filters_games_and_styles() {
    let dir = project(
        r#"
[registry]
styles = ["single-match"]
games = ["chess"]
"#,
    );
    let arena = common::arena_with(load(&dir));
    assert!(arena.game_infos().is_empty());
    assert_eq!(arena.style_names(), vec!["single-match".to_string()]);
}

// =============================================================================
// Demo
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn demo_populates_leagues_and_tournaments() {
    let dir = project(
        r#"
[demo]
enabled = true
"#,
    );
    let arena = common::arena_with(load(&dir));

    for login in DEMO_USERS {
        assert!(arena.login(login, &demo_password(login)).is_ok(), "{login}");
    }

    let op = common::operator(&arena);
    let leagues = arena.league_infos(&op).unwrap();
    let names: Vec<_> = leagues.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            format!("Expert {GAME} League"),
            format!("Novice {GAME} League")
        ]
    );
    assert!(leagues[0].restricted);
    assert_eq!(leagues[0].owner.login(), "bob");

    // The guest and non-roster players only see the open league.
    let guest_view = arena.league_infos(&arena.guest_ticket()).unwrap();
    assert_eq!(guest_view.len(), 1);
    let mary = arena.login("mary", &demo_password("mary")).unwrap();
    assert_eq!(arena.league_infos(&mary).unwrap().len(), 1);

    let expert = arena.league(&op, leagues[0].id).unwrap();
    let championships = expert.tournament_infos(&op).unwrap();
    let state_of = |name: &str| {
        championships
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.state)
    };
    assert_eq!(state_of("2003 Championship"), Some(TournamentState::Playing));
    assert_eq!(state_of("2004 Championship"), Some(TournamentState::Registration));

    let novice = arena.league(&op, leagues[1].id).unwrap();
    let cups = novice.tournament_infos(&op).unwrap();
    assert_eq!(cups.len(), 1);
    assert_eq!(cups[0].accepted.len(), 5);
    let cup = arena.tournament(&op, cups[0].id).unwrap();
    let round = cup.current_round_info(&op).unwrap().unwrap();
    assert_eq!(round.matches.len(), 2);
    assert_eq!(round.byes.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn demo_without_games_is_skipped() {
    let mut config = common::config();
    config.demo.enabled = true;
    let arena = Arena::builder().with_config(config).build().unwrap();
    let op = common::operator(&arena);
    assert!(arena.league_infos(&op).unwrap().is_empty());
    assert!(arena.find_user("alice").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn demo_game_can_be_chosen() {
    let mut config = common::config();
    config.demo.enabled = true;
    config.demo.game = Some("high-card-party".into());
    let arena = Arena::builder()
        .with_config(config)
        .with_game(GAME, "duel", HighCard::duel(), None)
        .with_game(
            "high-card-party",
            "up to four players",
            std::sync::Arc::new(HighCard { min: 2, max: 4 }),
            None,
        )
        .build()
        .unwrap();
    let op = common::operator(&arena);
    let leagues = arena.league_infos_by_game(&op, "high-card-party").unwrap();
    assert_eq!(leagues.len(), 2);
    assert!(arena.league_infos_by_game(&op, GAME).unwrap().is_empty());
}
