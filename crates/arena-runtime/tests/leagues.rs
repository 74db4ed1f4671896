//! League administration and arena-level access checks.

mod common;

use arena_auth::Ticket;
use arena_event::MatchInfo;
use arena_runtime::{Arena, ArenaError, MatchView, MatchViewFactory};
use arena_types::{AccessLevel, ErrorCode, LeagueId, MatchId, MatchState, Scope};
use common::{operator, player, HighCard, GAME};
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread")]
async fn only_the_operator_creates_leagues_and_users() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");

    let err = arena
        .create_league(&bob, "bob", "Mine", "", GAME, "knockout")
        .unwrap_err();
    assert_eq!(err.code(), "ARENA_ACCESS_DENIED");
    assert_eq!(
        arena.create_user(&bob, "eve", "evepass").unwrap_err().code(),
        "ARENA_ACCESS_DENIED"
    );

    let op = operator(&arena);
    let err = arena
        .create_league(&op, "nobody", "Orphan", "", GAME, "knockout")
        .unwrap_err();
    assert_eq!(err.code(), "ARENA_USER_NOT_FOUND");
    assert_eq!(
        arena
            .create_league(&op, "bob", "Chess", "", "chess", "knockout")
            .unwrap_err(),
        ArenaError::GameNotFound("chess".into())
    );
    assert_eq!(
        arena
            .create_league(&op, "bob", "Swiss", "", GAME, "swiss")
            .unwrap_err(),
        ArenaError::StyleNotFound("swiss".into())
    );
    assert_eq!(
        arena.create_user(&op, "bob", "again").unwrap_err().code(),
        "ARENA_USER_ALREADY_EXISTS"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn owner_edits_league() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");
    let (alice, alice_ticket) = player(&arena, "alice");
    let league = arena
        .create_league(&operator(&arena), "bob", "Friday", "weekly", GAME, "knockout")
        .unwrap();

    league.set_name(&bob, "Saturday").unwrap();
    league.set_description(&bob, "still weekly").unwrap();
    assert_eq!(league.info().name, "Saturday");
    assert_eq!(league.info().description, "still weekly");

    assert_eq!(
        league.set_name(&alice_ticket, "Mine").unwrap_err().code(),
        "ARENA_ACCESS_DENIED"
    );
    assert_eq!(
        league.add_player(&alice_ticket, &alice).unwrap_err().code(),
        "ARENA_ACCESS_DENIED"
    );

    league.add_player(&bob, &alice).unwrap();
    league.add_player(&bob, &alice).unwrap();
    assert_eq!(league.players(), vec![alice.clone()]);
    assert!(league.remove_player(&bob, &alice).unwrap());
    assert!(!league.remove_player(&bob, &alice).unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn restriction_hides_league_and_tournaments() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");
    let (alice, alice_ticket) = player(&arena, "alice");
    let guest = arena.guest_ticket();
    let league = arena
        .create_league(&operator(&arena), "bob", "Inner", "", GAME, "knockout")
        .unwrap();
    let t = league.create_tournament(&bob, "Cup", "").unwrap();
    assert!(!t.is_facilitated());

    // Initializing tournaments are only visible to their owner.
    assert!(league.tournament_infos(&guest).unwrap().is_empty());
    t.open_registration(&bob).unwrap();
    assert!(arena.league(&guest, league.id()).is_ok());
    assert_eq!(league.tournament_infos(&guest).unwrap().len(), 1);

    league.restrict(&bob).unwrap();
    assert!(league.is_restricted());
    assert_eq!(
        arena.league(&alice_ticket, league.id()).unwrap_err().code(),
        "ARENA_ACCESS_DENIED"
    );
    assert_eq!(
        arena.tournament(&guest, t.id()).unwrap_err().code(),
        "ARENA_ACCESS_DENIED"
    );
    assert!(league.tournament_infos(&alice_ticket).unwrap().is_empty());
    assert!(arena.league_infos(&alice_ticket).unwrap().is_empty());
    assert!(!arena
        .has_access(&alice_ticket, Scope::League(league.id()), AccessLevel::Read)
        .unwrap());

    // Tournaments created under restriction start facilitated.
    let facilitated = league.create_tournament(&bob, "Invitational", "").unwrap();
    assert!(facilitated.is_facilitated());

    league.add_player(&bob, &alice).unwrap();
    assert!(arena.league(&alice_ticket, league.id()).is_ok());
    assert_eq!(league.tournament_infos(&alice_ticket).unwrap().len(), 1);
    assert_eq!(league.tournament_infos(&bob).unwrap().len(), 2);
    assert!(arena
        .has_access(&alice_ticket, Scope::League(league.id()), AccessLevel::Play)
        .unwrap());
    assert!(!arena
        .has_access(&alice_ticket, Scope::League(league.id()), AccessLevel::Manage)
        .unwrap());

    league.unrestrict(&bob).unwrap();
    assert_eq!(arena.league_infos(&guest).unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn lookups_report_unknown_ids() {
    let arena = common::arena();
    let op = operator(&arena);
    let id = LeagueId::new();
    assert_eq!(
        arena.league(&op, id).unwrap_err(),
        ArenaError::LeagueNotFound(id)
    );
    assert_eq!(
        arena
            .has_access(&op, Scope::League(id), AccessLevel::Read)
            .unwrap_err()
            .code(),
        "ARENA_LEAGUE_NOT_FOUND"
    );
    assert!(arena.has_access(&op, Scope::Arena, AccessLevel::Manage).unwrap());
    assert!(!arena
        .has_access(&arena.guest_ticket(), Scope::Arena, AccessLevel::Manage)
        .unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_arena_fails_handles() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");
    let league = arena
        .create_league(&operator(&arena), "bob", "Gone", "", GAME, "knockout")
        .unwrap();
    drop(arena);
    assert_eq!(
        league.create_tournament(&bob, "Late", "").unwrap_err(),
        ArenaError::Closed
    );
}

/// Builds a view that only remembers how many seats the match has.
struct CardTable;

impl MatchViewFactory for CardTable {
    fn create_view(&self, _: &Ticket, info: &MatchInfo) -> Result<MatchView, ArenaError> {
        Ok(Arc::new(info.players.len()))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn view_factory_needs_a_valid_ticket() {
    common::init_tracing();
    let arena = Arena::builder()
        .with_config(common::config())
        .with_game(GAME, "Highest card wins", HighCard::duel(), Some(Arc::new(CardTable)))
        .build()
        .unwrap();
    let guest = arena.guest_ticket();

    assert_eq!(
        arena
            .view_factory(&Ticket::from_raw("forged"), GAME)
            .unwrap_err()
            .code(),
        "ARENA_INVALID_TICKET"
    );
    assert_eq!(
        arena.view_factory(&guest, "chess").unwrap_err(),
        ArenaError::GameNotFound("chess".into())
    );
    let plain = common::arena();
    assert!(plain
        .view_factory(&plain.guest_ticket(), GAME)
        .unwrap()
        .is_none());

    let factory = arena.view_factory(&guest, GAME).unwrap().unwrap();
    let (alice, _) = player(&arena, "alice");
    let snapshot = MatchInfo {
        id: MatchId::new(),
        players: vec![alice],
        state: MatchState::Connecting,
        ranks: None,
    };
    let view = factory.create_view(&guest, &snapshot).unwrap();
    assert_eq!(view.downcast_ref::<usize>(), Some(&1));
}
