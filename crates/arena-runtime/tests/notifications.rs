//! Event delivery to arena listeners and match listeners.

mod common;

use arena_event::{ArenaListener, MatchInfo, Move};
use arena_runtime::Arena;
use arena_types::{MatchState, TournamentState};
use common::{eventually, operator, player, wait_for, EventLog, Heard, Seat, GAME};
use tokio::sync::mpsc;

async fn wait_for_name(rx: &mut mpsc::UnboundedReceiver<Heard>, name: &str) {
    wait_for(rx, |e| matches!(e, Heard::Tournament(info) if info.name == name)).await;
}

async fn wait_for_stage(
    rx: &mut mpsc::UnboundedReceiver<(&'static str, MatchInfo)>,
    stage: &str,
) -> MatchInfo {
    wait_for(rx, |(s, _)| *s == stage).await.1
}

fn owner_league(arena: &Arena, style: &str) -> std::sync::Arc<arena_runtime::League> {
    arena
        .create_league(&operator(arena), "bob", "Club", "", GAME, style)
        .unwrap()
}

// =============================================================================
// Arena listeners
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn restricted_events_follow_the_roster_at_delivery() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");
    let (alice, alice_ticket) = player(&arena, "alice");
    let league = owner_league(&arena, "knockout");
    league.restrict(&bob).unwrap();

    let (bob_log, mut bob_heard) = EventLog::new();
    let (alice_log, mut alice_heard) = EventLog::new();
    arena.add_listener(&bob, GAME, bob_log).unwrap();
    arena.add_listener(&alice_ticket, GAME, alice_log).unwrap();

    let t = league.create_tournament(&bob, "Hidden", "").unwrap();
    t.open_registration(&bob).unwrap();
    t.set_name(&bob, "Barrier").unwrap();
    wait_for_name(&mut bob_heard, "Barrier").await;

    league.add_player(&bob, &alice).unwrap();
    t.set_name(&bob, "Visible").unwrap();

    let mut before = Vec::new();
    loop {
        let event = wait_for(&mut alice_heard, |_| true).await;
        if matches!(&event, Heard::Tournament(info) if info.name == "Visible") {
            break;
        }
        before.push(event);
    }
    assert!(
        !before
            .iter()
            .any(|e| matches!(e, Heard::TournamentCreated(_))),
        "alice heard {before:?}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn guest_hears_open_leagues() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");
    let guest = arena.guest_ticket();
    let (log, mut heard) = EventLog::new();
    arena.add_listener(&guest, GAME, log).unwrap();

    let league = owner_league(&arena, "knockout");
    league.set_name(&bob, "Open Club").unwrap();
    let event = wait_for(&mut heard, |e| {
        matches!(e, Heard::League(info) if info.name == "Open Club")
    })
    .await;
    let Heard::League(info) = event else {
        unreachable!()
    };
    assert!(!info.restricted);
    assert_eq!(arena.league_infos(&guest).unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_listener_is_unsubscribed() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");
    let (broken, _) = EventLog::broken();
    let (good, mut heard) = EventLog::new();
    let broken_id = broken.id();
    let good_id = good.id();
    arena.add_listener(&bob, GAME, broken).unwrap();
    arena.add_listener(&bob, GAME, good).unwrap();

    let league = owner_league(&arena, "knockout");
    let t = league.create_tournament(&bob, "First", "").unwrap();
    t.set_name(&bob, "Second").unwrap();
    wait_for_name(&mut heard, "Second").await;

    assert!(!arena.remove_listener(GAME, broken_id));
    assert!(arena.remove_listener(GAME, good_id));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_game_cannot_be_subscribed() {
    let arena = common::arena();
    let (log, _) = EventLog::new();
    let err = arena
        .add_listener(&arena.guest_ticket(), "chess", log)
        .unwrap_err();
    assert_eq!(err, arena_runtime::ArenaError::GameNotFound("chess".into()));
}

// =============================================================================
// Match listeners
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn crashed_player_forfeits() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");
    let (alice, alice_ticket) = player(&arena, "alice");
    let (joe, joe_ticket) = player(&arena, "joe");
    let (log, mut heard) = EventLog::new();
    arena.add_listener(&bob, GAME, log).unwrap();

    let league = owner_league(&arena, "single-match");
    let t = league.create_tournament(&bob, "Duel", "").unwrap();
    t.open_registration(&bob).unwrap();
    t.apply(&alice_ticket).unwrap();
    t.apply(&joe_ticket).unwrap();
    t.close_registration(&bob).unwrap();
    t.launch(&bob).unwrap();

    let match_id = t.current_round_info(&bob).unwrap().unwrap().matches[0].id;
    let remote = arena.remote_match(&alice_ticket, match_id).unwrap();
    let (crashing, _alice_rx) = Seat::crashing();
    let (steady, mut joe_rx) = Seat::new();
    let alice_match = remote.join(&alice_ticket, crashing).unwrap();
    remote.join(&joe_ticket, steady).unwrap();
    wait_for_stage(&mut joe_rx, "started").await;

    remote
        .play_move(&alice_match, Move::new(alice.clone(), serde_json::json!(13)))
        .unwrap();

    let ended = wait_for_stage(&mut joe_rx, "ended").await;
    assert_eq!(ended.state, MatchState::Finished);
    assert_eq!(ended.ranks, Some(vec![vec![joe.clone()], vec![alice.clone()]]));

    let relayed = wait_for(&mut heard, |e| {
        matches!(e, Heard::Match(info) if info.state == MatchState::Finished)
    })
    .await;
    let Heard::Match(info) = relayed else {
        unreachable!()
    };
    assert_eq!(info.id, match_id);

    eventually(|| t.state() == TournamentState::Finished).await;
    assert_eq!(t.ranks(), Some(vec![vec![joe], vec![alice]]));
}

#[tokio::test(flavor = "multi_thread")]
async fn spectator_receives_history_and_later_moves() {
    let arena = common::arena();
    let (_, bob) = player(&arena, "bob");
    let (alice, alice_ticket) = player(&arena, "alice");
    let (joe, joe_ticket) = player(&arena, "joe");
    let league = owner_league(&arena, "single-match");
    let t = league.create_tournament(&bob, "Watched", "").unwrap();
    t.open_registration(&bob).unwrap();
    t.apply(&alice_ticket).unwrap();
    t.apply(&joe_ticket).unwrap();
    t.close_registration(&bob).unwrap();
    t.launch(&bob).unwrap();

    let match_id = t.current_round_info(&bob).unwrap().unwrap().matches[0].id;
    let remote = arena.remote_match(&arena.guest_ticket(), match_id).unwrap();
    let (alice_seat, _a) = Seat::new();
    let (joe_seat, _j) = Seat::new();
    let alice_match = remote.join(&alice_ticket, alice_seat).unwrap();
    let joe_match = remote.join(&joe_ticket, joe_seat).unwrap();

    remote
        .play_move(&alice_match, Move::new(alice.clone(), serde_json::json!(3)))
        .unwrap();

    let (spectator, mut watched) = Seat::new();
    let history = remote.watch(spectator).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].player, alice);

    remote
        .play_move(&joe_match, Move::new(joe.clone(), serde_json::json!(4)))
        .unwrap();
    let ended = wait_for_stage(&mut watched, "ended").await;
    assert_eq!(ended.ranks, Some(vec![vec![joe], vec![alice]]));
}
