//! Demo data for a fresh arena.
//!
//! Enabled with `[demo] enabled = true` (or `ARENA_SETUP_DEMO=1`). Demo
//! users log in with their login followed by `pass`, e.g. `alice` /
//! `alicepass`.

use crate::arena::Arena;
use crate::error::ArenaError;
use crate::style::KNOCKOUT;
use arena_auth::{AuthError, Ticket};
use arena_types::User;
use tracing::{info, warn};

/// Logins created by [`setup`].
pub const DEMO_USERS: [&str; 6] = ["alice", "joe", "mike", "mark", "mary", "bob"];

const LEAGUE_OWNER: &str = "bob";

/// Password of a demo user.
#[must_use]
pub fn demo_password(login: &str) -> String {
    format!("{login}pass")
}

/// Populates `arena` with users, leagues and tournaments.
///
/// | League | Restricted | Tournaments |
/// |--------|------------|-------------|
/// | Expert *game* League | yes (alice, joe) | "2003 Championship" launched, "2004 Championship" open |
/// | Novice *game* League | no | "Paper Cup" launched with five players |
///
/// # Errors
///
/// Any failure of the underlying arena operations.
pub fn setup(arena: &Arena) -> Result<(), ArenaError> {
    let Some(game) = demo_game(arena) else {
        warn!("Demo requested but no game is registered");
        return Ok(());
    };
    let op = arena.login(arena.operator().login(), &arena.config().operator.password)?;

    let mut users = Vec::with_capacity(DEMO_USERS.len());
    for login in DEMO_USERS {
        let user = match arena.find_user(login) {
            Some(user) => user,
            None => arena.create_user(&op, login, &demo_password(login))?,
        };
        users.push(user);
    }
    let ticket = |login: &str| arena.login(login, &demo_password(login));
    let user = |login: &str| find(&users, login).cloned();
    let bob = ticket(LEAGUE_OWNER)?;

    // Expert league: restricted, owner-run.
    let expert = arena.create_league(
        &op,
        LEAGUE_OWNER,
        &format!("Expert {game} League"),
        &format!("Invitation only {game} league"),
        &game,
        KNOCKOUT,
    )?;
    expert.restrict(&bob)?;
    expert.add_player(&bob, &user("alice")?)?;
    expert.add_player(&bob, &user("joe")?)?;

    let championship = expert.create_tournament(
        &bob,
        "2003 Championship",
        &format!("The {game} championship of 2003"),
    )?;
    championship.open_registration(&bob)?;
    for login in ["alice", "joe"] {
        championship.apply(&ticket(login)?)?;
        championship.accept_player(&bob, &user(login)?)?;
    }
    championship.close_registration(&bob)?;
    championship.launch(&bob)?;

    let next = expert.create_tournament(
        &bob,
        "2004 Championship",
        &format!("The {game} championship of 2004"),
    )?;
    next.open_registration(&bob)?;

    // Novice league: open, players run their own tournaments.
    let novice = arena.create_league(
        &op,
        LEAGUE_OWNER,
        &format!("Novice {game} League"),
        &format!("Open {game} league for newcomers"),
        &game,
        KNOCKOUT,
    )?;
    let cup = novice.create_tournament(&bob, "Paper Cup", "Ad hoc knockout")?;
    cup.open_registration(&bob)?;
    let cup_players: Vec<Ticket> = ["alice", "joe", "mike", "mark", "mary"]
        .into_iter()
        .map(ticket)
        .collect::<Result<_, _>>()?;
    for player in &cup_players {
        cup.apply(player)?;
    }
    cup.close_registration(&bob)?;
    cup.launch(&bob)?;

    info!(game = %game, users = users.len(), "Demo data ready");
    Ok(())
}

fn demo_game(arena: &Arena) -> Option<String> {
    let games = arena.game_infos();
    match &arena.config().demo.game {
        Some(name) => games.into_iter().find(|g| &g.name == name).map(|g| g.name),
        None => games.into_iter().next().map(|g| g.name),
    }
}

fn find<'a>(users: &'a [User], login: &str) -> Result<&'a User, ArenaError> {
    users.iter().find(|u| u.login() == login).ok_or_else(|| {
        AuthError::UserNotFound {
            login: login.to_string(),
        }
        .into()
    })
}
