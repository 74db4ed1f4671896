//! Access policy.
//!
//! [`AccessPolicy`] is a pure decision: given a user, a target and a level,
//! allow or deny. It never looks at live aggregates; callers pass fact
//! snapshots ([`LeagueFacts`], [`TournamentFacts`]) taken under the owning
//! aggregate's lock.
//!
//! # Default Rules
//!
//! | Scope | Read | Play | Manage |
//! |-------|------|------|--------|
//! | Arena | everyone | everyone | operator |
//! | League | open league, or owner / operator / roster | same as Read | owner |
//! | Tournament | INITIALIZING: owner / operator; then league Read rule | not guest; open league, or accepted | owner; or Play if not facilitated |
//!
//! Tournament Read while INITIALIZING is stricter than Manage on purpose:
//! an unfacilitated tournament can be managed by its players before they
//! can see it.

use arena_types::{AccessLevel, TournamentState, User, UserId};

/// League data the policy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueFacts {
    /// The league owner.
    pub owner: UserId,
    /// Whether only roster players may see and play.
    pub restricted: bool,
    /// Roster players.
    pub roster: Vec<UserId>,
}

impl LeagueFacts {
    /// Returns `true` if `user` is on the roster.
    #[must_use]
    pub fn has_player(&self, user: UserId) -> bool {
        self.roster.contains(&user)
    }
}

/// Tournament data the policy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentFacts {
    /// Facts of the owning league.
    pub league: LeagueFacts,
    /// Current tournament state.
    pub state: TournamentState,
    /// Whether advancement and acceptance need the owner.
    pub facilitated: bool,
    /// Accepted players.
    pub accepted: Vec<UserId>,
}

impl TournamentFacts {
    /// Returns `true` if `user` was accepted.
    #[must_use]
    pub fn is_accepted(&self, user: UserId) -> bool {
        self.accepted.contains(&user)
    }
}

/// Access decision per scope.
///
/// Implementations must be side-effect free; the event notifier calls
/// them for every subscriber on every delivery.
///
/// # Example
///
/// ```
/// use arena_auth::{AccessPolicy, LeagueFacts, TournamentFacts};
/// use arena_types::{AccessLevel, User};
///
/// struct OpenDoor;
///
/// impl AccessPolicy for OpenDoor {
///     fn arena_access(&self, _: &User, _: AccessLevel) -> bool { true }
///     fn league_access(&self, _: &User, _: &LeagueFacts, _: AccessLevel) -> bool { true }
///     fn tournament_access(&self, _: &User, _: &TournamentFacts, _: AccessLevel) -> bool { true }
/// }
/// ```
pub trait AccessPolicy: Send + Sync {
    /// Decides access to the arena itself.
    fn arena_access(&self, user: &User, level: AccessLevel) -> bool;

    /// Decides access to a league.
    fn league_access(&self, user: &User, league: &LeagueFacts, level: AccessLevel) -> bool;

    /// Decides access to a tournament.
    fn tournament_access(
        &self,
        user: &User,
        tournament: &TournamentFacts,
        level: AccessLevel,
    ) -> bool;
}

/// The arena's standard rules (see the module table).
#[derive(Debug, Clone)]
pub struct DefaultAccessPolicy {
    operator: UserId,
    guest: UserId,
}

impl DefaultAccessPolicy {
    /// Creates the policy for an arena run by `operator`.
    #[must_use]
    pub fn new(operator: UserId, guest: UserId) -> Self {
        Self { operator, guest }
    }

    /// Returns the operator id.
    #[must_use]
    pub fn operator(&self) -> UserId {
        self.operator
    }

    fn can_see_league(&self, user: UserId, league: &LeagueFacts) -> bool {
        !league.restricted
            || league.has_player(user)
            || league.owner == user
            || self.operator == user
    }
}

impl AccessPolicy for DefaultAccessPolicy {
    fn arena_access(&self, user: &User, level: AccessLevel) -> bool {
        match level {
            AccessLevel::Manage => user.id() == self.operator,
            AccessLevel::Read | AccessLevel::Play => true,
        }
    }

    fn league_access(&self, user: &User, league: &LeagueFacts, level: AccessLevel) -> bool {
        match level {
            AccessLevel::Manage => user.id() == league.owner,
            AccessLevel::Read | AccessLevel::Play => self.can_see_league(user.id(), league),
        }
    }

    fn tournament_access(
        &self,
        user: &User,
        tournament: &TournamentFacts,
        level: AccessLevel,
    ) -> bool {
        let id = user.id();
        let league = &tournament.league;
        match level {
            AccessLevel::Manage => {
                id == league.owner
                    || (!tournament.facilitated
                        && self.tournament_access(user, tournament, AccessLevel::Play))
            }
            AccessLevel::Play => {
                if id == self.guest {
                    return false;
                }
                !league.restricted || tournament.is_accepted(id)
            }
            AccessLevel::Read => {
                if tournament.state == TournamentState::Initializing {
                    return id == league.owner || id == self.operator;
                }
                self.can_see_league(id, league)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Test Fixtures =====

    struct Cast {
        policy: DefaultAccessPolicy,
        operator: User,
        guest: User,
        owner: User,
        member: User,
        outsider: User,
    }

    fn cast() -> Cast {
        let operator = User::new(UserId::new(), "admin");
        let guest = User::new(UserId::builtin("guest"), "guest");
        Cast {
            policy: DefaultAccessPolicy::new(operator.id(), guest.id()),
            operator,
            guest,
            owner: User::new(UserId::new(), "bob"),
            member: User::new(UserId::new(), "alice"),
            outsider: User::new(UserId::new(), "mallory"),
        }
    }

    fn league(c: &Cast, restricted: bool) -> LeagueFacts {
        LeagueFacts {
            owner: c.owner.id(),
            restricted,
            roster: vec![c.member.id()],
        }
    }

    fn tournament(
        c: &Cast,
        restricted: bool,
        state: TournamentState,
        facilitated: bool,
        accepted: &[&User],
    ) -> TournamentFacts {
        TournamentFacts {
            league: league(c, restricted),
            state,
            facilitated,
            accepted: accepted.iter().map(|u| u.id()).collect(),
        }
    }

    // ===== Arena =====

    #[test]
    fn only_operator_manages_arena() {
        let c = cast();
        assert!(c.policy.arena_access(&c.operator, AccessLevel::Manage));
        assert!(!c.policy.arena_access(&c.owner, AccessLevel::Manage));
        assert!(c.policy.arena_access(&c.guest, AccessLevel::Read));
        assert!(c.policy.arena_access(&c.outsider, AccessLevel::Play));
    }

    // ===== League =====

    #[test]
    fn only_owner_manages_league() {
        let c = cast();
        let l = league(&c, false);
        assert!(c.policy.league_access(&c.owner, &l, AccessLevel::Manage));
        assert!(!c.policy.league_access(&c.operator, &l, AccessLevel::Manage));
        assert!(!c.policy.league_access(&c.member, &l, AccessLevel::Manage));
    }

    #[test]
    fn open_league_visible_to_all() {
        let c = cast();
        let l = league(&c, false);
        for user in [&c.guest, &c.outsider, &c.member] {
            assert!(c.policy.league_access(user, &l, AccessLevel::Read));
            assert!(c.policy.league_access(user, &l, AccessLevel::Play));
        }
    }

    #[test]
    fn restricted_league_visible_to_insiders_only() {
        let c = cast();
        let l = league(&c, true);
        for user in [&c.owner, &c.operator, &c.member] {
            assert!(c.policy.league_access(user, &l, AccessLevel::Read), "{user}");
        }
        assert!(!c.policy.league_access(&c.outsider, &l, AccessLevel::Read));
        assert!(!c.policy.league_access(&c.guest, &l, AccessLevel::Play));
    }

    // ===== Tournament =====

    #[test]
    fn guest_never_plays() {
        let c = cast();
        let t = tournament(&c, false, TournamentState::Registration, false, &[&c.guest]);
        assert!(!c.policy.tournament_access(&c.guest, &t, AccessLevel::Play));
        assert!(!c.policy.tournament_access(&c.guest, &t, AccessLevel::Manage));
    }

    #[test]
    fn restricted_tournament_play_needs_acceptance() {
        let c = cast();
        let t = tournament(&c, true, TournamentState::Registration, true, &[&c.member]);
        assert!(c.policy.tournament_access(&c.member, &t, AccessLevel::Play));
        assert!(!c.policy.tournament_access(&c.outsider, &t, AccessLevel::Play));
    }

    #[test]
    fn unfacilitated_manage_falls_back_to_play() {
        let c = cast();
        let t = tournament(&c, false, TournamentState::Registration, false, &[]);
        assert!(c.policy.tournament_access(&c.outsider, &t, AccessLevel::Manage));

        let facilitated = tournament(&c, false, TournamentState::Registration, true, &[]);
        assert!(!c.policy.tournament_access(&c.outsider, &facilitated, AccessLevel::Manage));
        assert!(c.policy.tournament_access(&c.owner, &facilitated, AccessLevel::Manage));
    }

    #[test]
    fn initializing_tournament_hidden_from_managers_that_are_not_owner() {
        let c = cast();
        let t = tournament(&c, false, TournamentState::Initializing, false, &[]);
        // May manage (unfacilitated, open league) yet may not read.
        assert!(c.policy.tournament_access(&c.outsider, &t, AccessLevel::Manage));
        assert!(!c.policy.tournament_access(&c.outsider, &t, AccessLevel::Read));
        assert!(c.policy.tournament_access(&c.owner, &t, AccessLevel::Read));
        assert!(c.policy.tournament_access(&c.operator, &t, AccessLevel::Read));
    }

    #[test]
    fn tournament_read_after_initialization_follows_league() {
        let c = cast();
        let open = tournament(&c, false, TournamentState::Playing, true, &[]);
        assert!(c.policy.tournament_access(&c.guest, &open, AccessLevel::Read));

        let closed = tournament(&c, true, TournamentState::Playing, true, &[]);
        assert!(c.policy.tournament_access(&c.member, &closed, AccessLevel::Read));
        assert!(!c.policy.tournament_access(&c.outsider, &closed, AccessLevel::Read));
    }
}
