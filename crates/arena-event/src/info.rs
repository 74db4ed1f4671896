//! Serializable snapshots of arena objects.
//!
//! Infos are what clients and listeners see. They are taken under the
//! owning aggregate's lock and never change afterwards, so an event carries
//! the state at the moment it was fired.

use arena_types::{
    LeagueId, MatchId, MatchState, Ranks, TournamentId, TournamentState, User,
};
use serde::{Deserialize, Serialize};

/// A registered game module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    /// Registry name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Fewest players per match.
    pub min_players: usize,
    /// Most players per match.
    pub max_players: usize,
}

/// Snapshot of a league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueInfo {
    pub id: LeagueId,
    pub name: String,
    pub description: String,
    pub restricted: bool,
    pub owner: User,
    /// Name of the league's game (also its notification topic).
    pub game: String,
    /// Name of the league's tournament style.
    pub style: String,
}

/// Snapshot of a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub id: TournamentId,
    pub league: LeagueId,
    pub game: String,
    pub style: String,
    pub name: String,
    pub description: String,
    pub state: TournamentState,
    /// Accepted-player cap; `0` means unlimited.
    pub max_players: usize,
    pub facilitated: bool,
    pub interested: Vec<User>,
    pub accepted: Vec<User>,
    /// Number of rounds created so far.
    pub rounds: usize,
    /// Final standings, present once the tournament is `FINISHED`.
    pub ranks: Option<Ranks>,
}

/// Snapshot of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundInfo {
    pub tournament: TournamentId,
    pub league: LeagueId,
    /// Zero-based position within the tournament.
    pub index: usize,
    pub matches: Vec<MatchInfo>,
    pub byes: Vec<User>,
    pub completed: bool,
}

/// Snapshot of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub id: MatchId,
    pub players: Vec<User>,
    pub state: MatchState,
    /// Standings, present once the match is terminal.
    pub ranks: Option<Ranks>,
}

impl MatchInfo {
    /// Returns `true` if `user` plays in this match.
    #[must_use]
    pub fn has_player(&self, user: &User) -> bool {
        self.players.contains(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_types::UserId;

    #[test]
    fn match_info_has_player() {
        let alice = User::new(UserId::new(), "alice");
        let bob = User::new(UserId::new(), "bob");
        let info = MatchInfo {
            id: MatchId::new(),
            players: vec![alice.clone()],
            state: MatchState::Connecting,
            ranks: None,
        };
        assert!(info.has_player(&alice));
        assert!(!info.has_player(&bob));
    }

    #[test]
    fn match_info_json_shape() {
        let info = MatchInfo {
            id: MatchId::new(),
            players: Vec::new(),
            state: MatchState::Finished,
            ranks: Some(Vec::new()),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["state"], "FINISHED");
        assert!(json["ranks"].is_array());
    }
}
