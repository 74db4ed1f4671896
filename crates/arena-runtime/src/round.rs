//! One stage of a tournament.
//!
//! A round owns the matches its tournament's style planned for it, plus
//! the players given a bye. Its match list never changes after creation;
//! only the last reported [`MatchInfo`] of each match does.
//!
//! [`Round::match_info_changed`] is the only way match state reaches the
//! tournament. Completion (every match FINISHED or TERMINATED) is detected
//! there and reported to the tournament exactly once.

use crate::error::ArenaError;
use crate::matches::RemoteMatch;
use crate::style::RoundRecord;
use crate::tournament::Tournament;
use arena_auth::Ticket;
use arena_event::{ArenaEvent, MatchInfo, RoundInfo};
use arena_types::{AccessLevel, LeagueId, MatchId, MatchState, Ranks, TournamentId, User};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct RoundState {
    latest: HashMap<MatchId, MatchInfo>,
    completed: bool,
}

/// The matches and byes of one tournament stage.
pub struct Round {
    tournament: TournamentId,
    league: LeagueId,
    index: usize,
    matches: Vec<Arc<dyn RemoteMatch>>,
    byes: Vec<User>,
    state: Mutex<RoundState>,
}

impl Round {
    pub(crate) fn new(
        tournament: TournamentId,
        league: LeagueId,
        index: usize,
        matches: Vec<Arc<dyn RemoteMatch>>,
        byes: Vec<User>,
    ) -> Self {
        let latest = matches.iter().map(|m| (m.id(), m.info())).collect();
        Self {
            tournament,
            league,
            index,
            matches,
            byes,
            state: Mutex::new(RoundState {
                latest,
                completed: false,
            }),
        }
    }

    /// Position within the tournament, starting at 0.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn matches(&self) -> &[Arc<dyn RemoteMatch>] {
        &self.matches
    }

    #[must_use]
    pub fn byes(&self) -> &[User] {
        &self.byes
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.lock().completed
    }

    #[must_use]
    pub fn info(&self) -> RoundInfo {
        let state = self.state.lock();
        RoundInfo {
            tournament: self.tournament,
            league: self.league,
            index: self.index,
            matches: self.ordered_infos(&state),
            byes: self.byes.clone(),
            completed: state.completed,
        }
    }

    /// Snapshot for the tournament style.
    pub(crate) fn record(&self) -> RoundRecord {
        let state = self.state.lock();
        RoundRecord {
            byes: self.byes.clone(),
            match_ranks: self
                .ordered_infos(&state)
                .into_iter()
                .map(|info| info.state.is_terminal().then_some(info.ranks).flatten())
                .collect(),
            completed: state.completed,
        }
    }

    /// Ranks of the matches that ended FINISHED.
    pub(crate) fn finished_ranks(&self) -> Vec<Ranks> {
        let state = self.state.lock();
        self.ordered_infos(&state)
            .into_iter()
            .filter(|info| info.state == MatchState::Finished)
            .filter_map(|info| info.ranks)
            .collect()
    }

    pub(crate) fn match_ids(&self) -> impl Iterator<Item = MatchId> + '_ {
        self.matches.iter().map(|m| m.id())
    }

    fn ordered_infos(&self, state: &RoundState) -> Vec<MatchInfo> {
        self.matches
            .iter()
            .filter_map(|m| state.latest.get(&m.id()).cloned())
            .collect()
    }

    /// Opens every match. Keeps going past failures and returns the first.
    pub(crate) fn open(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.broadcast("open", |m| m.open(ticket))
    }

    /// Terminates every match. Keeps going past failures and returns the
    /// first.
    pub(crate) fn terminate(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.broadcast("terminate", |m| m.terminate(ticket))
    }

    fn broadcast<F>(&self, operation: &'static str, f: F) -> Result<(), ArenaError>
    where
        F: Fn(&dyn RemoteMatch) -> Result<(), ArenaError>,
    {
        let mut first = None;
        for m in &self.matches {
            if let Err(e) = f(m.as_ref()) {
                warn!(
                    tournament = %self.tournament,
                    round = self.index,
                    match_id = %m.id(),
                    operation,
                    error = %e,
                    "Match rejected round broadcast"
                );
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Records a match report and advances the tournament when this
    /// report completes the round.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] unless `ticket` manages the tournament
    /// - [`ArenaError::MatchNotFound`] for a match outside this round
    pub fn match_info_changed(
        &self,
        tournament: &Arc<Tournament>,
        ticket: &Ticket,
        info: MatchInfo,
    ) -> Result<(), ArenaError> {
        if !tournament.has_access(ticket, AccessLevel::Manage)? {
            warn!(
                tournament = %self.tournament,
                round = self.index,
                match_id = %info.id,
                "Match report without manage access"
            );
            return Err(ArenaError::access_denied(
                "match report",
                AccessLevel::Manage,
                self.tournament,
            ));
        }

        let just_completed = {
            let mut state = self.state.lock();
            let Some(slot) = state.latest.get_mut(&info.id) else {
                return Err(ArenaError::MatchNotFound(info.id));
            };
            *slot = info.clone();
            let done = !state.completed && state.latest.values().all(|m| m.state.is_terminal());
            if done {
                state.completed = true;
            }
            done
        };
        debug!(
            tournament = %self.tournament,
            round = self.index,
            match_id = %info.id,
            state = %info.state,
            "Match report recorded"
        );

        tournament.notify(ArenaEvent::MatchInfoChanged {
            tournament: self.tournament,
            info,
        });

        if just_completed {
            info!(tournament = %self.tournament, round = self.index, "Round completed");
            tournament.round_completed(self.index);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Round")
            .field("tournament", &self.tournament)
            .field("index", &self.index)
            .field("matches", &self.matches.len())
            .field("byes", &self.byes.len())
            .finish()
    }
}
