//! Listener contracts.
//!
//! Listeners are remote callbacks. Every method may fail with a
//! [`RemoteError`]; callers treat a failure as the listener having gone
//! away and unsubscribe it.
//!
//! All callback methods default to a no-op so implementations only
//! override what they observe.

use crate::error::RemoteError;
use crate::info::{LeagueInfo, MatchInfo, RoundInfo, TournamentInfo};
use crate::moves::Move;
use arena_types::ListenerId;

/// Subscriber to arena-level changes of one game topic.
pub trait ArenaListener: Send + Sync {
    /// Stable identity used for de-duplication and removal.
    fn id(&self) -> ListenerId;

    fn league_info_changed(&self, _info: &LeagueInfo) -> Result<(), RemoteError> {
        Ok(())
    }

    fn tournament_created(&self, _info: &TournamentInfo) -> Result<(), RemoteError> {
        Ok(())
    }

    fn tournament_info_changed(&self, _info: &TournamentInfo) -> Result<(), RemoteError> {
        Ok(())
    }

    fn round_created(&self, _info: &RoundInfo) -> Result<(), RemoteError> {
        Ok(())
    }

    fn match_info_changed(&self, _info: &MatchInfo) -> Result<(), RemoteError> {
        Ok(())
    }
}

/// Subscriber to one match, either as player or spectator.
pub trait MatchListener: Send + Sync {
    /// Stable identity; a match addresses `leave` calls by it.
    fn id(&self) -> ListenerId;

    fn match_started(&self, _info: &MatchInfo) -> Result<(), RemoteError> {
        Ok(())
    }

    fn move_played(&self, _info: &MatchInfo, _mv: &Move) -> Result<(), RemoteError> {
        Ok(())
    }

    fn match_ended(&self, _info: &MatchInfo) -> Result<(), RemoteError> {
        Ok(())
    }

    fn match_terminated(&self, _info: &MatchInfo) -> Result<(), RemoteError> {
        Ok(())
    }
}
