//! One match, everyone at the table.

use super::{PlayerBounds, RoundPlan, RoundRecord, TournamentStyle};
use arena_types::{Ranks, User};

/// All accepted players meet in a single match; its ranks are the
/// tournament's.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleMatch;

impl TournamentStyle for SingleMatch {
    fn is_num_players_legal(&self, bounds: PlayerBounds, count: usize) -> bool {
        (bounds.min..=bounds.max).contains(&count)
    }

    fn plan_round(
        &self,
        _bounds: PlayerBounds,
        accepted: &[User],
        history: &[RoundRecord],
    ) -> RoundPlan {
        if !history.is_empty() {
            return RoundPlan::default();
        }
        RoundPlan {
            groups: vec![accepted.to_vec()],
            byes: Vec::new(),
        }
    }

    fn is_tournament_finished(&self, _bounds: PlayerBounds, history: &[RoundRecord]) -> bool {
        history.first().is_some_and(|round| round.completed)
    }

    fn ranks(&self, history: &[RoundRecord]) -> Ranks {
        history
            .first()
            .and_then(|round| round.match_ranks.first().cloned().flatten())
            .unwrap_or_default()
    }
}
