//! Single-elimination brackets.

use super::{PlayerBounds, RoundPlan, RoundRecord, TournamentStyle};
use arena_types::{Ranks, User};

/// Knockout: match winners (and byes) advance until fewer than a match's
/// minimum remain.
///
/// Players are chunked into groups of `max` in order. A trailing group of
/// at least `min` still plays; a smaller one gets byes.
///
/// Ranks: the last round's match winners first, then the losers of each
/// round from the last to the first. Rounds without losers add no tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnockOut;

impl KnockOut {
    fn advancing(accepted: &[User], history: &[RoundRecord]) -> Vec<User> {
        match history.last() {
            None => accepted.to_vec(),
            Some(last) => {
                let mut players = last.match_winners();
                players.extend(last.byes.iter().cloned());
                players
            }
        }
    }
}

impl TournamentStyle for KnockOut {
    fn is_num_players_legal(&self, bounds: PlayerBounds, count: usize) -> bool {
        count >= bounds.min
    }

    fn plan_round(
        &self,
        bounds: PlayerBounds,
        accepted: &[User],
        history: &[RoundRecord],
    ) -> RoundPlan {
        let players = Self::advancing(accepted, history);
        let mut plan = RoundPlan::default();
        for chunk in players.chunks(bounds.max.max(1)) {
            if chunk.len() == bounds.max || chunk.len() >= bounds.min {
                plan.groups.push(chunk.to_vec());
            } else {
                plan.byes.extend(chunk.iter().cloned());
            }
        }
        plan
    }

    fn is_tournament_finished(&self, bounds: PlayerBounds, history: &[RoundRecord]) -> bool {
        match history.last() {
            None => false,
            Some(_) => Self::advancing(&[], history).len() < bounds.min,
        }
    }

    fn ranks(&self, history: &[RoundRecord]) -> Ranks {
        let Some(last) = history.last() else {
            return Ranks::new();
        };
        let mut ranks = vec![last.match_winners()];
        for round in history.iter().rev() {
            let losers = round.match_losers();
            if !losers.is_empty() {
                ranks.push(losers);
            }
        }
        ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_types::UserId;

    const DUEL: PlayerBounds = PlayerBounds { min: 2, max: 2 };

    fn players(n: usize) -> Vec<User> {
        (1..=n)
            .map(|i| User::new(UserId::new(), format!("p{i}")))
            .collect()
    }

    /// Plays a round where the first player of every group wins.
    fn play(plan: &RoundPlan) -> RoundRecord {
        RoundRecord {
            byes: plan.byes.clone(),
            match_ranks: plan
                .groups
                .iter()
                .map(|g| Some(vec![vec![g[0].clone()], g[1..].to_vec()]))
                .collect(),
            completed: true,
        }
    }

    #[test]
    fn legal_from_minimum() {
        assert!(!KnockOut.is_num_players_legal(DUEL, 1));
        assert!(KnockOut.is_num_players_legal(DUEL, 2));
        assert!(KnockOut.is_num_players_legal(DUEL, 17));
    }

    #[test]
    fn odd_player_gets_bye() {
        let ps = players(5);
        let plan = KnockOut.plan_round(DUEL, &ps, &[]);
        assert_eq!(plan.groups.len(), 2);
        assert_eq!(plan.byes, vec![ps[4].clone()]);
    }

    #[test]
    fn undersized_trailing_group_still_plays() {
        let bounds = PlayerBounds { min: 2, max: 4 };
        let ps = players(7);
        let plan = KnockOut.plan_round(bounds, &ps, &[]);
        assert_eq!(plan.groups, vec![ps[0..4].to_vec(), ps[4..7].to_vec()]);
        assert!(plan.byes.is_empty());
    }

    #[test]
    fn eight_player_bracket_ranks() {
        let ps = players(8);
        let mut history = Vec::new();
        while !KnockOut.is_tournament_finished(DUEL, &history) {
            let plan = KnockOut.plan_round(DUEL, &ps, &history);
            history.push(play(&plan));
        }
        assert_eq!(history.len(), 3);

        let ranks = KnockOut.ranks(&history);
        // p1 beats p2 in round 1, p3 in the semi, p5 in the final.
        assert_eq!(
            ranks,
            vec![
                vec![ps[0].clone()],
                vec![ps[4].clone()],
                vec![ps[2].clone(), ps[6].clone()],
                vec![ps[1].clone(), ps[3].clone(), ps[5].clone(), ps[7].clone()],
            ]
        );
    }

    #[test]
    fn byes_advance_into_next_round() {
        let ps = players(3);
        let first = KnockOut.plan_round(DUEL, &ps, &[]);
        let history = vec![play(&first)];
        assert!(!KnockOut.is_tournament_finished(DUEL, &history));

        let second = KnockOut.plan_round(DUEL, &ps, &history);
        assert_eq!(second.groups, vec![vec![ps[0].clone(), ps[2].clone()]]);
    }

    #[test]
    fn ranks_skip_rounds_without_losers() {
        let ps = players(2);
        let history = vec![
            RoundRecord {
                byes: Vec::new(),
                match_ranks: vec![Some(vec![vec![ps[0].clone()], vec![ps[1].clone()]])],
                completed: true,
            },
            RoundRecord {
                byes: Vec::new(),
                match_ranks: vec![Some(vec![vec![ps[0].clone()]])],
                completed: true,
            },
        ];
        assert_eq!(
            KnockOut.ranks(&history),
            vec![vec![ps[0].clone()], vec![ps[1].clone()]]
        );
    }
}
