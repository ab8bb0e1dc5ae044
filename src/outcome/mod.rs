//! Read-time score reconciliation for a single map.
//!
//! Three independent tier functions composed by one dispatcher; the first
//! tier that yields data wins. Absence of data at every tier is a valid
//! terminal state (aborted map), not an error.

use crate::domain::{Outcome, ReconciledScore, ResultTier, Side, SideAttribution};
use crate::logparse::event::{EventsByKind, MatchStart, PayloadProgress};
use crate::logparse::MapType;

/// Scrim-level context used to decide which recorded side is "ours".
#[derive(Debug, Clone, Copy, Default)]
pub struct SideContext<'a> {
    pub our_team_name: Option<&'a str>,
    pub opponent_override: Option<&'a str>,
}

/// Derives a map's Outcome from its persisted events.
pub fn reconcile(events: &EventsByKind, map_type: MapType, sides: SideContext<'_>) -> Outcome {
    let (our_side, side_attribution) = determine_side(events.match_start(), sides);

    let score = authoritative_score(events)
        .or_else(|| round_count_score(events))
        .or_else(|| progress_heuristic_score(events, map_type));

    Outcome {
        score,
        our_side,
        side_attribution,
    }
}

/// Tier 1: the recorder's own `match_end` row. Several can appear after a
/// re-upload glitch; the last one reflects the final state.
fn authoritative_score(events: &EventsByKind) -> Option<ReconciledScore> {
    events.match_end.last().map(|end| ReconciledScore {
        team1: end.team1_score,
        team2: end.team2_score,
        tier: ResultTier::Authoritative,
    })
}

/// Tier 2: cumulative scores from the `round_end` row with the highest round
/// number. A later row wins a tie on round number.
fn round_count_score(events: &EventsByKind) -> Option<ReconciledScore> {
    let mut best: Option<&crate::logparse::event::RoundEnd> = None;
    for round in &events.round_end {
        match best {
            Some(current) if current.round_number > round.round_number => {}
            _ => best = Some(round),
        }
    }
    best.map(|round| ReconciledScore {
        team1: round.team1_score,
        team2: round.team2_score,
        tier: ResultTier::Estimated,
    })
}

/// Tier 3, Escort maps only: whichever side pushed the payload further in a
/// round is awarded that round; equal maxima award neither. Final score is
/// the round-win count over the map's two rounds.
fn progress_heuristic_score(events: &EventsByKind, map_type: MapType) -> Option<ReconciledScore> {
    if map_type != MapType::Escort || events.payload_progress.is_empty() {
        return None;
    }
    let start = events.match_start()?;

    let mut team1 = 0;
    let mut team2 = 0;
    for round in [1, 2] {
        match round_push_winner(&events.payload_progress, round, start) {
            Some(Side::Team1) => team1 += 1,
            Some(Side::Team2) => team2 += 1,
            None => {}
        }
    }

    Some(ReconciledScore {
        team1,
        team2,
        tier: ResultTier::Estimated,
    })
}

fn round_push_winner(
    progress: &[PayloadProgress],
    round: u32,
    start: &MatchStart,
) -> Option<Side> {
    let mut max_team1: Option<f64> = None;
    let mut max_team2: Option<f64> = None;

    for row in progress.iter().filter(|row| row.round_number == round) {
        let slot = if row.team_name.eq_ignore_ascii_case(&start.team1_name) {
            &mut max_team1
        } else if row.team_name.eq_ignore_ascii_case(&start.team2_name) {
            &mut max_team2
        } else {
            continue;
        };
        *slot = Some(slot.map_or(row.capture_progress, |m: f64| m.max(row.capture_progress)));
    }

    match (max_team1, max_team2) {
        (Some(a), Some(b)) if a > b => Some(Side::Team1),
        (Some(a), Some(b)) if b > a => Some(Side::Team2),
        (Some(_), Some(_)) => None,
        (Some(_), None) => Some(Side::Team1),
        (None, Some(_)) => Some(Side::Team2),
        (None, None) => None,
    }
}

/// Matches the scrim's linked team name (or opponent override) against the
/// two recorded team names. When neither matches, the first-listed team is
/// used but the attribution records the assumption instead of hiding it.
fn determine_side(
    start: Option<&MatchStart>,
    sides: SideContext<'_>,
) -> (Side, SideAttribution) {
    let Some(start) = start else {
        return (Side::Team1, SideAttribution::AssumedFirstListed);
    };

    if let Some(ours) = sides.our_team_name {
        if ours.eq_ignore_ascii_case(&start.team1_name) {
            return (Side::Team1, SideAttribution::TeamNameMatch);
        }
        if ours.eq_ignore_ascii_case(&start.team2_name) {
            return (Side::Team2, SideAttribution::TeamNameMatch);
        }
    }

    if let Some(opponent) = sides.opponent_override {
        if opponent.eq_ignore_ascii_case(&start.team1_name) {
            return (Side::Team2, SideAttribution::OpponentOverrideMatch);
        }
        if opponent.eq_ignore_ascii_case(&start.team2_name) {
            return (Side::Team1, SideAttribution::OpponentOverrideMatch);
        }
    }

    (Side::Team1, SideAttribution::AssumedFirstListed)
}

/// The opponent's display name for a map: the explicit override when the
/// operator supplied one, otherwise the recorded name of the non-our side.
pub fn opponent_name(
    start: Option<&MatchStart>,
    our_side: Side,
    opponent_override: Option<&str>,
) -> String {
    if let Some(name) = opponent_override {
        return name.to_string();
    }
    match (start, our_side) {
        (Some(start), Side::Team1) => start.team2_name.clone(),
        (Some(start), Side::Team2) => start.team1_name.clone(),
        (None, _) => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::domain::MapResult;
    use crate::logparse::event::{MatchEnd, RoundEnd};
    use crate::logparse::parse;

    use super::*;

    fn events_from(lines: &[&str]) -> EventsByKind {
        parse(&lines.join("\n")).unwrap().by_kind()
    }

    fn ours(name: &'static str) -> SideContext<'static> {
        SideContext {
            our_team_name: Some(name),
            opponent_override: None,
        }
    }

    #[test]
    fn match_end_is_authoritative_over_round_ends() {
        let events = events_from(&[
            "match_start,Junkertown,Escort,Alpha,Bravo",
            "round_end,1,1,0",
            "round_end,2,1,1",
            "match_end,3,3,1",
        ]);
        let outcome = reconcile(&events, MapType::Escort, ours("Alpha"));
        assert_eq!(
            outcome.score,
            Some(ReconciledScore {
                team1: 3,
                team2: 1,
                tier: ResultTier::Authoritative,
            })
        );
        assert_eq!(outcome.result(), Some(MapResult::Win));
    }

    #[test]
    fn last_match_end_row_wins() {
        let mut events = events_from(&["match_start,Oasis,Control,Alpha,Bravo"]);
        events.match_end = vec![
            MatchEnd {
                round_number: 2,
                team1_score: 1,
                team2_score: 1,
            },
            MatchEnd {
                round_number: 3,
                team1_score: 1,
                team2_score: 2,
            },
        ];
        let outcome = reconcile(&events, MapType::Control, ours("Alpha"));
        assert_eq!(outcome.our_score(), Some(1));
        assert_eq!(outcome.their_score(), Some(2));
        assert_eq!(outcome.result(), Some(MapResult::Loss));
    }

    #[test]
    fn falls_back_to_highest_numbered_round_end() {
        let events = events_from(&[
            "match_start,Eichenwalde,Hybrid,Alpha,Bravo",
            "round_end,2,1,1",
            "round_end,3,2,1",
            "round_end,1,1,0",
        ]);
        let outcome = reconcile(&events, MapType::Hybrid, ours("Alpha"));
        assert_eq!(
            outcome.score,
            Some(ReconciledScore {
                team1: 2,
                team2: 1,
                tier: ResultTier::Estimated,
            })
        );
    }

    #[test]
    fn later_round_end_wins_round_number_tie() {
        let mut events = events_from(&["match_start,Eichenwalde,Hybrid,Alpha,Bravo"]);
        events.round_end = vec![
            RoundEnd {
                round_number: 2,
                team1_score: 1,
                team2_score: 1,
            },
            RoundEnd {
                round_number: 2,
                team1_score: 2,
                team2_score: 1,
            },
        ];
        let outcome = reconcile(&events, MapType::Hybrid, ours("Alpha"));
        assert_eq!(outcome.our_score(), Some(2));
    }

    #[test]
    fn escort_progress_awards_rounds_to_deeper_push() {
        let events = events_from(&[
            "match_start,Junkertown,Escort,Alpha,Bravo",
            "payload_progress,1,Alpha,66.2",
            "payload_progress,1,Bravo,71.0",
            "payload_progress,2,Alpha,54.0",
            "payload_progress,2,Bravo,33.3",
        ]);
        let outcome = reconcile(&events, MapType::Escort, ours("Alpha"));
        assert_eq!(
            outcome.score,
            Some(ReconciledScore {
                team1: 1,
                team2: 1,
                tier: ResultTier::Estimated,
            })
        );
        assert_eq!(outcome.result(), Some(MapResult::Draw));
    }

    #[test]
    fn escort_tie_awards_neither_side() {
        let events = events_from(&[
            "match_start,Junkertown,Escort,Alpha,Bravo",
            "payload_progress,1,Alpha,50.0",
            "payload_progress,1,Bravo,50.0",
            "payload_progress,2,Alpha,75.0",
            "payload_progress,2,Bravo,75.0",
        ]);
        let outcome = reconcile(&events, MapType::Escort, ours("Alpha"));
        assert_eq!(
            outcome.score,
            Some(ReconciledScore {
                team1: 0,
                team2: 0,
                tier: ResultTier::Estimated,
            })
        );
        assert_eq!(outcome.score.unwrap().winning_side(), None);
        assert_eq!(outcome.result(), Some(MapResult::Draw));
    }

    #[test]
    fn progress_heuristic_ignores_non_escort_maps() {
        let events = events_from(&[
            "match_start,Oasis,Control,Alpha,Bravo",
            "payload_progress,1,Alpha,50.0",
        ]);
        let outcome = reconcile(&events, MapType::Control, ours("Alpha"));
        assert_eq!(outcome.score, None);
    }

    #[test]
    fn no_data_reconciles_to_unset_scores() {
        let events = events_from(&[
            "match_start,Junkertown,Escort,Alpha,Bravo",
            "hero_spawn,1,Alpha,p1,Ana",
        ]);
        let outcome = reconcile(&events, MapType::Escort, ours("Alpha"));
        assert_eq!(outcome.score, None);
        assert_eq!(outcome.result(), None);
        assert_eq!(outcome.our_score(), None);
    }

    #[test]
    fn side_matches_linked_team_name() {
        let events = events_from(&[
            "match_start,Oasis,Control,Alpha,Bravo",
            "match_end,2,0,2",
        ]);
        let outcome = reconcile(&events, MapType::Control, ours("bravo"));
        assert_eq!(outcome.our_side, Side::Team2);
        assert_eq!(outcome.side_attribution, SideAttribution::TeamNameMatch);
        assert_eq!(outcome.result(), Some(MapResult::Win));
    }

    #[test]
    fn side_matches_opponent_override() {
        let events = events_from(&[
            "match_start,Oasis,Control,Alpha,Bravo",
            "match_end,2,0,2",
        ]);
        let sides = SideContext {
            our_team_name: Some("Our Roster"),
            opponent_override: Some("Alpha"),
        };
        let outcome = reconcile(&events, MapType::Control, sides);
        assert_eq!(outcome.our_side, Side::Team2);
        assert_eq!(
            outcome.side_attribution,
            SideAttribution::OpponentOverrideMatch
        );
    }

    #[test]
    fn unmatched_side_is_flagged_as_assumed() {
        let events = events_from(&[
            "match_start,Oasis,Control,Alpha,Bravo",
            "match_end,2,2,0",
        ]);
        let outcome = reconcile(&events, MapType::Control, ours("Charlie"));
        assert_eq!(outcome.our_side, Side::Team1);
        assert!(outcome.side_attribution.is_assumed());
    }

    #[test]
    fn opponent_name_prefers_override() {
        let events = events_from(&["match_start,Oasis,Control,Alpha,Bravo"]);
        let start = events.match_start();
        assert_eq!(
            opponent_name(start, Side::Team1, Some("Team Liquid Mix")),
            "Team Liquid Mix"
        );
        assert_eq!(opponent_name(start, Side::Team1, None), "Bravo");
        assert_eq!(opponent_name(start, Side::Team2, None), "Alpha");
    }
}
