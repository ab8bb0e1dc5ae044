use serde::{Deserialize, Serialize};

/// One of the two sides recorded in a map's `match_start` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

/// Whether a reconciled score came straight from the recorder or from a
/// fallback heuristic. Consumers flag estimated results visually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTier {
    Authoritative,
    Estimated,
}

/// How "our" side of a map was chosen. `AssumedFirstListed` is the surfaced
/// ambiguity: neither the linked team name nor the opponent override matched
/// either recorded team name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SideAttribution {
    TeamNameMatch,
    OpponentOverrideMatch,
    AssumedFirstListed,
}

impl SideAttribution {
    pub fn is_assumed(&self) -> bool {
        matches!(self, SideAttribution::AssumedFirstListed)
    }
}

/// A per-side score with its provenance tier. The tier travels with the
/// scores structurally, so it can never be absent when they are set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconciledScore {
    pub team1: u32,
    pub team2: u32,
    pub tier: ResultTier,
}

impl ReconciledScore {
    pub fn winning_side(&self) -> Option<Side> {
        match self.team1.cmp(&self.team2) {
            std::cmp::Ordering::Greater => Some(Side::Team1),
            std::cmp::Ordering::Less => Some(Side::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn score_for(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.team1,
            Side::Team2 => self.team2,
        }
    }
}

/// Win/loss/draw from our side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapResult {
    Win,
    Loss,
    Draw,
}

/// Computed per-map result. Never persisted; derived from a map's events on
/// every read. A `None` score is a valid terminal state (aborted map).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outcome {
    pub score: Option<ReconciledScore>,
    pub our_side: Side,
    pub side_attribution: SideAttribution,
}

impl Outcome {
    pub fn result(&self) -> Option<MapResult> {
        let score = self.score?;
        Some(match score.winning_side() {
            Some(side) if side == self.our_side => MapResult::Win,
            Some(_) => MapResult::Loss,
            None => MapResult::Draw,
        })
    }

    pub fn our_score(&self) -> Option<u32> {
        self.score.map(|s| s.score_for(self.our_side))
    }

    pub fn their_score(&self) -> Option<u32> {
        self.score.map(|s| s.score_for(self.our_side.opposite()))
    }
}
