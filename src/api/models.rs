use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{
    HeroDetail, HeroSummary, MapTypeTally, OpponentView, PlayerDetail, PlayerSummary,
};
use crate::domain::{MapResult, Outcome, ResultTier, Side};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrimListItem {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub team_id: Option<i64>,
    pub opponent: Option<String>,
    pub map_count: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrimListResponse {
    pub scrims: Vec<ScrimListItem>,
}

/// Wire shape of a computed Outcome. `resultTier` is present exactly when
/// the scores are, and `sideAssumed` surfaces the first-listed-team guess.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeResponse {
    pub team1_score: Option<u32>,
    pub team2_score: Option<u32>,
    pub result_tier: Option<ResultTier>,
    pub winning_side: Option<Side>,
    pub our_side: Side,
    pub side_assumed: bool,
    pub result: Option<MapResult>,
}

impl From<Outcome> for OutcomeResponse {
    fn from(outcome: Outcome) -> Self {
        OutcomeResponse {
            team1_score: outcome.score.map(|s| s.team1),
            team2_score: outcome.score.map(|s| s.team2),
            result_tier: outcome.score.map(|s| s.tier),
            winning_side: outcome.score.and_then(|s| s.winning_side()),
            our_side: outcome.our_side,
            side_assumed: outcome.side_attribution.is_assumed(),
            result: outcome.result(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryResponse {
    pub team_name: String,
    pub raw_name: String,
    pub identity_id: Option<i64>,
    pub resolved_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDetailResponse {
    pub id: i64,
    pub position: i64,
    pub map_name: String,
    pub map_type: String,
    pub team1_name: String,
    pub team2_name: String,
    pub source_file: String,
    pub outcome: OutcomeResponse,
    pub roster: Vec<RosterEntryResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrimDetailResponse {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub team_id: Option<i64>,
    pub opponent: Option<String>,
    pub maps: Vec<MapDetailResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMap {
    pub id: i64,
    pub map_name: String,
    pub map_type: String,
    pub source_file: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub scrim_id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub maps: Vec<UploadedMap>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMapResponse {
    pub file_name: String,
    pub map_name: String,
    pub map_type: String,
    pub team1_name: String,
    pub team2_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub maps: Vec<PreviewMapResponse>,
    pub players_by_team: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentViewResponse {
    pub team_id: Option<i64>,
    pub range: String,
    #[serde(flatten)]
    pub view: OpponentView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTypeViewResponse {
    pub team_id: Option<i64>,
    pub range: String,
    pub map_stats: Vec<MapTypeTally>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerViewResponse {
    pub team_id: Option<i64>,
    pub range: String,
    pub players: Vec<PlayerSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetailResponse {
    pub range: String,
    #[serde(flatten)]
    pub detail: PlayerDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroViewResponse {
    pub range: String,
    pub heroes: Vec<HeroSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroDetailResponse {
    pub range: String,
    #[serde(flatten)]
    pub detail: HeroDetail,
}
