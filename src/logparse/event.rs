use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Map category as recorded by the scrim tool. Closed set; anything else in
/// a `match_start` row is a parse failure, not free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    Assault,
    Control,
    Escort,
    Flashpoint,
    Hybrid,
    Push,
}

impl MapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Assault => "Assault",
            MapType::Control => "Control",
            MapType::Escort => "Escort",
            MapType::Flashpoint => "Flashpoint",
            MapType::Hybrid => "Hybrid",
            MapType::Push => "Push",
        }
    }
}

impl FromStr for MapType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "assault" => Ok(MapType::Assault),
            "control" => Ok(MapType::Control),
            "escort" => Ok(MapType::Escort),
            "flashpoint" => Ok(MapType::Flashpoint),
            "hybrid" => Ok(MapType::Hybrid),
            "push" => Ok(MapType::Push),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStart {
    pub map_name: String,
    pub map_type: MapType,
    pub team1_name: String,
    pub team2_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEnd {
    pub round_number: u32,
    pub team1_score: u32,
    pub team2_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEnd {
    pub round_number: u32,
    pub team1_score: u32,
    pub team2_score: u32,
}

/// Cumulative combat totals for one player on one hero. The tool re-emits
/// these throughout a map; the last row per (player, hero) is the final
/// value, not the maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    pub round_number: u32,
    pub team_name: String,
    pub player_name: String,
    pub hero_name: String,
    pub eliminations: u32,
    pub final_blows: u32,
    pub deaths: u32,
    pub damage_dealt: f64,
    pub healing_dealt: f64,
    pub time_played_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSpawn {
    pub round_number: u32,
    pub team_name: String,
    pub player_name: String,
    pub hero_name: String,
}

/// Payload advancement for the pushing side, as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadProgress {
    pub round_number: u32,
    pub team_name: String,
    pub capture_progress: f64,
}

/// One parsed log row. Kinds the recording tool emits beyond the ones
/// scoring needs are preserved verbatim under `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    MatchStart(MatchStart),
    MatchEnd(MatchEnd),
    RoundEnd(RoundEnd),
    PlayerStat(PlayerStat),
    HeroSpawn(HeroSpawn),
    PayloadProgress(PayloadProgress),
    Other { raw_kind: String, fields: Vec<String> },
}

impl Event {
    pub fn kind(&self) -> &str {
        match self {
            Event::MatchStart(_) => "match_start",
            Event::MatchEnd(_) => "match_end",
            Event::RoundEnd(_) => "round_end",
            Event::PlayerStat(_) => "player_stat",
            Event::HeroSpawn(_) => "hero_spawn",
            Event::PayloadProgress(_) => "payload_progress",
            Event::Other { raw_kind, .. } => raw_kind,
        }
    }
}

/// Per-kind view of a map's events, row order preserved within each kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsByKind {
    pub match_start: Vec<MatchStart>,
    pub match_end: Vec<MatchEnd>,
    pub round_end: Vec<RoundEnd>,
    pub player_stat: Vec<PlayerStat>,
    pub hero_spawn: Vec<HeroSpawn>,
    pub payload_progress: Vec<PayloadProgress>,
    pub other: Vec<(String, Vec<String>)>,
}

impl EventsByKind {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut by_kind = EventsByKind::default();
        for event in events {
            match event {
                Event::MatchStart(e) => by_kind.match_start.push(e.clone()),
                Event::MatchEnd(e) => by_kind.match_end.push(e.clone()),
                Event::RoundEnd(e) => by_kind.round_end.push(e.clone()),
                Event::PlayerStat(e) => by_kind.player_stat.push(e.clone()),
                Event::HeroSpawn(e) => by_kind.hero_spawn.push(e.clone()),
                Event::PayloadProgress(e) => by_kind.payload_progress.push(e.clone()),
                Event::Other { raw_kind, fields } => {
                    by_kind.other.push((raw_kind.clone(), fields.clone()))
                }
            }
        }
        by_kind
    }

    /// The single `match_start` the parser guarantees.
    pub fn match_start(&self) -> Option<&MatchStart> {
        self.match_start.first()
    }
}
