use std::collections::HashSet;
use std::str::FromStr;

use crate::errors::ParseError;

use super::event::{
    Event, EventsByKind, HeroSpawn, MapType, MatchEnd, MatchStart, PayloadProgress, PlayerStat,
    RoundEnd,
};

/// A distinct (team, player) pair harvested from stat and spawn rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamPlayer {
    pub team_name: String,
    pub player_name: String,
}

/// Result of parsing one log file: the ordered event sequence plus the
/// roster harvested in the same pass (so large files are not re-scanned for
/// identity resolution).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLog {
    pub events: Vec<Event>,
    pub roster: Vec<TeamPlayer>,
}

impl ParsedLog {
    pub fn by_kind(&self) -> EventsByKind {
        EventsByKind::from_events(&self.events)
    }

    /// The single `match_start` row `parse` guarantees.
    pub fn match_start(&self) -> &MatchStart {
        self.events
            .iter()
            .find_map(|event| match event {
                Event::MatchStart(start) => Some(start),
                _ => None,
            })
            .expect("parse() rejects files without match_start")
    }
}

/// Parses raw log text into typed events. Rows are comma-separated with the
/// event kind first and a fixed, kind-specific field layout after it. A row
/// with the wrong arity or an unparseable field fails the whole file; kinds
/// the tool emits beyond the scored set are preserved as `Event::Other`.
pub fn parse(raw_text: &str) -> Result<ParsedLog, ParseError> {
    let mut events = Vec::new();
    let mut roster = Vec::new();
    let mut seen_players: HashSet<TeamPlayer> = HashSet::new();
    let mut match_start_seen = false;

    for (index, raw_line) in raw_text.lines().enumerate() {
        let line_number = index + 1;
        let line = strip_clock_prefix(raw_line.trim());
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(',').map(|field| unquote(field.trim()));
        let kind = fields
            .next()
            .ok_or(ParseError::MissingKind { line: line_number })?;
        if kind.is_empty() {
            return Err(ParseError::MissingKind { line: line_number });
        }
        let fields: Vec<String> = fields.collect();

        let event = parse_row(line_number, &kind, fields)?;

        match &event {
            Event::MatchStart(_) => {
                if match_start_seen {
                    return Err(ParseError::DuplicateMatchStart { line: line_number });
                }
                match_start_seen = true;
            }
            Event::PlayerStat(stat) => {
                harvest_player(
                    &mut roster,
                    &mut seen_players,
                    &stat.team_name,
                    &stat.player_name,
                );
            }
            Event::HeroSpawn(spawn) => {
                harvest_player(
                    &mut roster,
                    &mut seen_players,
                    &spawn.team_name,
                    &spawn.player_name,
                );
            }
            _ => {}
        }

        events.push(event);
    }

    if !match_start_seen {
        return Err(ParseError::MissingMatchStart);
    }

    Ok(ParsedLog { events, roster })
}

fn parse_row(line: usize, kind: &str, fields: Vec<String>) -> Result<Event, ParseError> {
    match kind {
        "match_start" => {
            let fields = expect_arity(line, kind, fields, 4)?;
            let map_type = MapType::from_str(&fields[1]).map_err(|_| ParseError::UnknownMapType {
                line,
                value: fields[1].clone(),
            })?;
            Ok(Event::MatchStart(MatchStart {
                map_name: fields[0].clone(),
                map_type,
                team1_name: fields[2].clone(),
                team2_name: fields[3].clone(),
            }))
        }
        "match_end" => {
            let fields = expect_arity(line, kind, fields, 3)?;
            Ok(Event::MatchEnd(MatchEnd {
                round_number: parse_u32(line, kind, "round_number", &fields[0])?,
                team1_score: parse_u32(line, kind, "team1_score", &fields[1])?,
                team2_score: parse_u32(line, kind, "team2_score", &fields[2])?,
            }))
        }
        "round_end" => {
            let fields = expect_arity(line, kind, fields, 3)?;
            Ok(Event::RoundEnd(RoundEnd {
                round_number: parse_u32(line, kind, "round_number", &fields[0])?,
                team1_score: parse_u32(line, kind, "team1_score", &fields[1])?,
                team2_score: parse_u32(line, kind, "team2_score", &fields[2])?,
            }))
        }
        "player_stat" => {
            let fields = expect_arity(line, kind, fields, 10)?;
            Ok(Event::PlayerStat(PlayerStat {
                round_number: parse_u32(line, kind, "round_number", &fields[0])?,
                team_name: fields[1].clone(),
                player_name: fields[2].clone(),
                hero_name: fields[3].clone(),
                eliminations: parse_u32(line, kind, "eliminations", &fields[4])?,
                final_blows: parse_u32(line, kind, "final_blows", &fields[5])?,
                deaths: parse_u32(line, kind, "deaths", &fields[6])?,
                damage_dealt: parse_f64(line, kind, "damage_dealt", &fields[7])?,
                healing_dealt: parse_f64(line, kind, "healing_dealt", &fields[8])?,
                time_played_secs: parse_f64(line, kind, "time_played_secs", &fields[9])?,
            }))
        }
        "hero_spawn" => {
            let fields = expect_arity(line, kind, fields, 4)?;
            Ok(Event::HeroSpawn(HeroSpawn {
                round_number: parse_u32(line, kind, "round_number", &fields[0])?,
                team_name: fields[1].clone(),
                player_name: fields[2].clone(),
                hero_name: fields[3].clone(),
            }))
        }
        "payload_progress" => {
            let fields = expect_arity(line, kind, fields, 3)?;
            Ok(Event::PayloadProgress(PayloadProgress {
                round_number: parse_u32(line, kind, "round_number", &fields[0])?,
                team_name: fields[1].clone(),
                capture_progress: parse_f64(line, kind, "capture_progress", &fields[2])?,
            }))
        }
        _ => Ok(Event::Other {
            raw_kind: kind.to_string(),
            fields,
        }),
    }
}

fn expect_arity(
    line: usize,
    kind: &str,
    fields: Vec<String>,
    expected: usize,
) -> Result<Vec<String>, ParseError> {
    if fields.len() == expected {
        Ok(fields)
    } else {
        Err(ParseError::WrongArity {
            line,
            kind: kind.to_string(),
            expected,
            got: fields.len(),
        })
    }
}

fn parse_u32(line: usize, kind: &str, field: &'static str, value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidField {
        line,
        kind: kind.to_string(),
        field,
        value: value.to_string(),
    })
}

fn parse_f64(line: usize, kind: &str, field: &'static str, value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidField {
        line,
        kind: kind.to_string(),
        field,
        value: value.to_string(),
    })
}

fn harvest_player(
    roster: &mut Vec<TeamPlayer>,
    seen: &mut HashSet<TeamPlayer>,
    team_name: &str,
    player_name: &str,
) {
    let pair = TeamPlayer {
        team_name: team_name.to_string(),
        player_name: player_name.to_string(),
    };
    if seen.insert(pair.clone()) {
        roster.push(pair);
    }
}

/// Strips the optional leading `[mm:ss]` match-clock prefix some recorder
/// configurations emit.
pub(crate) fn strip_clock_prefix(line: &str) -> &str {
    let Some(rest) = line.strip_prefix('[') else {
        return line;
    };
    let Some(close) = rest.find(']') else {
        return line;
    };
    let inner = &rest[..close];
    let looks_like_clock = !inner.is_empty()
        && inner
            .chars()
            .all(|c| c.is_ascii_digit() || c == ':' || c == '.');
    if looks_like_clock {
        rest[close + 1..].trim_start()
    } else {
        line
    }
}

fn unquote(value: &str) -> String {
    value.trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_log() -> String {
        [
            "match_start,Junkertown,Escort,Alpha,Bravo",
            "hero_spawn,1,Alpha,ana_player,Ana",
            "player_stat,1,Alpha,ana_player,Ana,3,1,2,1204.5,2400.0,312.0",
            "player_stat,1,Bravo,dps_player,Genji,5,4,1,2210.0,0.0,301.5",
            "payload_progress,1,Alpha,75.5",
            "round_end,1,1,0",
            "player_stat,2,Alpha,ana_player,Ana,7,2,4,2408.1,5100.9,640.0",
            "match_end,2,2,1",
        ]
        .join("\n")
    }

    #[test]
    fn parses_all_kinds_in_order() {
        let parsed = parse(&sample_log()).unwrap();
        assert_eq!(parsed.events.len(), 8);

        let by_kind = parsed.by_kind();
        assert_eq!(by_kind.match_start.len(), 1);
        assert_eq!(by_kind.player_stat.len(), 3);
        assert_eq!(by_kind.round_end.len(), 1);
        assert_eq!(by_kind.match_end.len(), 1);

        let start = parsed.match_start();
        assert_eq!(start.map_name, "Junkertown");
        assert_eq!(start.map_type, MapType::Escort);
        assert_eq!(start.team1_name, "Alpha");
        assert_eq!(start.team2_name, "Bravo");
    }

    #[test]
    fn preserves_row_order_within_a_kind() {
        let parsed = parse(&sample_log()).unwrap();
        let stats = parsed.by_kind().player_stat;
        let ana_rounds: Vec<u32> = stats
            .iter()
            .filter(|s| s.player_name == "ana_player")
            .map(|s| s.round_number)
            .collect();
        assert_eq!(ana_rounds, vec![1, 2]);
    }

    #[test]
    fn harvests_distinct_roster_pairs() {
        let parsed = parse(&sample_log()).unwrap();
        assert_eq!(
            parsed.roster,
            vec![
                TeamPlayer {
                    team_name: "Alpha".into(),
                    player_name: "ana_player".into(),
                },
                TeamPlayer {
                    team_name: "Bravo".into(),
                    player_name: "dps_player".into(),
                },
            ]
        );
    }

    #[test]
    fn strips_clock_prefix_and_quotes() {
        let text = "[12:05] match_start,\"King's Row\",Hybrid,Alpha,Bravo";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.match_start().map_name, "King's Row");
    }

    #[test]
    fn fails_on_wrong_arity_naming_line_and_kind() {
        let text = "match_start,Junkertown,Escort,Alpha,Bravo\nround_end,1,1";
        let err = parse(text).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongArity {
                line: 2,
                kind: "round_end".into(),
                expected: 3,
                got: 2,
            }
        );
    }

    #[test]
    fn fails_on_unparseable_field() {
        let text = "match_start,Junkertown,Escort,Alpha,Bravo\nround_end,one,1,0";
        let err = parse(text).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidField {
                line: 2,
                kind: "round_end".into(),
                field: "round_number",
                value: "one".into(),
            }
        );
    }

    #[test]
    fn fails_without_match_start() {
        let err = parse("round_end,1,1,0").unwrap_err();
        assert_eq!(err, ParseError::MissingMatchStart);
    }

    #[test]
    fn fails_on_duplicate_match_start() {
        let text = "match_start,Junkertown,Escort,Alpha,Bravo\nmatch_start,Oasis,Control,Alpha,Bravo";
        let err = parse(text).unwrap_err();
        assert_eq!(err, ParseError::DuplicateMatchStart { line: 2 });
    }

    #[test]
    fn rejects_unknown_map_type() {
        let err = parse("match_start,Somewhere,Deathmatch,Alpha,Bravo").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownMapType {
                line: 1,
                value: "Deathmatch".into(),
            }
        );
    }

    #[test]
    fn preserves_unknown_kinds() {
        let text = "match_start,Junkertown,Escort,Alpha,Bravo\nserver_info,eu-west,64tick";
        let parsed = parse(text).unwrap();
        assert_eq!(
            parsed.events[1],
            Event::Other {
                raw_kind: "server_info".into(),
                fields: vec!["eu-west".into(), "64tick".into()],
            }
        );
    }
}
