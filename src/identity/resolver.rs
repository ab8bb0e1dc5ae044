use std::collections::HashMap;

use crate::logparse::TeamPlayer;

/// Operator-supplied raw in-game name → identity id mapping, collected once
/// per batch via the preview step.
pub type IdentityMapping = HashMap<String, i64>;

/// One roster row for a map: the raw name as the recorder saw it, the team
/// name it appeared under, and the canonical identity when the operator
/// mapped one. Unresolved names are kept verbatim and aggregate under their
/// literal spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub team_name: String,
    pub raw_name: String,
    pub identity_id: Option<i64>,
}

/// Applies the explicit mapping to a harvested roster. No fuzzy matching
/// happens here — duplicate detection over the identity catalog is a
/// separate offline scan, never part of an upload.
pub fn resolve(mapping: &IdentityMapping, roster: &[TeamPlayer]) -> Vec<RosterEntry> {
    roster
        .iter()
        .map(|pair| RosterEntry {
            team_name: pair.team_name.clone(),
            raw_name: pair.player_name.clone(),
            identity_id: mapping.get(&pair.player_name).copied(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pair(team: &str, player: &str) -> TeamPlayer {
        TeamPlayer {
            team_name: team.to_string(),
            player_name: player.to_string(),
        }
    }

    #[test]
    fn applies_mapping_and_keeps_unmapped_names_raw() {
        let mapping: IdentityMapping = [("Smurf123".to_string(), 7)].into_iter().collect();
        let roster = vec![pair("Alpha", "Smurf123"), pair("Bravo", "EnemyDps")];

        let resolved = resolve(&mapping, &roster);
        assert_eq!(
            resolved,
            vec![
                RosterEntry {
                    team_name: "Alpha".into(),
                    raw_name: "Smurf123".into(),
                    identity_id: Some(7),
                },
                RosterEntry {
                    team_name: "Bravo".into(),
                    raw_name: "EnemyDps".into(),
                    identity_id: None,
                },
            ]
        );
    }

    #[test]
    fn mapping_is_exact_on_raw_spelling() {
        let mapping: IdentityMapping = [("smurf123".to_string(), 7)].into_iter().collect();
        let resolved = resolve(&mapping, &[pair("Alpha", "Smurf123")]);
        assert_eq!(resolved[0].identity_id, None);
    }
}
