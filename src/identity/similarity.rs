use strsim::normalized_levenshtein;

/// A pair of catalog identities whose display names are similar enough to
/// be the same person under two spellings.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCandidate {
    pub first_id: i64,
    pub first_name: String,
    pub second_id: i64,
    pub second_name: String,
    pub similarity: f64,
}

/// Scans the whole identity catalog for likely duplicates. Quadratic over
/// the catalog, which is why this runs as an offline administrative job and
/// never inline with an upload.
pub fn find_duplicate_candidates(
    identities: &[(i64, String)],
    threshold: f64,
) -> Vec<DuplicateCandidate> {
    let mut candidates = Vec::new();

    for (i, (first_id, first_name)) in identities.iter().enumerate() {
        for (second_id, second_name) in &identities[i + 1..] {
            let similarity = normalized_levenshtein(
                &first_name.to_lowercase(),
                &second_name.to_lowercase(),
            );
            if similarity >= threshold {
                candidates.push(DuplicateCandidate {
                    first_id: *first_id,
                    first_name: first_name.clone(),
                    second_id: *second_id,
                    second_name: second_name.clone(),
                    similarity,
                });
            }
        }
    }

    candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<(i64, String)> {
        vec![
            (1, "Fearless".to_string()),
            (2, "Fearl3ss".to_string()),
            (3, "Windwalker".to_string()),
            (4, "fearless".to_string()),
        ]
    }

    #[test]
    fn finds_near_identical_names_sorted_by_similarity() {
        let candidates = find_duplicate_candidates(&catalog(), 0.8);

        assert_eq!(candidates.len(), 3);
        // Case-only difference is a perfect match after normalization.
        assert_eq!(candidates[0].first_id, 1);
        assert_eq!(candidates[0].second_id, 4);
        assert!((candidates[0].similarity - 1.0).abs() < f64::EPSILON);
        assert!(candidates.iter().all(|c| c.similarity >= 0.8));
    }

    #[test]
    fn unrelated_names_stay_below_threshold() {
        let candidates = find_duplicate_candidates(&catalog(), 0.8);
        assert!(candidates
            .iter()
            .all(|c| c.first_id != 3 && c.second_id != 3));
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        assert!(find_duplicate_candidates(&[], 0.5).is_empty());
    }
}
