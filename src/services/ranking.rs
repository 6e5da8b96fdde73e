// src/services/ranking.rs

//! Positional ranking of the results inside one competition.
//!
//! Ranks are positions in the score-sorted list, not score-tied: two equal
//! scores get consecutive ranks, and the earlier submission takes the better
//! one. Placement points depend on this, so keep it positional.

use std::collections::HashMap;

use crate::models::result::{CompetitionResult, RankedResult};

/// Sorts by score descending; ties keep completion order.
pub fn rank_results(results: &[CompetitionResult]) -> Vec<RankedResult> {
    let mut sorted: Vec<CompetitionResult> = results.to_vec();
    sorted.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, result)| RankedResult {
            rank: index + 1,
            result,
        })
        .collect()
}

/// Positional rank of every result id, grouped per competition.
pub fn ranks_by_result_id<'a, I>(results: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a CompetitionResult>,
{
    let mut by_competition: HashMap<&str, Vec<CompetitionResult>> = HashMap::new();
    for result in results {
        by_competition
            .entry(result.competition_id.as_str())
            .or_default()
            .push(result.clone());
    }

    by_competition
        .values()
        .flat_map(|group| rank_results(group))
        .map(|ranked| (ranked.result.id, ranked.rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::result_row;

    #[test]
    fn test_positional_ranks_with_tie() {
        let results = vec![
            result_row("c1", "late70", 70, 30),
            result_row("c1", "top", 90, 20),
            result_row("c1", "low", 50, 0),
            result_row("c1", "early70", 70, 10),
        ];

        let ranked = rank_results(&results);
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        let scores: Vec<i32> = ranked.iter().map(|r| r.result.score).collect();
        let users: Vec<&str> = ranked.iter().map(|r| r.result.user_id.as_str()).collect();

        assert_eq!(scores, vec![90, 70, 70, 50]);
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        // equal scores: the earlier submission ranks higher
        assert_eq!(users, vec!["top", "early70", "late70", "low"]);
    }

    #[test]
    fn test_empty_competition_has_empty_ranking() {
        assert!(rank_results(&[]).is_empty());
    }

    #[test]
    fn test_ranks_are_per_competition() {
        let results = vec![
            result_row("c1", "a", 10, 0),
            result_row("c1", "b", 5, 1),
            result_row("c2", "b", 1, 2),
        ];
        let ranks = ranks_by_result_id(&results);

        assert_eq!(ranks[&results[0].id], 1);
        assert_eq!(ranks[&results[1].id], 2);
        assert_eq!(ranks[&results[2].id], 1);
    }
}
