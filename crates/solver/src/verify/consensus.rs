//! Vote aggregation.
//!
//! Tallies are kept per option in ascending index order and scanned once;
//! the first option to reach a strictly higher tally wins, so a tie goes to
//! the lowest option index. `has_tie` tells callers when that happened.

use quizrag_core::{AgentVote, VerificationResult};
use std::collections::BTreeMap;

/// Vote count per option index, ascending.
pub fn tally(votes: &[AgentVote]) -> BTreeMap<u8, usize> {
    let mut counts = BTreeMap::new();
    for vote in votes {
        *counts.entry(vote.vote_index).or_insert(0) += 1;
    }
    counts
}

/// Aggregate jury votes into a verdict.
pub fn aggregate(votes: Vec<AgentVote>) -> VerificationResult {
    let counts = tally(&votes);

    let mut consensus_index = None;
    let mut max_votes = 0;
    for (&index, &count) in &counts {
        if count > max_votes {
            max_votes = count;
            consensus_index = Some(index);
        }
    }

    let has_tie = counts.values().filter(|&&count| count == max_votes).count() > 1;

    let agreement_percentage = if votes.is_empty() {
        0.0
    } else {
        max_votes as f64 / votes.len() as f64 * 100.0
    };

    VerificationResult {
        votes,
        consensus_index,
        agreement_percentage,
        has_tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(indices: &[u8]) -> Vec<AgentVote> {
        indices
            .iter()
            .enumerate()
            .map(|(i, &index)| AgentVote {
                agent_name: format!("Expert {}", i + 1),
                role: "expert".to_string(),
                vote_index: index,
                short_reason: "reason".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_unanimous() {
        let result = aggregate(votes(&[2, 2, 2]));
        assert_eq!(result.consensus_index, Some(2));
        assert_eq!(result.agreement_percentage, 100.0);
        assert!(!result.has_tie);
        assert!(result.is_unanimous());
    }

    #[test]
    fn test_majority() {
        let result = aggregate(votes(&[1, 2, 2]));
        assert_eq!(result.consensus_index, Some(2));
        assert!((result.agreement_percentage - 66.67).abs() < 0.01);
        assert!(!result.has_tie);
    }

    #[test]
    fn test_three_way_tie_goes_to_lowest_index() {
        let result = aggregate(votes(&[3, 1, 2]));
        assert_eq!(result.consensus_index, Some(1));
        assert!(result.has_tie);
        assert!((result.agreement_percentage - 33.33).abs() < 0.01);
    }

    #[test]
    fn test_two_way_tie() {
        let result = aggregate(votes(&[4, 3, 4, 3]));
        assert_eq!(result.consensus_index, Some(3));
        assert!(result.has_tie);
        assert_eq!(result.agreement_percentage, 50.0);
    }

    #[test]
    fn test_no_votes() {
        let result = aggregate(Vec::new());
        assert_eq!(result.consensus_index, None);
        assert_eq!(result.agreement_percentage, 0.0);
        assert!(!result.has_tie);
    }

    #[test]
    fn test_tally_order() {
        let counts = tally(&votes(&[4, 1, 4]));
        assert_eq!(counts.into_iter().collect::<Vec<_>>(), vec![(1, 1), (4, 2)]);
    }
}
