//! Match ranking: sort scored candidates and keep the top N.

use serde::{Deserialize, Serialize};

/// A scored candidate: an identifier paired with its distance to the
/// target. Smaller means more similar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub distance: f32,
}

impl Match {
    #[must_use]
    pub fn new(id: impl Into<String>, distance: f32) -> Self {
        Self {
            id: id.into(),
            distance,
        }
    }
}

/// Sort matches by distance and truncate to the first `top_n`.
///
/// Ascending by default (most similar first); `descending` reverses the
/// order. The sort is stable, so ties keep their input order. Fewer than
/// `top_n` scored candidates is not an error; all of them are returned.
#[must_use]
pub fn top_matches(mut matches: Vec<Match>, top_n: usize, descending: bool) -> Vec<Match> {
    matches.sort_by(|a, b| {
        let ordering = a
            .distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    matches.truncate(top_n);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Match> {
        vec![
            Match::new("a", 0.9),
            Match::new("b", 0.1),
            Match::new("c", 0.5),
        ]
    }

    #[test]
    fn test_top_matches_ascending() {
        let top = top_matches(sample(), 2, false);
        assert_eq!(top, vec![Match::new("b", 0.1), Match::new("c", 0.5)]);
    }

    #[test]
    fn test_top_matches_descending() {
        let top = top_matches(sample(), 2, true);
        assert_eq!(top, vec![Match::new("a", 0.9), Match::new("c", 0.5)]);
    }

    #[test]
    fn test_top_matches_fewer_than_requested() {
        let top = top_matches(sample(), 10, false);
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn test_top_matches_ties_keep_input_order() {
        let matches = vec![
            Match::new("first", 0.5),
            Match::new("second", 0.5),
            Match::new("third", 0.2),
        ];
        let top = top_matches(matches, 3, false);
        assert_eq!(top[0].id, "third");
        assert_eq!(top[1].id, "first");
        assert_eq!(top[2].id, "second");
    }
}
