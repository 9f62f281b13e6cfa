//! Scorer - Ranks a candidate name against a query
//!
//! Three tiers, checked in order:
//! 1. case-insensitive substring containment, keyed by first offset
//! 2. ordered subsequence, keyed by similarity
//! 3. similarity ratio at or above the threshold, keyed by similarity
//!
//! Tiers 2 and 3 share one rank band. The similarity ratio is the
//! matching-blocks ratio `2 * M / (len(a) + len(b))`, where M is the total size
//! of the blocks found by repeatedly taking the longest common run and
//! recursing on both sides of it (earliest run wins ties). No junk heuristics
//! are applied.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::config::DEFAULT_THRESHOLD;

/// Sort key for a match; lower sorts first
#[derive(Debug, Clone, Copy)]
pub enum RankKey {
    /// Query contained in the name at `offset` (characters)
    Contained { offset: usize },
    /// Subsequence or similarity match
    Loose { similarity: f64 },
}

impl RankKey {
    #[allow(dead_code)]
    pub fn tier(&self) -> u8 {
        match self {
            RankKey::Contained { .. } => 0,
            RankKey::Loose { .. } => 1,
        }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RankKey::Contained { offset: a }, RankKey::Contained { offset: b }) => a.cmp(b),
            (RankKey::Contained { .. }, RankKey::Loose { .. }) => Ordering::Less,
            (RankKey::Loose { .. }, RankKey::Contained { .. }) => Ordering::Greater,
            (RankKey::Loose { similarity: a }, RankKey::Loose { similarity: b }) => b.total_cmp(a),
        }
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

/// How a candidate matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Empty query
    All,
    Substring,
    Subsequence,
    Similar,
}

/// A successful match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    #[allow(dead_code)]
    pub kind: MatchKind,
    pub rank: RankKey,
}

/// Stateless query/name matcher
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    threshold: f64,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Scorer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Score `candidate` against `query`; `None` excludes it
    pub fn score(&self, query: &str, candidate: &str) -> Option<Match> {
        if query.is_empty() {
            return Some(Match {
                kind: MatchKind::All,
                rank: RankKey::Contained { offset: 0 },
            });
        }

        let query = query.to_lowercase();
        let candidate = candidate.to_lowercase();

        if let Some(byte_offset) = candidate.find(&query) {
            return Some(Match {
                kind: MatchKind::Substring,
                rank: RankKey::Contained {
                    offset: candidate[..byte_offset].chars().count(),
                },
            });
        }

        let q: Vec<char> = query.chars().collect();
        let c: Vec<char> = candidate.chars().collect();
        let similarity = similarity_ratio(&q, &c);

        let kind = if is_subsequence(&q, &c) {
            MatchKind::Subsequence
        } else if similarity >= self.threshold {
            MatchKind::Similar
        } else {
            return None;
        };

        Some(Match {
            kind,
            rank: RankKey::Loose { similarity },
        })
    }

    #[allow(dead_code)]
    pub fn is_match(&self, query: &str, candidate: &str) -> bool {
        self.score(query, candidate).is_some()
    }
}

/// Every character of `query` appears in `text` in order
fn is_subsequence(query: &[char], text: &[char]) -> bool {
    let mut rest = query.iter().peekable();
    for ch in text {
        if rest.peek() == Some(&ch) {
            rest.next();
        }
    }
    rest.peek().is_none()
}

/// Matching-blocks similarity in [0, 1]; two empty inputs are identical
pub fn similarity_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(a, b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]` as (i, j, len),
/// earliest in `a` then in `b` on ties
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    // run length ending at b[j] for the previous row of a
    let mut run_at: HashMap<usize, usize> = HashMap::new();

    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_at = HashMap::new();
        if let Some(positions) = b2j.get(ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run_at.insert(j, k);
                if k > best_len {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_len = k;
                }
            }
        }
        run_at = next_run_at;
    }

    (best_i, best_j, best_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        similarity_ratio(&a, &b)
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let m = Scorer::default().score("", "anything").unwrap();
        assert_eq!(m.kind, MatchKind::All);
        assert_eq!(m.rank.tier(), 0);
    }

    #[test]
    fn test_substring_offsets() {
        let scorer = Scorer::default();
        let lue = scorer.score("lue", "blue").unwrap();
        assert_eq!(lue.kind, MatchKind::Substring);
        assert!(matches!(lue.rank, RankKey::Contained { offset: 1 }));

        let bl = scorer.score("bl", "blue").unwrap();
        assert!(matches!(bl.rank, RankKey::Contained { offset: 0 }));
        assert!(bl.rank < lue.rank);
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        let m = Scorer::default().score("BLUE", "Color.Blue.500").unwrap();
        assert!(matches!(m.rank, RankKey::Contained { offset: 6 }));
    }

    #[test]
    fn test_subsequence_match() {
        let m = Scorer::default().score("cbl", "color-blue").unwrap();
        assert_eq!(m.kind, MatchKind::Subsequence);
        assert_eq!(m.rank.tier(), 1);
    }

    #[test]
    fn test_similarity_fallback_pins_ratio() {
        assert!((ratio("bx", "blue") - 1.0 / 3.0).abs() < 1e-12);

        let m = Scorer::default().score("bx", "blue").unwrap();
        assert_eq!(m.kind, MatchKind::Similar);
        match m.rank {
            RankKey::Loose { similarity } => assert!((similarity - 1.0 / 3.0).abs() < 1e-12),
            other => panic!("unexpected rank {:?}", other),
        }
    }

    #[test]
    fn test_threshold_excludes() {
        assert!(!Scorer::new(0.4).is_match("bx", "blue"));
        assert!(!Scorer::default().is_match("zzz", "blue"));
    }

    #[test]
    fn test_ratio_values() {
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("abc", ""), 0.0);
        assert_eq!(ratio("abcd", "abcd"), 1.0);
        // blocks "ab" and "d"
        assert!((ratio("abxd", "abd") - 6.0 / 7.0).abs() < 1e-12);
        // only the first "a" run can be used once
        assert!((ratio("aa", "a") - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_recurses_on_both_sides() {
        // longest run "cde", then "a" on the left and "g" on the right
        assert!((ratio("axcdeyg", "acdeg") - 10.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_substring_beats_loose() {
        let scorer = Scorer::default();
        let substring = scorer.score("blue", "zzzzzzzzblue").unwrap().rank;
        let loose = scorer.score("blue", "blxue").unwrap().rank;
        assert!(substring < loose);
    }

    #[test]
    fn test_loose_orders_by_similarity_descending() {
        let high = RankKey::Loose { similarity: 0.9 };
        let low = RankKey::Loose { similarity: 0.3 };
        assert!(high < low);
        assert_eq!(
            RankKey::Loose { similarity: 0.5 },
            RankKey::Loose { similarity: 0.5 }
        );
    }
}
