//! Answer scoring for typed and spoken answers.
//!
//! Answers are compared after [`normalize_answer`], so case, spacing and
//! sentence punctuation never count against the learner.

use crate::error::{Result, ValidationError};
use crate::types::{ComparisonResult, Tier};
use serde::{Deserialize, Serialize};

/// Default similarity (percent) needed for an answer to be accepted.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 80.0;

/// Characters removed before comparing answers.
const IGNORED_PUNCTUATION: &[char] = &['。', '、', '？', '！', '?', '!', '.', ','];

/// Lower bounds (inclusive, percent) of the feedback tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: 80.0,
            good: 60.0,
            fair: 40.0,
        }
    }
}

impl TierThresholds {
    pub fn classify(&self, similarity_percent: f64) -> Tier {
        if similarity_percent >= self.excellent {
            Tier::Excellent
        } else if similarity_percent >= self.good {
            Tier::Good
        } else if similarity_percent >= self.fair {
            Tier::Fair
        } else {
            Tier::NeedsPractice
        }
    }
}

/// Options for [`compare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Similarity (percent) at or above which the answer is a match.
    pub acceptance_threshold: f64,
    /// Accept an answer that contains a whole candidate, e.g. a speech
    /// transcript that includes the kana reading.
    pub accept_contained_reading: bool,
    pub tiers: TierThresholds,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            accept_contained_reading: false,
            tiers: TierThresholds::default(),
        }
    }
}

impl CompareOptions {
    pub fn with_threshold(acceptance_threshold: f64) -> Self {
        Self {
            acceptance_threshold,
            ..Self::default()
        }
    }
}

/// Classify a similarity percentage with the default 80/60/40 cut points.
pub fn classify(similarity_percent: f64) -> Tier {
    TierThresholds::default().classify(similarity_percent)
}

/// Lowercase and strip whitespace and sentence punctuation.
pub fn normalize_answer(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !IGNORED_PUNCTUATION.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity percentage (0 to 100) of two strings taken as-is.
pub fn raw_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0; // Both empty strings are identical
    }

    let distance = levenshtein_distance(a, b);
    (max_len - distance) as f64 * 100.0 / max_len as f64
}

/// Similarity percentage (0 to 100) of two answers after normalization.
pub fn similarity(expected: &str, actual: &str) -> f64 {
    raw_similarity(&normalize_answer(expected), &normalize_answer(actual))
}

/// Compare an answer against every acceptable candidate and keep the best.
pub fn compare<S: AsRef<str>>(
    candidates: &[S],
    actual: &str,
    options: &CompareOptions,
) -> Result<ComparisonResult> {
    if !(0.0..=100.0).contains(&options.acceptance_threshold) {
        return Err(ValidationError::InvalidThreshold(options.acceptance_threshold));
    }
    if candidates.is_empty() {
        return Err(ValidationError::NoCandidates);
    }

    let actual_normalized = normalize_answer(actual);

    let mut best: Option<(&str, String, f64)> = None;
    for candidate in candidates {
        let candidate = candidate.as_ref();
        let normalized = normalize_answer(candidate);
        let score = if options.accept_contained_reading
            && !normalized.is_empty()
            && actual_normalized.contains(&normalized)
        {
            100.0
        } else {
            raw_similarity(&normalized, &actual_normalized)
        };

        if best.as_ref().map_or(true, |(_, _, top)| score > *top) {
            best = Some((candidate, normalized, score));
        }
    }

    let (best_candidate, best_normalized, similarity_percent) =
        best.ok_or(ValidationError::NoCandidates)?;
    let is_match = similarity_percent >= options.acceptance_threshold;

    let differences = if is_match {
        Vec::new()
    } else {
        let mut notes = vec![
            format!("expected: {best_candidate}"),
            format!("got: {actual}"),
        ];
        notes.extend(
            char_diff(&best_normalized, &actual_normalized)
                .iter()
                .filter_map(DiffSegment::describe),
        );
        notes
    };

    Ok(ComparisonResult {
        is_match,
        similarity_percent,
        tier: options.tiers.classify(similarity_percent),
        best_candidate: best_candidate.to_string(),
        differences,
    })
}

/// Kind of edit in a [`char_diff`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiffType {
    /// Text is the same in both strings.
    Same,
    /// Expected text the answer left out.
    Missing,
    /// Text in the answer that was not expected.
    Extra,
    /// Expected text the answer replaced with something else.
    Substituted,
}

/// A run of consecutive edits of one kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSegment {
    pub diff_type: DiffType,
    /// Text from the expected answer; empty for `Extra`.
    pub expected: String,
    /// Text from the given answer; empty for `Missing`.
    pub actual: String,
    /// Char offset into the expected answer.
    pub position: usize,
}

impl DiffSegment {
    fn describe(&self) -> Option<String> {
        match self.diff_type {
            DiffType::Same => None,
            DiffType::Missing => Some(format!("missing '{}' at {}", self.expected, self.position)),
            DiffType::Extra => Some(format!("extra '{}' at {}", self.actual, self.position)),
            DiffType::Substituted => Some(format!(
                "'{}' instead of '{}' at {}",
                self.actual, self.expected, self.position
            )),
        }
    }
}

/// Character-level alignment of `actual` against `expected`.
///
/// Follows one minimal Levenshtein edit path; adjacent edits of the same kind
/// are merged into one segment.
pub fn char_diff(expected: &str, actual: &str) -> Vec<DiffSegment> {
    let e: Vec<char> = expected.chars().collect();
    let a: Vec<char> = actual.chars().collect();
    let (m, n) = (e.len(), a.len());

    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        table[0][j] = j;
    }
    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(e[i - 1] != a[j - 1]);
            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + cost);
        }
    }

    // (type, expected char, actual char, position in expected)
    let mut ops: Vec<(DiffType, Option<char>, Option<char>, usize)> = Vec::new();
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && e[i - 1] == a[j - 1] && table[i][j] == table[i - 1][j - 1] {
            ops.push((DiffType::Same, Some(e[i - 1]), Some(a[j - 1]), i - 1));
            i -= 1;
            j -= 1;
        } else if j > 0 && table[i][j] == table[i][j - 1] + 1 {
            ops.push((DiffType::Extra, None, Some(a[j - 1]), i));
            j -= 1;
        } else if i > 0 && table[i][j] == table[i - 1][j] + 1 {
            ops.push((DiffType::Missing, Some(e[i - 1]), None, i - 1));
            i -= 1;
        } else {
            ops.push((DiffType::Substituted, Some(e[i - 1]), Some(a[j - 1]), i - 1));
            i -= 1;
            j -= 1;
        }
    }
    ops.reverse();

    let mut segments: Vec<DiffSegment> = Vec::new();
    for (diff_type, expected_char, actual_char, position) in ops {
        match segments.last_mut() {
            Some(last) if last.diff_type == diff_type => {
                last.expected.extend(expected_char);
                last.actual.extend(actual_char);
            }
            _ => segments.push(DiffSegment {
                diff_type,
                expected: expected_char.map(String::from).unwrap_or_default(),
                actual: actual_char.map(String::from).unwrap_or_default(),
                position,
            }),
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
    }

    #[test]
    fn test_levenshtein_counts_chars_not_bytes() {
        assert_eq!(levenshtein_distance("こんにちは", "こんばんは"), 2);
        assert_eq!(levenshtein_distance("猫", "ねこ"), 2);
    }

    #[test]
    fn test_levenshtein_symmetric() {
        let pairs = [
            ("kitten", "sitting"),
            ("abc", "abd"),
            ("", "xyz"),
            ("ありがとう", "ありがと"),
            ("学生", "がくせい"),
        ];
        for (a, b) in pairs {
            assert_eq!(levenshtein_distance(a, b), levenshtein_distance(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("こんにちは", "こんにちは"), 100.0);
        assert_eq!(similarity("", ""), 100.0);
        assert!(similarity("abc", "xyz") <= 33.0);
        assert_eq!(similarity("Hello", "hello"), 100.0);
        assert_eq!(similarity("ありがとう。", "ありがとう"), 100.0);
        assert_eq!(similarity("helo", "hello"), 80.0);
    }

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer("  Good Morning!  "), "goodmorning");
        assert_eq!(normalize_answer("はい、そうです。"), "はいそうです");
        assert_eq!(normalize_answer("なに？"), "なに");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(85.0), Tier::Excellent);
        assert_eq!(classify(65.0), Tier::Good);
        assert_eq!(classify(45.0), Tier::Fair);
        assert_eq!(classify(10.0), Tier::NeedsPractice);
    }

    #[test]
    fn test_classify_lower_bounds_inclusive() {
        assert_eq!(classify(80.0), Tier::Excellent);
        assert_eq!(classify(79.9), Tier::Good);
        assert_eq!(classify(60.0), Tier::Good);
        assert_eq!(classify(40.0), Tier::Fair);
        assert_eq!(classify(39.9), Tier::NeedsPractice);
    }

    #[test]
    fn test_custom_tiers() {
        let strict = TierThresholds {
            excellent: 95.0,
            good: 85.0,
            fair: 70.0,
        };
        assert_eq!(strict.classify(90.0), Tier::Good);
        assert_eq!(strict.classify(50.0), Tier::NeedsPractice);
    }

    #[test]
    fn test_compare_kanji_or_reading() {
        let candidates = ["学生", "がくせい"];
        let result = compare(&candidates, "がくせい", &CompareOptions::default()).unwrap();
        assert!(result.is_match);
        assert_eq!(result.similarity_percent, 100.0);
        assert_eq!(result.best_candidate, "がくせい");
        assert!(result.differences.is_empty());

        let result = compare(&candidates, "学生", &CompareOptions::default()).unwrap();
        assert_eq!(result.best_candidate, "学生");
        assert!(result.is_match);
    }

    #[test]
    fn test_compare_threshold_is_configurable() {
        // 4 of 5 chars right: 80%
        let lenient = compare(&["ありがとう"], "ありがと", &CompareOptions::with_threshold(60.0)).unwrap();
        assert!(lenient.is_match);

        let strict = compare(&["ありがとう"], "ありがと", &CompareOptions::with_threshold(100.0)).unwrap();
        assert!(!strict.is_match);
        assert_eq!(strict.tier, Tier::Excellent);
    }

    #[test]
    fn test_compare_differences_on_miss() {
        let result = compare(&["ねこ"], "いぬ", &CompareOptions::default()).unwrap();
        assert!(!result.is_match);
        assert_eq!(result.similarity_percent, 0.0);
        assert_eq!(result.tier, Tier::NeedsPractice);
        assert_eq!(
            result.differences,
            vec![
                "expected: ねこ".to_string(),
                "got: いぬ".to_string(),
                "'いぬ' instead of 'ねこ' at 0".to_string(),
            ]
        );
    }

    #[test]
    fn test_compare_contained_reading() {
        let options = CompareOptions {
            accept_contained_reading: true,
            ..CompareOptions::default()
        };
        let transcript = "えっと、がくせいです";
        let result = compare(&["学生", "がくせい"], transcript, &options).unwrap();
        assert!(result.is_match);
        assert_eq!(result.best_candidate, "がくせい");

        let without = compare(&["学生", "がくせい"], transcript, &CompareOptions::default()).unwrap();
        assert!(!without.is_match);
    }

    #[test]
    fn test_compare_rejects_bad_input() {
        let empty: [&str; 0] = [];
        assert_eq!(
            compare(&empty, "x", &CompareOptions::default()),
            Err(ValidationError::NoCandidates)
        );
        assert_eq!(
            compare(&["a"], "a", &CompareOptions::with_threshold(120.0)),
            Err(ValidationError::InvalidThreshold(120.0))
        );
        assert!(compare(&["a"], "a", &CompareOptions::with_threshold(f64::NAN)).is_err());
    }

    #[test]
    fn test_char_diff() {
        let diff = char_diff("たべます", "たべました");
        assert_eq!(
            diff,
            vec![
                DiffSegment {
                    diff_type: DiffType::Same,
                    expected: "たべま".into(),
                    actual: "たべま".into(),
                    position: 0,
                },
                DiffSegment {
                    diff_type: DiffType::Substituted,
                    expected: "す".into(),
                    actual: "し".into(),
                    position: 3,
                },
                DiffSegment {
                    diff_type: DiffType::Extra,
                    expected: String::new(),
                    actual: "た".into(),
                    position: 4,
                },
            ]
        );
    }

    #[test]
    fn test_char_diff_missing() {
        let diff = char_diff("ありがとう", "ありがと");
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[1].diff_type, DiffType::Missing);
        assert_eq!(diff[1].expected, "う");
        assert_eq!(diff[1].position, 4);
    }

    #[test]
    fn test_char_diff_identical() {
        let diff = char_diff("abc", "abc");
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].diff_type, DiffType::Same);
        assert!(char_diff("", "").is_empty());
    }
}
