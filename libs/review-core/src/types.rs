//! Core types for review scheduling and answer scoring.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque identifier of a learnable item (a vocabulary entry, a phrase...).
pub type ItemId = String;

/// Ease factor every item starts with.
pub const INITIAL_EASE: f64 = 2.5;

/// Lowest ease factor the scheduler will ever produce.
pub const MINIMUM_EASE: f64 = 1.3;

/// Review state of a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub item_id: ItemId,
    /// When the item becomes eligible for review again.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_at: DateTime<Utc>,
    pub interval_days: u32,
    pub ease: f64,
    /// Consecutive passing reviews.
    pub repetitions: u32,
}

impl ReviewState {
    /// Fresh state for an item that has never been reviewed. Due immediately.
    pub fn new(item_id: impl Into<ItemId>, now: DateTime<Utc>) -> Self {
        Self {
            item_id: item_id.into(),
            next_review_at: now,
            interval_days: 0,
            ease: INITIAL_EASE,
            repetitions: 0,
        }
    }

    /// Whether the item is eligible for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }

    /// True until the item has been passed at least once.
    pub fn is_new(&self) -> bool {
        self.repetitions == 0 && self.interval_days == 0
    }
}

/// SM-2 recall quality on the 0-5 scale.
///
/// 0 is a total blackout, 3 a correct answer recalled with effort and 5 a
/// perfect response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    /// Lowest quality that counts as a successful recall.
    pub const PASSING: u8 = 3;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > Self::MAX {
            return Err(ValidationError::QualityOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_passing(self) -> bool {
        self.0 >= Self::PASSING
    }
}

impl TryFrom<u8> for Quality {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Parses a number `0..=5` or a rating name such as `good`.
impl FromStr for Quality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rating) = Rating::from_name(s) {
            return Ok(rating.into());
        }
        match s.parse::<u8>() {
            Ok(value) => Self::new(value),
            Err(_) => Err(ValidationError::UnrecognizedQuality(s.to_string())),
        }
    }
}

impl From<Rating> for Quality {
    fn from(rating: Rating) -> Self {
        Self(rating.to_value())
    }
}

/// Self-grade buttons shown after revealing an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// SM-2 quality this button submits.
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 1,
            Self::Good => 3,
            Self::Easy => 5,
        }
    }

    /// Parse a button name as used in settings and on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "again" => Some(Self::Again),
            "hard" => Some(Self::Hard),
            "good" => Some(Self::Good),
            "easy" => Some(Self::Easy),
            _ => None,
        }
    }
}

/// Feedback tier for a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    NeedsPractice,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsPractice => "needs-practice",
        }
    }

    /// Score shown on the pronunciation screen for this tier.
    pub fn display_score(&self) -> u8 {
        match self {
            Self::Excellent => 100,
            Self::Good => 75,
            Self::Fair => 50,
            Self::NeedsPractice => 25,
        }
    }

    /// Quality a caller may choose to submit for this tier.
    ///
    /// The scheduler never applies this mapping itself.
    pub fn suggested_quality(&self) -> Quality {
        match self {
            Self::Excellent => Quality(5),
            Self::Good => Quality(4),
            Self::Fair => Quality(3),
            Self::NeedsPractice => Quality(1),
        }
    }
}

/// Result of comparing a user's answer against the acceptable answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    #[serde(rename = "match")]
    pub is_match: bool,
    /// Best similarity across all candidates, 0.0 to 100.0.
    pub similarity_percent: f64,
    pub tier: Tier,
    /// Candidate the similarity was measured against.
    pub best_candidate: String,
    /// Human readable notes on what differs; empty on a match.
    pub differences: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_state_is_due_immediately() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let state = ReviewState::new("word-1", now);
        assert!(state.is_due(now));
        assert!(state.is_new());
        assert_eq!(state.ease, INITIAL_EASE);
    }

    #[test]
    fn quality_rejects_out_of_range() {
        assert!(Quality::new(5).is_ok());
        assert_eq!(Quality::new(6), Err(ValidationError::QualityOutOfRange(6)));
    }

    #[test]
    fn rating_maps_to_review_buttons() {
        assert_eq!(Quality::from(Rating::Again).value(), 0);
        assert_eq!(Quality::from(Rating::Hard).value(), 1);
        assert_eq!(Quality::from(Rating::Good).value(), 3);
        assert_eq!(Quality::from(Rating::Easy).value(), 5);
        assert!(!Quality::from(Rating::Hard).is_passing());
        assert_eq!(Rating::from_name("good"), Some(Rating::Good));
        assert_eq!(Rating::from_name("meh"), None);
    }

    #[test]
    fn quality_parses_numbers_and_rating_names() {
        assert_eq!("4".parse::<Quality>().unwrap().value(), 4);
        assert_eq!("again".parse::<Quality>().unwrap().value(), 0);
        assert_eq!("hard".parse::<Quality>().unwrap().value(), 1);
        assert_eq!("good".parse::<Quality>().unwrap().value(), 3);
        assert_eq!(" easy ".parse::<Quality>().unwrap().value(), 5);

        assert_eq!("6".parse::<Quality>(), Err(ValidationError::QualityOutOfRange(6)));
        assert_eq!(
            "300".parse::<Quality>(),
            Err(ValidationError::UnrecognizedQuality("300".into()))
        );
        assert_eq!(
            "meh".parse::<Quality>(),
            Err(ValidationError::UnrecognizedQuality("meh".into()))
        );
    }

    #[test]
    fn tier_scores_and_suggested_quality() {
        let tiers = [Tier::Excellent, Tier::Good, Tier::Fair, Tier::NeedsPractice];
        let scores: Vec<u8> = tiers.iter().map(Tier::display_score).collect();
        let qualities: Vec<u8> = tiers.iter().map(|t| t.suggested_quality().value()).collect();
        assert_eq!(scores, vec![100, 75, 50, 25]);
        assert_eq!(qualities, vec![5, 4, 3, 1]);
        assert!(!Tier::NeedsPractice.suggested_quality().is_passing());
        assert!(Tier::Fair.suggested_quality().is_passing());
    }

    #[test]
    fn tier_names_match_serialized_form() {
        for tier in [Tier::Excellent, Tier::Good, Tier::Fair, Tier::NeedsPractice] {
            assert_eq!(serde_json::to_value(tier).unwrap(), tier.as_str());
        }
    }

    #[test]
    fn state_serializes_timestamp_as_epoch_millis() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let state = ReviewState::new("word-1", now);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["next_review_at"], 1_700_000_000_123i64);

        let back: ReviewState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn quality_deserialization_is_validated() {
        let ok: Quality = serde_json::from_str("4").unwrap();
        assert_eq!(ok.value(), 4);
        assert!(serde_json::from_str::<Quality>("9").is_err());
    }

    #[test]
    fn comparison_result_uses_match_key() {
        let result = ComparisonResult {
            is_match: true,
            similarity_percent: 100.0,
            tier: Tier::Excellent,
            best_candidate: "ねこ".into(),
            differences: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["match"], true);
        assert_eq!(json["tier"], "excellent");
    }
}
