//! Practice settings for answer checking.

use crate::matching::{CompareOptions, TierThresholds, DEFAULT_ACCEPTANCE_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Where an answer comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    /// Typed answers; strict by default.
    Dictation,
    /// Speech recognition transcripts; lenient by default.
    Speech,
}

impl Default for PracticeMode {
    fn default() -> Self {
        Self::Dictation
    }
}

impl PracticeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dictation => "dictation",
            Self::Speech => "speech",
        }
    }

    /// Parse from string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "dictation" => Some(Self::Dictation),
            "speech" => Some(Self::Speech),
            _ => None,
        }
    }
}

/// Global practice settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeSettings {
    pub algorithm: String,
    pub acceptance_threshold: f64,
    pub tier_thresholds: TierThresholds,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            algorithm: "sm2".to_string(),
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            tier_thresholds: TierThresholds::default(),
        }
    }
}

/// Per-mode overrides (all fields optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeSettings {
    pub mode: PracticeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_contained_reading: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_thresholds: Option<TierThresholds>,
}

impl ModeSettings {
    /// Create mode settings with no overrides.
    pub fn new(mode: PracticeMode) -> Self {
        Self {
            mode,
            acceptance_threshold: None,
            accept_contained_reading: None,
            tier_thresholds: None,
        }
    }
}

/// Settings in effect for one practice mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub mode: PracticeMode,
    pub algorithm: String,
    pub acceptance_threshold: f64,
    pub accept_contained_reading: bool,
    pub tier_thresholds: TierThresholds,
}

impl EffectiveSettings {
    /// Merge global settings with optional mode overrides.
    ///
    /// Without an override, speech practice accepts transcripts that contain
    /// the expected reading and dictation does not.
    pub fn merge(global: &PracticeSettings, mode: PracticeMode, overrides: Option<&ModeSettings>) -> Self {
        let default_contained = mode == PracticeMode::Speech;
        match overrides {
            Some(o) => Self {
                mode,
                algorithm: global.algorithm.clone(),
                acceptance_threshold: o.acceptance_threshold.unwrap_or(global.acceptance_threshold),
                accept_contained_reading: o.accept_contained_reading.unwrap_or(default_contained),
                tier_thresholds: o.tier_thresholds.unwrap_or(global.tier_thresholds),
            },
            None => Self {
                mode,
                algorithm: global.algorithm.clone(),
                acceptance_threshold: global.acceptance_threshold,
                accept_contained_reading: default_contained,
                tier_thresholds: global.tier_thresholds,
            },
        }
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            acceptance_threshold: self.acceptance_threshold,
            accept_contained_reading: self.accept_contained_reading,
            tiers: self.tier_thresholds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_without_overrides() {
        let global = PracticeSettings::default();
        let dictation = EffectiveSettings::merge(&global, PracticeMode::Dictation, None);
        assert_eq!(dictation.acceptance_threshold, 80.0);
        assert!(!dictation.accept_contained_reading);

        let speech = EffectiveSettings::merge(&global, PracticeMode::Speech, None);
        assert!(speech.accept_contained_reading);
    }

    #[test]
    fn merge_with_overrides() {
        let global = PracticeSettings {
            acceptance_threshold: 90.0,
            ..PracticeSettings::default()
        };
        let overrides = ModeSettings {
            acceptance_threshold: Some(60.0),
            accept_contained_reading: Some(false),
            ..ModeSettings::new(PracticeMode::Speech)
        };
        let effective = EffectiveSettings::merge(&global, PracticeMode::Speech, Some(&overrides));
        assert_eq!(
            effective.compare_options(),
            CompareOptions {
                acceptance_threshold: 60.0,
                accept_contained_reading: false,
                tiers: TierThresholds::default(),
            }
        );
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in [PracticeMode::Dictation, PracticeMode::Speech] {
            assert_eq!(PracticeMode::from_name(mode.as_str()), Some(mode));
        }
        assert_eq!(PracticeMode::from_name("karaoke"), None);
    }

    #[test]
    fn settings_deserialize_from_json() {
        let json = r#"{"mode":"speech","acceptance_threshold":55.0}"#;
        let settings: ModeSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.mode, PracticeMode::Speech);
        assert_eq!(settings.acceptance_threshold, Some(55.0));
        assert_eq!(settings.tier_thresholds, None);
    }
}
