/// Mood tags attached to catalog tracks
use crate::error::VexError;
use crate::types::{ArtPattern, Visual};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Recognized mood tag
///
/// Filtering by a typo'd mood string is a parse error rather than an empty
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    DarkAmbient,
    Atmospheric,
    Ethereal,
    Mysterious,
    HeavyDark,
    Dreamy,
    Rhythmic,
    DeepDark,
    Whispered,
    WhisperedSmoky,
    Cinematic,
    Smoky,
    Psychological,
    Nostalgic,
    Urban,
    Minimal,
    Airy,
}

impl Mood {
    /// Every recognized mood, in display order
    pub const ALL: [Mood; 17] = [
        Self::DarkAmbient,
        Self::Atmospheric,
        Self::Ethereal,
        Self::Mysterious,
        Self::HeavyDark,
        Self::Dreamy,
        Self::Rhythmic,
        Self::DeepDark,
        Self::Whispered,
        Self::WhisperedSmoky,
        Self::Cinematic,
        Self::Smoky,
        Self::Psychological,
        Self::Nostalgic,
        Self::Urban,
        Self::Minimal,
        Self::Airy,
    ];

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DarkAmbient => "dark-ambient",
            Self::Atmospheric => "atmospheric",
            Self::Ethereal => "ethereal",
            Self::Mysterious => "mysterious",
            Self::HeavyDark => "heavy-dark",
            Self::Dreamy => "dreamy",
            Self::Rhythmic => "rhythmic",
            Self::DeepDark => "deep-dark",
            Self::Whispered => "whispered",
            Self::WhisperedSmoky => "whispered-smoky",
            Self::Cinematic => "cinematic",
            Self::Smoky => "smoky",
            Self::Psychological => "psychological",
            Self::Nostalgic => "nostalgic",
            Self::Urban => "urban",
            Self::Minimal => "minimal",
            Self::Airy => "airy",
        }
    }

    /// Recommended generative-art pattern for this mood
    #[must_use]
    pub fn art_pattern(&self) -> ArtPattern {
        match self {
            Self::DarkAmbient | Self::DeepDark | Self::Smoky | Self::WhisperedSmoky => {
                ArtPattern::OrganicFlow
            }
            Self::Atmospheric | Self::Dreamy => ArtPattern::FlowingParticles,
            Self::Ethereal | Self::Whispered => ArtPattern::GeometricWaves,
            Self::Mysterious | Self::Cinematic | Self::Psychological => ArtPattern::SpiralMatrix,
            _ => ArtPattern::OrganicFlow,
        }
    }

    /// Recommended video visual for this mood
    #[must_use]
    pub fn visual(&self) -> Visual {
        match self {
            Self::DarkAmbient | Self::DeepDark => Visual::VoidSpiral,
            Self::Atmospheric => Visual::FractalWaves,
            Self::Ethereal => Visual::PlasmaFlow,
            Self::Mysterious => Visual::ShadowDance,
            Self::Dreamy => Visual::CrystalFormations,
            Self::Whispered | Self::WhisperedSmoky => Visual::ParticleSwarm,
            Self::Cinematic => Visual::GeometricEvolution,
            Self::Smoky => Visual::FluidDynamics,
            Self::Psychological => Visual::NeuralNetwork,
            _ => Visual::FractalWaves,
        }
    }
}

impl FromStr for Mood {
    type Err = VexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| VexError::UnknownMood(s.to_string()))
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_mood() {
        for mood in Mood::ALL {
            assert_eq!(mood.as_str().parse::<Mood>().unwrap(), mood);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Dark-Ambient".parse::<Mood>().unwrap(), Mood::DarkAmbient);
        assert_eq!(" smoky ".parse::<Mood>().unwrap(), Mood::Smoky);
    }

    #[test]
    fn unknown_mood_is_an_error() {
        let err = "smokey".parse::<Mood>().unwrap_err();
        assert!(matches!(err, VexError::UnknownMood(ref s) if s == "smokey"));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Mood::WhisperedSmoky).unwrap();
        assert_eq!(json, "\"whispered-smoky\"");

        let parsed: Mood = serde_json::from_str("\"heavy-dark\"").unwrap();
        assert_eq!(parsed, Mood::HeavyDark);
    }

    #[test]
    fn art_pattern_mapping() {
        assert_eq!(Mood::Smoky.art_pattern(), ArtPattern::OrganicFlow);
        assert_eq!(Mood::Dreamy.art_pattern(), ArtPattern::FlowingParticles);
        assert_eq!(Mood::Whispered.art_pattern(), ArtPattern::GeometricWaves);
        assert_eq!(Mood::Cinematic.art_pattern(), ArtPattern::SpiralMatrix);
        assert_eq!(Mood::Urban.art_pattern(), ArtPattern::OrganicFlow);
    }
}
