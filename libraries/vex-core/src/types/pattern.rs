/// Generative-art patterns and video combinations
use crate::error::VexError;
use crate::types::Track;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Canvas pattern rendered behind a track's video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtPattern {
    #[default]
    OrganicFlow,
    FlowingParticles,
    GeometricWaves,
    SpiralMatrix,
}

impl ArtPattern {
    /// All patterns, in the order videos are generated
    pub const ALL: [ArtPattern; 4] = [
        Self::OrganicFlow,
        Self::FlowingParticles,
        Self::GeometricWaves,
        Self::SpiralMatrix,
    ];

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrganicFlow => "organicFlow",
            Self::FlowingParticles => "flowingParticles",
            Self::GeometricWaves => "geometricWaves",
            Self::SpiralMatrix => "spiralMatrix",
        }
    }

    /// Recommended pattern for a track, falling back to organic flow
    #[must_use]
    pub fn for_track(track: &Track) -> Self {
        track.mood.map(|m| m.art_pattern()).unwrap_or_default()
    }
}

impl FromStr for ArtPattern {
    type Err = VexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| VexError::UnknownPattern(s.to_string()))
    }
}

impl std::fmt::Display for ArtPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visual style a generated video is titled and rendered with
///
/// Distinct from [`ArtPattern`], which drives the in-page canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visual {
    VoidSpiral,
    #[default]
    FractalWaves,
    PlasmaFlow,
    ShadowDance,
    CrystalFormations,
    ParticleSwarm,
    GeometricEvolution,
    FluidDynamics,
    NeuralNetwork,
}

impl Visual {
    pub const ALL: [Visual; 9] = [
        Self::VoidSpiral,
        Self::FractalWaves,
        Self::PlasmaFlow,
        Self::ShadowDance,
        Self::CrystalFormations,
        Self::ParticleSwarm,
        Self::GeometricEvolution,
        Self::FluidDynamics,
        Self::NeuralNetwork,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VoidSpiral => "void-spiral",
            Self::FractalWaves => "fractal-waves",
            Self::PlasmaFlow => "plasma-flow",
            Self::ShadowDance => "shadow-dance",
            Self::CrystalFormations => "crystal-formations",
            Self::ParticleSwarm => "particle-swarm",
            Self::GeometricEvolution => "geometric-evolution",
            Self::FluidDynamics => "fluid-dynamics",
            Self::NeuralNetwork => "neural-network",
        }
    }

    /// Recommended visual for a track, fractal waves when it has no mood
    #[must_use]
    pub fn for_track(track: &Track) -> Self {
        track.mood.map(|m| m.visual()).unwrap_or_default()
    }
}

impl FromStr for Visual {
    type Err = VexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| VexError::UnknownPattern(s.to_string()))
    }
}

impl std::fmt::Display for Visual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One track rendered with one visual
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCombination {
    pub track_id: String,
    pub visual: Visual,
    pub title: String,
}

impl VideoCombination {
    /// Build the combination for a track and visual
    pub fn new(track: &Track, visual: Visual) -> Self {
        Self {
            track_id: track.id.clone(),
            visual,
            title: format!("{} - {} Visuals | V3XV0ID", track.title, visual),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mood;

    #[test]
    fn pattern_names() {
        assert_eq!(ArtPattern::SpiralMatrix.to_string(), "spiralMatrix");
        assert_eq!(
            "geometricWaves".parse::<ArtPattern>().unwrap(),
            ArtPattern::GeometricWaves
        );
        assert!("spiral".parse::<ArtPattern>().is_err());
    }

    #[test]
    fn pattern_for_track_without_mood() {
        let track = Track::new("a", "A", "a.mp3");
        assert_eq!(ArtPattern::for_track(&track), ArtPattern::OrganicFlow);

        let track = track.with_mood(Mood::Ethereal);
        assert_eq!(ArtPattern::for_track(&track), ArtPattern::GeometricWaves);
    }

    #[test]
    fn visual_names() {
        assert_eq!(Visual::ShadowDance.to_string(), "shadow-dance");
        assert_eq!(
            "crystal-formations".parse::<Visual>().unwrap(),
            Visual::CrystalFormations
        );
        assert!("organicFlow".parse::<Visual>().is_err());
        assert_eq!(
            serde_json::to_string(&Visual::NeuralNetwork).unwrap(),
            "\"neural-network\""
        );
    }

    #[test]
    fn visual_for_track() {
        let track = Track::new("a", "A", "a.mp3");
        assert_eq!(Visual::for_track(&track), Visual::FractalWaves);

        assert_eq!(
            Visual::for_track(&track.clone().with_mood(Mood::DarkAmbient)),
            Visual::VoidSpiral
        );
        assert_eq!(
            Visual::for_track(&track.clone().with_mood(Mood::WhisperedSmoky)),
            Visual::ParticleSwarm
        );
        // Moods without a recommendation get the default
        assert_eq!(
            Visual::for_track(&track.with_mood(Mood::Urban)),
            Visual::FractalWaves
        );
    }

    #[test]
    fn combination_title() {
        let track = Track::new("neon", "Neon Dreams", "Neon Dreams.mp3");
        let combo = VideoCombination::new(&track, Visual::PlasmaFlow);

        assert_eq!(combo.track_id, "neon");
        assert_eq!(combo.visual, Visual::PlasmaFlow);
        assert_eq!(combo.title, "Neon Dreams - plasma-flow Visuals | V3XV0ID");
    }
}
