//! Built-in track catalog and lookup helpers
//!
//! The catalog is an ordered, non-empty list of [`Track`]s with unique ids.
//! It is immutable once built; whether a track has been uploaded to storage is
//! computed elsewhere and never stored here.

use crate::error::{Result, VexError};
use crate::types::{Mood, Track, VideoCombination, Visual};
use rand::Rng;
use std::collections::HashSet;

/// `(id, title, filename, mood)` for every track the site ships with
const BUILTIN_TRACKS: &[(&str, &str, &str, Mood)] = &[
    ("echoes-abyss", "Echoes in the Abyss", "Echoes in the Abyss.mp3", Mood::DarkAmbient),
    ("echoes-abyss-alt", "Echoes in the Abyss (Alt)", "Echoes in the Abyss (1).mp3", Mood::DarkAmbient),
    ("echoes-dust", "Echoes in the Dust", "Echoes in the Dust.mp3", Mood::Atmospheric),
    ("echoes-dust-alt", "Echoes in the Dust (Alt)", "Echoes in the Dust (1).mp3", Mood::Atmospheric),
    ("echoes-dust-alt2", "Echoes in the Dust (Alt 2)", "Echoes in the Dust (2).mp3", Mood::Atmospheric),
    ("echoes-fog", "Echoes in the Fog", "Echoes in the Fog.mp3", Mood::Ethereal),
    ("echoes-fog-alt", "Echoes in the Fog (Alt)", "Echoes in the Fog (1).mp3", Mood::Ethereal),
    ("echoes-mist", "Echoes in the Mist", "Echoes in the Mist.mp3", Mood::Mysterious),
    ("echoes-mist-alt", "Echoes in the Mist (Alt)", "Echoes in the Mist (1).mp3", Mood::Mysterious),
    ("four-ton-shadow", "Four Ton Shadow", "Four Ton Shadow.mp3", Mood::HeavyDark),
    ("four-ton-shadow-alt1", "Four Ton Shadow (Alt 1)", "Four Ton Shadow (1).mp3", Mood::HeavyDark),
    ("four-ton-shadow-alt2", "Four Ton Shadow (Alt 2)", "Four Ton Shadow (2).mp3", Mood::HeavyDark),
    ("four-ton-shadow-alt3", "Four Ton Shadow (Alt 3)", "Four Ton Shadow (3).mp3", Mood::HeavyDark),
    ("four-ton-shadow-alt4", "Four Ton Shadow (Alt 4)", "Four Ton Shadow (4).mp3", Mood::HeavyDark),
    ("four-ton-shadow-alt5", "Four Ton Shadow (Alt 5)", "Four Ton Shadow (5).mp3", Mood::HeavyDark),
    ("four-ton-shadows", "Four Ton Shadows", "Four Ton Shadows.mp3", Mood::HeavyDark),
    ("four-ton-shadows-alt", "Four Ton Shadows (Alt)", "Four Ton Shadows (1).mp3", Mood::HeavyDark),
    ("midnight-reverie", "Midnight Reverie", "Midnight Reverie.mp3", Mood::Dreamy),
    ("midnight-reverie-alt", "Midnight Reverie (Alt)", "Midnight Reverie (1).mp3", Mood::Dreamy),
    ("shadow-steps", "Shadow Steps", "Shadow Steps.mp3", Mood::Rhythmic),
    ("shadow-steps-alt", "Shadow Steps (Alt)", "Shadow Steps (1).mp3", Mood::Rhythmic),
    ("shadowed-depths", "Shadowed Depths", "Shadowed Depths.mp3", Mood::DeepDark),
    ("shadowed-depths-alt", "Shadowed Depths (Alt)", "Shadowed Depths (1).mp3", Mood::DeepDark),
    ("shadowed-whispers", "Shadowed Whispers", "Shadowed Whispers.mp3", Mood::Whispered),
    ("shadowed-whispers-alt", "Shadowed Whispers (Alt)", "Shadowed Whispers (1).mp3", Mood::Whispered),
    ("shadows-silhouettes", "Shadows and Silhouettes", "Shadows and Silhouettes.mp3", Mood::Cinematic),
    ("shadows-silhouettes-alt", "Shadows and Silhouettes (Alt)", "Shadows and Silhouettes (1).mp3", Mood::Cinematic),
    ("shadows-smoke", "Shadows in the Smoke", "Shadows in the Smoke.mp3", Mood::Smoky),
    ("shadows-smoke-alt", "Shadows in the Smoke (Alt)", "Shadows in the Smoke (1).mp3", Mood::Smoky),
    ("shadows-mind", "Shadows of the Mind", "Shadows of the Mind.mp3", Mood::Psychological),
    ("shadows-mind-alt1", "Shadows of the Mind (Alt 1)", "Shadows of the Mind (1).mp3", Mood::Psychological),
    ("shadows-mind-alt2", "Shadows of the Mind (Alt 2)", "Shadows of the Mind (2).mp3", Mood::Psychological),
    ("shadows-mind-alt3", "Shadows of the Mind (Alt 3)", "Shadows of the Mind (3).mp3", Mood::Psychological),
    ("shadows-past", "Shadows of the Past", "Shadows of the Past.mp3", Mood::Nostalgic),
    ("shadows-past-alt", "Shadows of the Past (Alt)", "Shadows of the Past (1).mp3", Mood::Nostalgic),
    ("shadows-street", "Shadows of the Street", "Shadows of the Street.mp3", Mood::Urban),
    ("shadows-street-alt", "Shadows of the Street (Alt)", "Shadows of the Street (1).mp3", Mood::Urban),
    ("silent-shadows", "Silent Shadows", "Silent Shadows.mp3", Mood::Minimal),
    ("silent-shadows-alt", "Silent Shadows (Alt)", "Silent Shadows (1).mp3", Mood::Minimal),
    ("whispering-shadows", "Whispering Shadows", "Whispering Shadows.mp3", Mood::Ethereal),
    ("whispering-shadows-alt", "Whispering Shadows (Alt)", "Whispering Shadows (1).mp3", Mood::Ethereal),
    ("whispers-smoke", "Whispers in the Smoke", "Whispers in the Smoke.mp3", Mood::Smoky),
    ("whispers-smoke-alt", "Whispers in the Smoke (Alt)", "Whispers in the Smoke (1).mp3", Mood::Smoky),
    ("whispers-wind", "Whispers in the Wind", "Whispers in the Wind.mp3", Mood::Airy),
];

/// Ordered, validated track list
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// The catalog bundled with the site
    pub fn builtin() -> Self {
        let tracks = BUILTIN_TRACKS
            .iter()
            .map(|(id, title, filename, mood)| Track::new(*id, *title, *filename).with_mood(*mood))
            .collect();
        Self { tracks }
    }

    /// Build a catalog from arbitrary tracks
    ///
    /// # Errors
    ///
    /// Returns `EmptyCatalog` for an empty list and `DuplicateTrack` when two
    /// tracks share an id.
    pub fn from_tracks(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(VexError::EmptyCatalog);
        }

        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if track.id.trim().is_empty() {
                return Err(VexError::invalid_input("track id must not be empty"));
            }
            if !seen.insert(track.id.as_str()) {
                return Err(VexError::DuplicateTrack(track.id.clone()));
            }
        }

        Ok(Self { tracks })
    }

    /// Number of tracks (always at least one)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in catalog order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Iterate tracks in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Find a track by id
    pub fn by_id(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Find a track by id, as an error when missing
    pub fn require(&self, id: &str) -> Result<&Track> {
        self.by_id(id).ok_or_else(|| VexError::not_found("Track", id))
    }

    /// Catalog index of the track with `id`
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Tracks tagged with `mood`, in catalog order
    pub fn by_mood(&self, mood: Mood) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.mood == Some(mood)).collect()
    }

    /// Uniformly random track
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> &Track {
        &self.tracks[rng.gen_range(0..self.tracks.len())]
    }

    /// Storage object names of every track
    pub fn filenames(&self) -> Vec<&str> {
        self.tracks.iter().map(|t| t.filename.as_str()).collect()
    }

    /// One video per track, using the visual recommended for its mood
    pub fn video_combinations(&self) -> Vec<VideoCombination> {
        self.tracks
            .iter()
            .map(|t| VideoCombination::new(t, Visual::for_track(t)))
            .collect()
    }

    /// Endless in-order cursor for batch video generation
    pub fn rotation(&self) -> RotationCursor<'_> {
        RotationCursor {
            catalog: self,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

/// Yields catalog tracks in order, wrapping around forever
#[derive(Debug, Clone)]
pub struct RotationCursor<'a> {
    catalog: &'a Catalog,
    next: usize,
}

impl RotationCursor<'_> {
    /// Index the next call to `next()` will yield
    pub fn position(&self) -> usize {
        self.next
    }
}

impl<'a> Iterator for RotationCursor<'a> {
    type Item = &'a Track;

    fn next(&mut self) -> Option<Self::Item> {
        let track = self.catalog.tracks.get(self.next)?;
        self.next = (self.next + 1) % self.catalog.tracks.len();
        Some(track)
    }
}
