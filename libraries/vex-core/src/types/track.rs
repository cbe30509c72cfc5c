/// Track domain type
use crate::resolver::SourceResolver;
use crate::types::Mood;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Directory the site serves bundled audio from
pub const LOCAL_MUSIC_DIR: &str = "/music";

/// Audio track
///
/// The remote URL is deliberately absent: it is derived from `filename` by a
/// [`SourceResolver`] on every access, see [`Track::sources`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier (stable across releases)
    pub id: String,

    /// Display title
    pub title: String,

    /// Object name in the storage bucket
    pub filename: String,

    /// Path of the bundled copy served by the site
    pub local_path: String,

    /// Track duration in seconds, once metadata has been loaded
    pub duration_secs: Option<f64>,

    /// Tempo
    pub bpm: Option<u32>,

    /// Musical key
    pub key: Option<String>,

    /// Mood tag used for display and filtering
    pub mood: Option<Mood>,
}

impl Track {
    /// Create a new track with minimal metadata
    ///
    /// The local path is derived from the filename.
    pub fn new(id: impl Into<String>, title: impl Into<String>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            id: id.into(),
            title: title.into(),
            local_path: format!("{}/{}", LOCAL_MUSIC_DIR, filename),
            filename,
            duration_secs: None,
            bpm: None,
            key: None,
            mood: None,
        }
    }

    /// Set the mood tag
    #[must_use]
    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Override the local fallback path
    #[must_use]
    pub fn with_local_path(mut self, local_path: impl Into<String>) -> Self {
        self.local_path = local_path.into();
        self
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Resolve the playable sources for this track
    ///
    /// Computed on every call; nothing is cached on the track.
    pub fn sources<R: SourceResolver + ?Sized>(&self, resolver: &R) -> TrackSources {
        TrackSources {
            remote: resolver
                .public_url(&self.filename)
                .filter(|url| !url.is_empty()),
            local: self.local_path.clone(),
        }
    }
}

/// Playable locations of a track, remote first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSources {
    /// Public storage URL, if the resolver produced one
    pub remote: Option<String>,

    /// Bundled fallback path
    pub local: String,
}

impl TrackSources {
    /// URL to load first: remote when available, local otherwise
    pub fn preferred(&self) -> &str {
        self.remote.as_deref().unwrap_or(&self.local)
    }

    /// Whether switching to the local path would load something different
    pub fn has_distinct_fallback(&self) -> bool {
        match self.remote.as_deref() {
            Some(remote) => !self.local.is_empty() && remote != self.local,
            None => false,
        }
    }
}
