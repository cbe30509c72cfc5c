mod mood;
mod pattern;
mod track;

pub use mood::Mood;
pub use pattern::{ArtPattern, VideoCombination, Visual};
pub use track::{Track, TrackSources, LOCAL_MUSIC_DIR};
